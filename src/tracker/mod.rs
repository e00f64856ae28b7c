use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::db::{BudgetStore, CategoryStore, BUDGET_DB_FILE, CATEGORIES_DB_FILE};
use crate::models::{normalize_name, CategoryBreakdown, CategoryRecord, Period};

/// Budget and category rules on top of the two stores. Everything here takes
/// an explicit period; nothing reads the clock.
#[derive(Debug, Clone)]
pub(crate) struct Tracker {
    budgets: BudgetStore,
    categories: CategoryStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AddCategoryOutcome {
    Added {
        category: CategoryRecord,
        current_budget: i64,
    },
    EmptyName,
    NegativeBudget,
    AlreadyExists,
    OverAllocated {
        name: String,
        requested: i64,
        unallocated: i64,
    },
}

impl AddCategoryOutcome {
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Added { category, .. } => {
                format!("Category {} added successfully.", category.name)
            }
            Self::EmptyName => "Category name cannot be empty.".into(),
            Self::NegativeBudget => "Category budget cannot be less than zero.".into(),
            Self::AlreadyExists => "Category already exists.".into(),
            Self::OverAllocated {
                name,
                requested,
                unallocated,
            } => format!(
                "Budget for {name} ({requested}) is greater than the unallocated budget of {unallocated}."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RemoveCategoryOutcome {
    Removed { name: String },
    NotFound,
}

impl RemoveCategoryOutcome {
    pub(crate) fn message(&self) -> String {
        match self {
            Self::Removed { name } => format!("Category {name} removed successfully."),
            Self::NotFound => "Category does not exist.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BudgetUpdateOutcome {
    Updated { budget: i64, allocated: i64 },
    Negative,
}

impl BudgetUpdateOutcome {
    /// How far category allocations exceed the new total, if they do.
    pub(crate) fn over_allocated_by(&self) -> Option<i64> {
        match self {
            Self::Updated { budget, allocated } if allocated > budget => Some(allocated - budget),
            _ => None,
        }
    }

    pub(crate) fn message(&self) -> String {
        match self {
            Self::Updated { budget, .. } => match self.over_allocated_by() {
                Some(short) => format!(
                    "Monthly budget set to {budget}; categories are over-allocated by {short}."
                ),
                None => format!("Monthly budget set to {budget}."),
            },
            Self::Negative => "Monthly budget cannot be less than zero.".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Overview {
    pub(crate) period: Period,
    pub(crate) budget: i64,
    pub(crate) expenditure: i64,
    pub(crate) remaining: i64,
    pub(crate) categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategorySummary {
    pub(crate) period: Period,
    pub(crate) categories: Vec<String>,
    pub(crate) breakdown: BTreeMap<String, CategoryBreakdown>,
}

impl Tracker {
    /// Opens `budget.db` and `categories.db` under `data_dir`, seeding a budget
    /// row for `period`.
    pub(crate) fn open(data_dir: &Path, period: Period) -> Result<Self> {
        let budgets = BudgetStore::open(&data_dir.join(BUDGET_DB_FILE), period)?;
        let categories = CategoryStore::open(&data_dir.join(CATEGORIES_DB_FILE))?;
        Ok(Self {
            budgets,
            categories,
        })
    }

    /// Period totals with missing rows read as zero.
    pub(crate) fn overview(&self, period: Period) -> Result<Overview> {
        Ok(Overview {
            period,
            budget: self.budgets.get_budget(period)?.unwrap_or(0),
            expenditure: self.budgets.get_expenditure(period)?.unwrap_or(0),
            remaining: self.budgets.get_remaining(period)?.unwrap_or(0),
            categories: self.categories.list_category_names(period)?,
        })
    }

    pub(crate) fn category_summary(&self, period: Period) -> Result<CategorySummary> {
        Ok(CategorySummary {
            period,
            categories: self.categories.list_category_names(period)?,
            breakdown: self.categories.get_category_budget_breakdown(period)?,
        })
    }

    pub(crate) fn allocated_budget(&self, period: Period) -> Result<i64> {
        self.categories.get_allocated_budget(period)
    }

    pub(crate) fn add_category(
        &self,
        name: &str,
        budget: i64,
        period: Period,
    ) -> Result<AddCategoryOutcome> {
        let name = normalize_name(name);
        if name.is_empty() {
            return Ok(AddCategoryOutcome::EmptyName);
        }
        if budget < 0 {
            return Ok(AddCategoryOutcome::NegativeBudget);
        }
        if self.categories.get_category(&name, period)?.is_some() {
            tracing::warn!(category = %name, %period, "category already exists");
            return Ok(AddCategoryOutcome::AlreadyExists);
        }

        let allocated = self.categories.get_allocated_budget(period)?;
        let unallocated = match self.budgets.get_period(period)? {
            Some(record) => record.unallocated(allocated),
            None => -allocated,
        };
        if budget > unallocated {
            tracing::warn!(
                category = %name,
                %period,
                requested = budget,
                unallocated,
                "category budget exceeds unallocated budget"
            );
            return Ok(AddCategoryOutcome::OverAllocated {
                name,
                requested: budget,
                unallocated,
            });
        }

        // Lost a race with a concurrent add of the same name.
        if !self.categories.create_category(&name, budget, period)? {
            return Ok(AddCategoryOutcome::AlreadyExists);
        }
        let category = self
            .categories
            .get_category_record(&name, period)?
            .ok_or_else(|| anyhow::anyhow!("Category '{name}' vanished after insert"))?;
        tracing::info!(category = %name, %period, budget, "category added");

        Ok(AddCategoryOutcome::Added {
            category,
            current_budget: self.budgets.get_budget(period)?.unwrap_or(0),
        })
    }

    pub(crate) fn remove_category(&self, name: &str, period: Period) -> Result<RemoveCategoryOutcome> {
        let Some(stored) = self.categories.get_category(name, period)? else {
            return Ok(RemoveCategoryOutcome::NotFound);
        };
        if !self.categories.delete_category(&stored, period)? {
            return Ok(RemoveCategoryOutcome::NotFound);
        }
        tracing::info!(category = %stored, %period, "category removed");
        Ok(RemoveCategoryOutcome::Removed { name: stored })
    }

    /// Lowering the total below what categories already hold is allowed;
    /// the outcome reports the shortfall.
    pub(crate) fn update_budget(&self, period: Period, new_budget: i64) -> Result<BudgetUpdateOutcome> {
        if new_budget < 0 {
            tracing::warn!(%period, new_budget, "rejected negative budget");
            return Ok(BudgetUpdateOutcome::Negative);
        }

        let record = self.budgets.set_budget(period, new_budget)?;
        let allocated = self.categories.get_allocated_budget(period)?;
        let outcome = BudgetUpdateOutcome::Updated {
            budget: record.budget,
            allocated,
        };

        if let Some(short) = outcome.over_allocated_by() {
            tracing::warn!(%period, budget = record.budget, allocated, short, "budget is over-allocated");
        } else {
            tracing::info!(%period, budget = record.budget, "budget updated");
        }
        Ok(outcome)
    }
}
