use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{connect, migrate, schema};
use crate::models::{normalize_name, CategoryBreakdown, CategoryRecord, Period};

/// File-backed store for the named allocations inside each period.
#[derive(Debug, Clone)]
pub(crate) struct CategoryStore {
    path: PathBuf,
}

impl CategoryStore {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };
        store.ensure_table()?;
        tracing::debug!(path = %path.display(), "opened category store");
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        connect(&self.path)
    }

    /// Idempotent; categories start empty for every period.
    pub(crate) fn ensure_table(&self) -> Result<()> {
        let conn = self.connect()?;
        migrate(&conn, &schema::CATEGORIES).context("Categories schema migration failed")
    }

    /// Distinct names within the period, ascending.
    pub(crate) fn list_category_names(&self, period: Period) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT name FROM categories
             WHERE month = ?1 AND year = ?2
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![period.month_name(), period.year()], |row| {
            row.get(0)
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// The stored name when the category exists for the period.
    pub(crate) fn get_category(&self, name: &str, period: Period) -> Result<Option<String>> {
        let conn = self.connect()?;
        Ok(conn
            .query_row(
                "SELECT name FROM categories WHERE name = ?1 AND month = ?2 AND year = ?3",
                params![normalize_name(name), period.month_name(), period.year()],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub(crate) fn get_category_record(
        &self,
        name: &str,
        period: Period,
    ) -> Result<Option<CategoryRecord>> {
        let conn = self.connect()?;
        Ok(conn
            .query_row(
                "SELECT id, month, year, name, budget, expenditure, remaining, created_at, updated_at
                 FROM categories WHERE name = ?1 AND month = ?2 AND year = ?3",
                params![normalize_name(name), period.month_name(), period.year()],
                category_from_row,
            )
            .optional()?)
    }

    pub(crate) fn get_category_budget_breakdown(
        &self,
        period: Period,
    ) -> Result<BTreeMap<String, CategoryBreakdown>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, month, year, name, budget, expenditure, remaining, created_at, updated_at
             FROM categories WHERE month = ?1 AND year = ?2
             ORDER BY name",
        )?;
        let rows = stmt.query_map(
            params![period.month_name(), period.year()],
            category_from_row,
        )?;

        let mut breakdown = BTreeMap::new();
        for row in rows {
            let cat = row?;
            breakdown.insert(cat.name.clone(), cat.breakdown());
        }
        Ok(breakdown)
    }

    /// Sum of category budgets in the period. Always derived from the rows.
    pub(crate) fn get_allocated_budget(&self, period: Period) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row(
            "SELECT COALESCE(SUM(budget), 0) FROM categories WHERE month = ?1 AND year = ?2",
            params![period.month_name(), period.year()],
            |row| row.get(0),
        )?)
    }

    /// Inserts a fresh category with nothing spent yet. Returns `false` when
    /// the name is already taken for the period; the existing row is left
    /// untouched. Allocation checks are the caller's job.
    pub(crate) fn create_category(&self, name: &str, budget: i64, period: Period) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "INSERT INTO categories (month, year, name, budget, expenditure, remaining)
                 VALUES (?1, ?2, ?3, ?4, 0, ?4)
                 ON CONFLICT(month, year, name) DO NOTHING",
                params![
                    period.month_name(),
                    period.year(),
                    normalize_name(name),
                    budget
                ],
            )
            .with_context(|| format!("Failed to create category '{name}' for {period}"))?;
        Ok(changed == 1)
    }

    /// Returns whether a row was removed.
    pub(crate) fn delete_category(&self, name: &str, period: Period) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "DELETE FROM categories WHERE name = ?1 AND month = ?2 AND year = ?3",
            params![normalize_name(name), period.month_name(), period.year()],
        )?;
        Ok(changed > 0)
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<CategoryRecord> {
    Ok(CategoryRecord {
        id: row.get(0)?,
        month: row.get(1)?,
        year: row.get(2)?,
        name: row.get(3)?,
        budget: row.get(4)?,
        expenditure: row.get(5)?,
        remaining: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
