use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use super::{connect, migrate, schema};
use crate::models::{BudgetRecord, Period};

const SELECT_BUDGET: &str = "SELECT id, month, year, budget, expenditure, remaining, created_at, updated_at
     FROM budget WHERE month = ?1 AND year = ?2";

/// File-backed store holding one totals row per period.
#[derive(Debug, Clone)]
pub(crate) struct BudgetStore {
    path: PathBuf,
}

impl BudgetStore {
    /// Creates or migrates the schema and seeds an empty row for `period`.
    pub(crate) fn open(path: &Path, period: Period) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };
        let conn = store.connect()?;
        migrate(&conn, &schema::BUDGET).context("Budget schema migration failed")?;
        drop(conn);
        store.ensure_period(period)?;
        tracing::debug!(path = %path.display(), %period, "opened budget store");
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        connect(&self.path)
    }

    /// Inserts an all-zero row for the period unless one exists.
    /// Returns whether a row was created.
    pub(crate) fn ensure_period(&self, period: Period) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO budget (month, year, budget, expenditure, remaining)
             VALUES (?1, ?2, 0, 0, 0)",
            params![period.month_name(), period.year()],
        )?;
        Ok(changed > 0)
    }

    pub(crate) fn get_period(&self, period: Period) -> Result<Option<BudgetRecord>> {
        let conn = self.connect()?;
        Ok(conn
            .query_row(
                SELECT_BUDGET,
                params![period.month_name(), period.year()],
                budget_from_row,
            )
            .optional()?)
    }

    pub(crate) fn get_budget(&self, period: Period) -> Result<Option<i64>> {
        Ok(self.get_period(period)?.map(|r| r.budget))
    }

    pub(crate) fn get_expenditure(&self, period: Period) -> Result<Option<i64>> {
        Ok(self.get_period(period)?.map(|r| r.expenditure))
    }

    pub(crate) fn get_remaining(&self, period: Period) -> Result<Option<i64>> {
        Ok(self.get_period(period)?.map(|r| r.remaining))
    }

    /// Sets the period total and recomputes `remaining` against the stored
    /// expenditure. A missing period row is created.
    pub(crate) fn set_budget(&self, period: Period, new_budget: i64) -> Result<BudgetRecord> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let expenditure: i64 = tx
            .query_row(
                "SELECT expenditure FROM budget WHERE month = ?1 AND year = ?2",
                params![period.month_name(), period.year()],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);
        let remaining = new_budget - expenditure;

        tx.execute(
            "INSERT INTO budget (month, year, budget, expenditure, remaining)
             VALUES (?1, ?2, ?3, 0, ?4)
             ON CONFLICT(month, year) DO UPDATE SET
                budget = excluded.budget,
                remaining = excluded.remaining,
                updated_at = CURRENT_TIMESTAMP",
            params![period.month_name(), period.year(), new_budget, remaining],
        )
        .with_context(|| format!("Failed to update budget for {period}"))?;

        let record = tx.query_row(
            SELECT_BUDGET,
            params![period.month_name(), period.year()],
            budget_from_row,
        )?;
        tx.commit()?;
        Ok(record)
    }

    #[cfg(test)]
    pub(crate) fn set_expenditure_for_test(&self, period: Period, expenditure: i64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "UPDATE budget SET expenditure = ?1, remaining = budget - ?1
             WHERE month = ?2 AND year = ?3",
            params![expenditure, period.month_name(), period.year()],
        )?;
        Ok(())
    }
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<BudgetRecord> {
    Ok(BudgetRecord {
        id: row.get(0)?,
        month: row.get(1)?,
        year: row.get(2)?,
        budget: row.get(3)?,
        expenditure: row.get(4)?,
        remaining: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
