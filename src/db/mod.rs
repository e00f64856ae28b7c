mod budget_store;
mod category_store;
mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

pub(crate) use budget_store::BudgetStore;
pub(crate) use category_store::CategoryStore;

use schema::Schema;

pub(crate) const BUDGET_DB_FILE: &str = "budget.db";
pub(crate) const CATEGORIES_DB_FILE: &str = "categories.db";

/// Opens a short-lived connection. Stores call this once per operation and
/// let the connection drop at the end of the call.
fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    conn.busy_timeout(Duration::from_secs(5))
        .context("Failed to set busy timeout")?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")
        .context("Failed to set database pragmas")?;
    Ok(conn)
}

fn migrate(conn: &Connection, schema: &Schema) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    let has_version_table: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    let current: Option<i32> = if has_version_table {
        tx.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?
    } else {
        None
    };

    // Fresh database, or one whose first setup never recorded a version.
    // The base schema is all IF NOT EXISTS, so reapplying it is safe.
    let Some(current) = current else {
        tx.execute_batch(schema.base)?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema.version],
        )?;
        tx.commit()?;
        tracing::debug!(schema = schema.name, version = schema.version, "created schema");
        return Ok(());
    };

    for &(from_version, sql) in schema.migrations {
        if current <= from_version {
            tx.execute_batch(sql)?;
        }
    }

    if current < schema.version {
        tx.execute(
            "UPDATE schema_version SET version = ?1",
            params![schema.version],
        )?;
        tracing::info!(
            schema = schema.name,
            from = current,
            to = schema.version,
            "migrated schema"
        );
    }

    tx.commit()?;
    Ok(())
}
