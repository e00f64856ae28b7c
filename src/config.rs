use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::models::Period;

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    pub(crate) addr: SocketAddr,
    /// When set, every request and command uses this period instead of the
    /// local clock's month.
    pub(crate) pinned_period: Option<Period>,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let data_dir = match env::var_os("EXPENSE_TRACKER_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let addr = env::var("EXPENSE_TRACKER_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("EXPENSE_TRACKER_ADDR must be a socket address like 127.0.0.1:8000")?;

        let pinned_period = match env::var("EXPENSE_TRACKER_PERIOD") {
            Ok(p) if !p.trim().is_empty() => {
                Some(Period::parse(&p).context("Invalid EXPENSE_TRACKER_PERIOD")?)
            }
            _ => None,
        };

        let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
        crate::logging::filter(&log_filter)?;

        Ok(Self {
            data_dir,
            addr,
            pinned_period,
            log_filter,
        })
    }

    /// The pinned period, or the current month.
    pub(crate) fn period(&self) -> Period {
        self.pinned_period.unwrap_or_else(Period::current)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-tracker", "ExpenseTracker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
