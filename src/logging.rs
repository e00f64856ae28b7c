use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Parses a `RUST_LOG`-style filter.
pub(crate) fn filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid RUST_LOG: {directives}"))
}

/// Installs the global fmt subscriber. Logs go to stderr so CLI output on
/// stdout stays clean.
pub(crate) fn init(directives: &str) -> Result<()> {
    let filter = filter(directives)?;
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_directives() {
        assert!(filter("info").is_ok());
        assert!(filter("warn,expense_tracker=debug").is_ok());
    }

    #[test]
    fn test_filter_rejects_bad_level() {
        let err = filter("expense_tracker=loudest").err();
        assert!(err.is_some_and(|e| e.to_string().contains("Invalid RUST_LOG")));
    }
}
