mod api;
mod config;
mod db;
mod logging;
mod models;
mod run;
mod tracker;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).is_some_and(|cmd| run::as_info(cmd)) {
        return Ok(());
    }

    let config = config::Config::from_env()?;
    logging::init(&config.log_filter)?;

    let tracker = tracker::Tracker::open(&config.data_dir, config.period())?;
    tracing::debug!(data_dir = %config.data_dir.display(), "stores ready");

    match args.get(1).map(String::as_str) {
        None | Some("serve") => run::as_server(&config, tracker),
        Some(_) => run::as_cli(&args, &config, &tracker),
    }
}
