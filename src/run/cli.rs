use anyhow::{Context, Result};

use crate::config::Config;
use crate::models::Period;
use crate::tracker::{AddCategoryOutcome, BudgetUpdateOutcome, RemoveCategoryOutcome, Tracker};

pub(crate) fn as_cli(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], config, tracker),
        "categories" | "c" => cli_categories(&args[2..], config, tracker),
        "set-budget" => cli_set_budget(&args[2..], config, tracker),
        "add-category" => cli_add_category(&args[2..], config, tracker),
        "remove-category" => cli_remove_category(&args[2..], config, tracker),
        cmd if as_info(cmd) => Ok(()),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

/// Handles `--help` and `--version`. Returns false for anything else.
/// Needs no config or stores, so `main` checks it first.
pub(crate) fn as_info(command: &str) -> bool {
    match command {
        "--help" | "-h" | "help" => print_usage(),
        "--version" | "-V" | "version" => {
            println!("expense-tracker {}", env!("CARGO_PKG_VERSION"));
        }
        _ => return false,
    }
    true
}

fn print_usage() {
    println!("expense-tracker — monthly budget and category tracker");
    println!();
    println!("Usage: expense-tracker [command]");
    println!();
    println!("Commands:");
    println!("  (none), serve                  Run the HTTP API");
    println!("  summary [PERIOD]               Print budget, remaining and category breakdown");
    println!("  categories [PERIOD]            List category names");
    println!("    PERIOD may also be given as --period <PERIOD>");
    println!("  set-budget <amount>            Set the monthly budget");
    println!("  add-category <name> <budget>   Add a category allocation");
    println!("  remove-category <name>         Remove a category");
    println!("    --period <PERIOD>            Period to change (default: current month)");
    println!("  --help, -h                     Show this help");
    println!("  --version, -V                  Show version");
    println!();
    println!("PERIOD is YYYY-MM or \"<Month> <year>\".");
}

fn cli_summary(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    let period = CommandArgs::parse(args)?.read_period(config)?;
    let overview = tracker.overview(period)?;
    let summary = tracker.category_summary(period)?;
    let allocated = tracker.allocated_budget(period)?;

    println!("Expense Tracker — {period}");
    println!("{}", "─".repeat(40));
    println!("  Budget:       {}", overview.budget);
    println!("  Expenditure:  {}", overview.expenditure);
    println!("  Remaining:    {}", overview.remaining);
    println!("  Allocated:    {allocated}");
    println!("  Unallocated:  {}", overview.budget - allocated);

    if !summary.breakdown.is_empty() {
        println!();
        println!(
            "  {:<20} {:>10} {:>10} {:>10}",
            "Category", "Budget", "Spent", "Remaining"
        );
        for (name, figures) in &summary.breakdown {
            println!(
                "  {name:<20} {:>10} {:>10} {:>10}",
                figures.budget, figures.expenditure, figures.remaining
            );
        }
    }
    Ok(())
}

fn cli_categories(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    let period = CommandArgs::parse(args)?.read_period(config)?;
    let names = tracker.overview(period)?.categories;
    if names.is_empty() {
        println!("No categories for {period}");
        return Ok(());
    }
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

fn cli_set_budget(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    let parsed = CommandArgs::parse(args)?;
    let [amount] = parsed.positional("set-budget <amount> [--period <PERIOD>]")?;
    let amount = parse_amount(amount)?;
    let period = parsed.period_or(config);

    let outcome = tracker.update_budget(period, amount)?;
    match outcome {
        BudgetUpdateOutcome::Updated { .. } => {
            println!("{} ({period})", outcome.message());
            Ok(())
        }
        BudgetUpdateOutcome::Negative => anyhow::bail!(outcome.message()),
    }
}

fn cli_add_category(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    let parsed = CommandArgs::parse(args)?;
    let [name, budget] = parsed.positional("add-category <name> <budget> [--period <PERIOD>]")?;
    let budget = parse_amount(budget)?;
    let period = parsed.period_or(config);

    let outcome = tracker.add_category(name, budget, period)?;
    match outcome {
        AddCategoryOutcome::Added { current_budget, .. } => {
            println!("{}", outcome.message());
            println!(
                "Allocated {} of {current_budget} for {period}",
                tracker.allocated_budget(period)?
            );
            Ok(())
        }
        _ => anyhow::bail!(outcome.message()),
    }
}

fn cli_remove_category(args: &[String], config: &Config, tracker: &Tracker) -> Result<()> {
    let parsed = CommandArgs::parse(args)?;
    let [name] = parsed.positional("remove-category <name> [--period <PERIOD>]")?;
    let period = parsed.period_or(config);

    let outcome = tracker.remove_category(name, period)?;
    match outcome {
        RemoveCategoryOutcome::Removed { .. } => {
            println!("{}", outcome.message());
            Ok(())
        }
        RemoveCategoryOutcome::NotFound => anyhow::bail!(outcome.message()),
    }
}

pub(crate) fn parse_amount(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Not a whole amount: {s}"))
}

/// Command arguments split into positional words and an optional
/// `--period <PERIOD>`. Any other `--` flag is rejected. Single-dash words
/// such as `-5` stay positional.
#[derive(Debug)]
pub(crate) struct CommandArgs<'a> {
    pub(crate) words: Vec<&'a str>,
    pub(crate) period: Option<Period>,
}

impl<'a> CommandArgs<'a> {
    pub(crate) fn parse(args: &'a [String]) -> Result<Self> {
        let mut words = Vec::new();
        let mut period = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--period" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--period requires a value"))?;
                    if period.is_some() {
                        anyhow::bail!("--period given more than once");
                    }
                    period = Some(Period::parse(value)?);
                }
                flag if flag.starts_with("--") => anyhow::bail!("Unknown option: {flag}"),
                word => words.push(word),
            }
        }
        Ok(Self { words, period })
    }

    /// Exactly `N` positional words, else a usage error.
    pub(crate) fn positional<const N: usize>(&self, usage: &str) -> Result<[&'a str; N]> {
        <[&str; N]>::try_from(self.words.as_slice())
            .map_err(|_| anyhow::anyhow!("Usage: expense-tracker {usage}"))
    }

    /// The `--period` value, else the configured period.
    pub(crate) fn period_or(&self, config: &Config) -> Period {
        self.period.unwrap_or_else(|| config.period())
    }

    /// Read commands also take the period as bare words, joined so that
    /// `summary October 2026` works unquoted.
    pub(crate) fn read_period(&self, config: &Config) -> Result<Period> {
        match (self.period, self.words.is_empty()) {
            (Some(_), false) => {
                anyhow::bail!("Give the period either as --period or as words, not both")
            }
            (Some(period), true) => Ok(period),
            (None, false) => Period::parse(&self.words.join(" ")),
            (None, true) => Ok(config.period()),
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
