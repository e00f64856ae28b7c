use anyhow::{bail, Context, Result};
use chrono::{Datelike, Month};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// A (month, year) pair. Every budget and category row is scoped by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    month: Month,
    year: i32,
}

impl Period {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    /// The period containing today's local date.
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            month: MONTHS[today.month0() as usize],
            year: today.year(),
        }
    }

    /// Full English month name, as stored in the `month` column.
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Accepts `YYYY-MM` or `<Month> <year>` (month names are case-insensitive
    /// and may be abbreviated, e.g. `oct 2026`).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year
                .trim()
                .parse()
                .with_context(|| format!("Invalid year in period: {s}"))?;
            let month: usize = month
                .trim()
                .parse()
                .with_context(|| format!("Invalid month in period: {s}"))?;
            if !(1..=12).contains(&month) {
                bail!("Month out of range in period: {s}");
            }
            return Ok(Self::new(MONTHS[month - 1], year));
        }

        let mut parts = s.split_whitespace();
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            bail!("Invalid period '{s}': expected YYYY-MM or '<Month> <year>'");
        };
        let month: Month = month
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown month name in period: {s}"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in period: {s}"))?;
        Ok(Self::new(month, year))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}
