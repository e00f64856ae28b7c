mod budget;
mod category;
mod period;

pub use budget::BudgetRecord;
pub use category::{normalize_name, CategoryBreakdown, CategoryRecord};
pub use period::Period;
