use serde::Serialize;

/// One row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub month: String,
    pub year: i32,
    pub name: String,
    pub budget: i64,
    pub expenditure: i64,
    pub remaining: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CategoryRecord {
    pub fn breakdown(&self) -> CategoryBreakdown {
        CategoryBreakdown {
            budget: self.budget,
            expenditure: self.expenditure,
            remaining: self.remaining,
        }
    }
}

/// Per-category figures rendered by `GET /categories` and `summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub budget: i64,
    pub expenditure: i64,
    pub remaining: i64,
}

/// Category names are stored trimmed and lowercased; every lookup goes
/// through here so "Groceries" and "groceries " hit the same row.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
