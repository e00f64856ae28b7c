/// One row of the `budget` table: the totals for a single period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetRecord {
    pub id: i64,
    pub month: String,
    pub year: i32,
    pub budget: i64,
    pub expenditure: i64,
    pub remaining: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl BudgetRecord {
    /// Portion of the budget not yet handed out to categories.
    /// Negative when the budget was lowered below what is already allocated.
    pub fn unallocated(&self, allocated: i64) -> i64 {
        self.budget - allocated
    }
}
