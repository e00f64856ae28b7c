/// Each store lives in its own file and carries its own version table.
pub(crate) struct Schema {
    pub(crate) name: &'static str,
    pub(crate) base: &'static str,
    pub(crate) version: i32,
    /// Migrations from version N to N+1.
    /// Each entry is (from_version, sql).
    pub(crate) migrations: &'static [(i32, &'static str)],
}

pub(crate) const BUDGET: Schema = Schema {
    name: "budget",
    base: BUDGET_V1,
    version: 1,
    migrations: &[],
};

pub(crate) const CATEGORIES: Schema = Schema {
    name: "categories",
    base: CATEGORIES_V1,
    version: 1,
    migrations: &[],
};

const BUDGET_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS budget (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    month       TEXT NOT NULL,
    year        INTEGER NOT NULL,
    budget      INTEGER NOT NULL DEFAULT 0 CHECK (budget >= 0),
    expenditure INTEGER NOT NULL DEFAULT 0,
    remaining   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(month, year)
);
"#;

const CATEGORIES_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    month       TEXT NOT NULL,
    year        INTEGER NOT NULL,
    name        TEXT NOT NULL,
    budget      INTEGER NOT NULL CHECK (budget >= 0),
    expenditure INTEGER NOT NULL DEFAULT 0,
    remaining   INTEGER NOT NULL,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(month, year, name)
);

CREATE INDEX IF NOT EXISTS idx_categories_period ON categories(year, month);
"#;
