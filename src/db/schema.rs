//! SQL DDL for initializing the tool room database.

/// SQLite schema with:
/// - `tools.tool_id` UNIQUE (duplicate registrations fail)
/// - `issues.tool_id` / `issues.technician` as plain text, no foreign keys
/// - `issues.due_date` stored as `YYYY-MM-DD HH:MM:SS` text so string
///   comparison orders chronologically
/// - `returned` BOOLEAN (stored as INTEGER 0/1)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS tools (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    reorder_level INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS technicians (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    contact TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool_id TEXT NOT NULL,
    technician TEXT NOT NULL,
    due_date TEXT NOT NULL,
    returned INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_issues_outstanding ON issues(returned, due_date);

CREATE TABLE IF NOT EXISTS stock_movements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tool_id TEXT NOT NULL,
    action TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
"#;
