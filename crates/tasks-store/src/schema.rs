/// SQL DDL for the task store.
pub const SCHEMA_VERSION: u32 = 1;

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS Tasks (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Title TEXT NOT NULL CHECK (length(Title) <= 100),
    Description TEXT NULL CHECK (Description IS NULL OR length(Description) <= 500),
    DueDate TEXT NULL,
    IsCompleted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON Tasks(DueDate);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);
"#;

/// Rows inserted once, when the schema version is first recorded.
pub const SEED_TASKS: &str = r#"
INSERT INTO Tasks (Id, Title, Description, DueDate, IsCompleted) VALUES
    (1, 'Initial Task 1', 'Incomplete task 1', '2024-12-25 00:00:00', 0),
    (2, 'Initial Task 2', 'Complete task 2', '2024-12-25 00:00:00', 1);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
