use rusqlite::{params, OptionalExtension};
use tracing::{debug, instrument};

use tasks_core::{due_date, Task, TaskFields, TaskFilter, TaskId};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

const TABLE: &str = "Tasks";
const COLUMNS: &str = "Id, Title, Description, DueDate, IsCompleted";

/// Query and CRUD operations over the `Tasks` table.
pub struct TaskRepo {
    db: Database,
}

impl TaskRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List tasks, optionally filtered by completion, ordered by due date.
    /// Equal due dates fall back to ascending id.
    #[instrument(skip(self))]
    pub fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {TABLE} \
             WHERE (?1 IS NULL OR IsCompleted = ?1) \
             ORDER BY DueDate {}, Id ASC",
            filter.sort.as_sql()
        );
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([filter.is_completed])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(task_from_row(row)?);
            }
            debug!(count = tasks.len(), "listed tasks");
            Ok(tasks)
        })
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: TaskId) -> Result<Task, StoreError> {
        self.db.with_conn(|conn| {
            let sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE Id = ?1");
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => task_from_row(row),
                None => Err(StoreError::NotFound(format!("task {id}"))),
            }
        })
    }

    /// Insert a task; the store assigns its id.
    #[instrument(skip(self, values), fields(title = %values.title))]
    pub fn create(&self, values: &TaskFields) -> Result<Task, StoreError> {
        values.validate()?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Tasks (Title, Description, DueDate, IsCompleted) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    values.title,
                    values.description,
                    values.due_date.as_ref().map(due_date::to_storage),
                    values.is_completed,
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(task_id = id, "task created");
            Ok(Task::from_fields(id, values.clone()))
        })
    }

    /// Replace every field of the task at `id` with the values of `task`.
    #[instrument(skip(self, task))]
    pub fn update(&self, id: TaskId, task: &Task) -> Result<(), StoreError> {
        if task.id != id {
            return Err(StoreError::IdMismatch {
                path: id,
                body: task.id,
            });
        }
        let fields = task.fields();
        fields.validate()?;

        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE Tasks SET Title = ?1, Description = ?2, DueDate = ?3, IsCompleted = ?4 \
                 WHERE Id = ?5",
                params![
                    fields.title,
                    fields.description,
                    fields.due_date.as_ref().map(due_date::to_storage),
                    fields.is_completed,
                    id,
                ],
            )?;
            if changed > 0 {
                return Ok(());
            }

            // Nothing written: either the row is gone or the write was lost.
            let exists = conn
                .query_row("SELECT 1 FROM Tasks WHERE Id = ?1", [id], |_| Ok(()))
                .optional()?
                .is_some();
            if exists {
                Err(StoreError::Conflict(format!("task {id} was not updated")))
            } else {
                Err(StoreError::NotFound(format!("task {id}")))
            }
        })
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM Tasks WHERE Id = ?1", [id])?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM Tasks", [], |row| row.get(0))
                .map_err(StoreError::from)
        })
    }
}

fn task_from_row(row: &rusqlite::Row<'_>) -> Result<Task, StoreError> {
    let due_date = row_helpers::get_opt::<String>(row, 3, TABLE, "DueDate")?
        .map(|raw| row_helpers::parse_datetime(&raw, TABLE, "DueDate"))
        .transpose()?;
    Ok(Task {
        id: row_helpers::get(row, 0, TABLE, "Id")?,
        title: row_helpers::get(row, 1, TABLE, "Title")?,
        description: row_helpers::get_opt(row, 2, TABLE, "Description")?,
        due_date,
        is_completed: row_helpers::get(row, 4, TABLE, "IsCompleted")?,
    })
}
