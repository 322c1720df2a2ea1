use chrono::NaiveDateTime;
use tracing::warn;

use tasks_core::{Task, TaskFilter, TaskId, TaskInput};

use crate::api::TaskApi;

/// Categories of user-visible failure. The UI does not distinguish error
/// kinds beyond these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Fetch => "There was an error fetching the tasks.",
            Self::Create => "There was an error creating the task.",
            Self::Update => "There was an error updating the task.",
            Self::Delete => "There was an error deleting the task.",
        }
    }
}

/// Client-side state: the mirrored task list, at most one task being edited,
/// and the latest failure message.
///
/// Successful mutations are applied locally without refetching.
#[derive(Clone, Debug, Default)]
pub struct App {
    tasks: Vec<Task>,
    editing: Option<Task>,
    error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The working copy of the task in edit mode.
    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the local list with the server's.
    pub async fn load<A: TaskApi + ?Sized>(&mut self, api: &A, filter: &TaskFilter) {
        match api.list(filter).await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.succeeded();
            }
            Err(e) => self.failed(Operation::Fetch, &e),
        }
    }

    /// Create a task and append the server's copy. An empty due date is left
    /// for the server to fill in.
    pub async fn create<A: TaskApi + ?Sized>(&mut self, api: &A, input: TaskInput) {
        match api.create(&input).await {
            Ok(task) => {
                self.tasks.push(task);
                self.succeeded();
            }
            Err(e) => self.failed(Operation::Create, &e),
        }
    }

    /// Enter edit mode for `id`, replacing any previous edit. Returns false
    /// when no such task is loaded.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().find(|t| t.id == id) {
            Some(task) => {
                self.editing = Some(task.clone());
                true
            }
            None => false,
        }
    }

    pub fn edit_mut(&mut self) -> Option<&mut Task> {
        self.editing.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Send the edited task as a full replacement. On success the local copy
    /// is replaced and edit mode ends; on failure both are left as they were.
    ///
    /// The update response has no body, so an empty due date is filled with
    /// `now` before sending to keep the local copy equal to the stored row.
    pub async fn save_edit<A: TaskApi + ?Sized>(&mut self, api: &A, now: NaiveDateTime) {
        let Some(mut task) = self.editing.clone() else {
            return;
        };
        if task.due_date.is_none() {
            task.due_date = Some(now);
        }

        match api.update(&task).await {
            Ok(()) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
                self.editing = None;
                self.succeeded();
            }
            Err(e) => self.failed(Operation::Update, &e),
        }
    }

    pub async fn delete<A: TaskApi + ?Sized>(&mut self, api: &A, id: TaskId) {
        match api.delete(id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != id);
                if self.editing.as_ref().is_some_and(|t| t.id == id) {
                    self.editing = None;
                }
                self.succeeded();
            }
            Err(e) => self.failed(Operation::Delete, &e),
        }
    }

    fn succeeded(&mut self) {
        self.error = None;
    }

    fn failed(&mut self, op: Operation, error: &dyn std::error::Error) {
        warn!(operation = ?op, error = %error, "{}", op.failure_message());
        self.error = Some(op.failure_message().to_string());
    }
}
