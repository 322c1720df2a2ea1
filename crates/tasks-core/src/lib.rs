//! Domain types shared by the store, the HTTP API and the client.

pub mod due_date;
pub mod filter;
pub mod task;
pub mod validation;

pub use due_date::DueDateInput;
pub use filter::{SortOrder, TaskFilter};
pub use task::{Task, TaskFields, TaskId, TaskInput};
pub use validation::{FieldError, ValidationError, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
