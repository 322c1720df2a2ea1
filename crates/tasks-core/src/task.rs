use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::due_date::{self, DueDateInput};
use crate::validation::{
    check_optional, check_required, ValidationError, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};

/// Store-assigned task identifier.
pub type TaskId = i64;

/// A persisted task, as returned by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "due_date::option", default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn from_fields(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            is_completed: fields.is_completed,
        }
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date,
            is_completed: self.is_completed,
        }
    }

    /// A full-replacement payload carrying this task's values.
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            id: self.id,
            title: Some(self.title.clone()),
            description: self.description.clone(),
            due_date: self.due_date.into(),
            is_completed: self.is_completed,
        }
    }
}

/// Validated, id-less task values. What gets written to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub is_completed: bool,
}

impl TaskFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            is_completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_required(&mut errors, "title", Some(&self.title), TITLE_MAX_LEN);
        check_optional(
            &mut errors,
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_LEN,
        );
        ValidationError::new(errors).into_result()
    }
}

/// Request body for create and update.
///
/// Every field is optional at the JSON level so that missing values surface
/// as validation errors rather than parse failures. Updates replace the whole
/// record; there is no partial-patch mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Ignored on create. On update, must equal the path id; absent means 0.
    #[serde(default)]
    pub id: TaskId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "DueDateInput::is_unset")]
    pub due_date: DueDateInput,
    #[serde(default)]
    pub is_completed: bool,
}

impl TaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Validate and resolve into storable fields. An omitted due date takes
    /// the value of `now`.
    pub fn into_fields(self, now: NaiveDateTime) -> Result<TaskFields, ValidationError> {
        let mut errors = Vec::new();
        check_required(&mut errors, "title", self.title.as_deref(), TITLE_MAX_LEN);
        check_optional(
            &mut errors,
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_LEN,
        );
        ValidationError::new(errors).into_result()?;

        Ok(TaskFields {
            title: self.title.unwrap_or_default(),
            description: self.description,
            due_date: self.due_date.resolve(now),
            is_completed: self.is_completed,
        })
    }
}
