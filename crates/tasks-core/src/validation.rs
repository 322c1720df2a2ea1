use serde::{Deserialize, Serialize};

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// A single field that failed validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collected field-level validation failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any error refers to `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check a required text field: present, not blank, within `max` characters.
pub fn check_required(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    max: usize,
) {
    match value {
        None => errors.push(FieldError::new(field, format!("The {field} field is required."))),
        Some(v) if v.trim().is_empty() => {
            errors.push(FieldError::new(field, format!("The {field} field is required.")));
        }
        Some(v) => check_max_len(errors, field, v, max),
    }
}

/// Check an optional text field's length.
pub fn check_optional(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value {
        check_max_len(errors, field, v, max);
    }
}

fn check_max_len(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.push(FieldError::new(
            field,
            format!("The {field} field must be at most {max} characters (got {len})."),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        let mut errors = Vec::new();
        check_required(&mut errors, "title", None, 10);
        check_required(&mut errors, "title", Some(""), 10);
        check_required(&mut errors, "title", Some("   "), 10);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.field == "title"));
    }

    #[test]
    fn required_accepts_boundary_length() {
        let mut errors = Vec::new();
        check_required(&mut errors, "title", Some(&"a".repeat(10)), 10);
        assert!(errors.is_empty());
        check_required(&mut errors, "title", Some(&"a".repeat(11)), 10);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = Vec::new();
        check_optional(&mut errors, "description", Some(&"é".repeat(5)), 5);
        assert!(errors.is_empty());
    }

    #[test]
    fn display_lists_every_field() {
        let err = ValidationError::new(vec![
            FieldError::new("title", "bad"),
            FieldError::new("description", "worse"),
        ]);
        assert_eq!(err.to_string(), "validation failed: title: bad; description: worse");
        assert!(err.has_field("description"));
        assert!(!err.has_field("dueDate"));
    }

    #[test]
    fn into_result_empty_is_ok() {
        assert!(ValidationError::new(vec![]).into_result().is_ok());
        assert!(ValidationError::single("title", "x").into_result().is_err());
    }
}
