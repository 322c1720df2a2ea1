use chrono::NaiveDateTime;
use tasks_core::due_date;

use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Get an optional column value.
pub fn get_opt<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<Option<T>, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Parse a stored timestamp column, returning CorruptRow on failure.
pub fn parse_datetime(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<NaiveDateTime, StoreError> {
    due_date::from_storage(raw).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: format!("invalid timestamp {raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_success() {
        let dt = parse_datetime("2024-12-25 00:00:00", "Tasks", "DueDate").unwrap();
        assert_eq!(dt.to_string(), "2024-12-25 00:00:00");
    }

    #[test]
    fn parse_datetime_with_fraction() {
        assert!(parse_datetime("2024-12-25 10:11:12.345", "Tasks", "DueDate").is_ok());
    }

    #[test]
    fn parse_datetime_failure() {
        let result = parse_datetime("soon", "Tasks", "DueDate");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow { table: "Tasks", column: "DueDate", .. })
        ));
    }
}
