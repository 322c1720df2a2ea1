//! Due-date encoding for the wire and for storage.
//!
//! Responses carry `YYYY-MM-DDTHH:MM:SS[.fff]` with no offset. Requests are
//! more lenient: browser `datetime-local` values (minutes only), bare dates
//! and RFC 3339 timestamps with an offset are all accepted.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Storage format. Lexical order matches chronological order.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Response format.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn to_storage(value: &NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}

pub fn from_storage(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, STORAGE_FORMAT)
}

pub fn format_wire(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// Parse a due date as sent by a client.
pub fn parse_wire(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    for format in ACCEPTED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid due date: {raw:?}"))
}

/// The `dueDate` of a request body, distinguishing an absent field from an
/// explicit `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DueDateInput {
    /// Field omitted; the server assigns the current instant.
    #[default]
    Unset,
    /// Explicit `null`; the task has no due date.
    Null,
    At(NaiveDateTime),
}

impl DueDateInput {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Resolve to the value to persist.
    pub fn resolve(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Unset => Some(now),
            Self::Null => None,
            Self::At(dt) => Some(dt),
        }
    }
}

impl From<Option<NaiveDateTime>> for DueDateInput {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Self::Null, Self::At)
    }
}

impl Serialize for DueDateInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unset | Self::Null => serializer.serialize_none(),
            Self::At(dt) => serializer.serialize_str(&format_wire(dt)),
        }
    }
}

impl<'de> Deserialize<'de> for DueDateInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::Null),
            Some(raw) => parse_wire(&raw).map(Self::At).map_err(serde::de::Error::custom),
        }
    }
}

/// serde adapter for `Option<NaiveDateTime>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format_wire(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_wire(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
