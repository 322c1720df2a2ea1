use crate::validation::ValidationError;

/// Direction of the due-date ordering applied to listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> Self {
        if descending {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Listing parameters: optional completion filter plus sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub is_completed: Option<bool>,
    pub sort: SortOrder,
}

impl TaskFilter {
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Build a filter from raw query-string values.
    ///
    /// Empty values count as absent; anything other than a case-insensitive
    /// `true`/`false` is rejected.
    pub fn from_query(
        is_completed: Option<&str>,
        sort_descending: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();
        let is_completed = parse_flag("isCompleted", is_completed).unwrap_or_else(|e| {
            errors.extend(e.errors);
            None
        });
        let descending = parse_flag("sortDescending", sort_descending).unwrap_or_else(|e| {
            errors.extend(e.errors);
            None
        });
        ValidationError::new(errors).into_result()?;

        Ok(Self {
            is_completed,
            sort: SortOrder::from_descending(descending.unwrap_or(false)),
        })
    }

    /// Query-string pairs understood by [`TaskFilter::from_query`].
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(done) = self.is_completed {
            pairs.push(("isCompleted", done.to_string()));
        }
        if self.sort.is_descending() {
            pairs.push(("sortDescending", "true".to_string()));
        }
        pairs
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(ValidationError::single(
            name,
            format!("The value '{raw}' is not valid for {name}."),
        ))
    }
}
