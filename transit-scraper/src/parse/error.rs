//! Parse error types.

use crate::text::{DateTimeError, EntityError};

/// Errors from turning a backend payload into domain records.
///
/// Record-level errors (a bad departure, a bad connection) are logged and
/// the record is skipped. The caller only sees a `ParseError` when the
/// payload as a whole is unusable.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Unresolvable character entity in a name
    #[error("entity error: {0}")]
    Entity(#[from] EntityError),

    /// Payload is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload is not well-formed enough to walk
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required field or attribute absent
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Field present but unusable
    #[error("invalid {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    /// Page does not have any expected shape
    #[error("unexpected page: {0}")]
    UnexpectedPage(String),

    /// Line label no rule could take apart
    #[error("cannot classify line: '{0}'")]
    UnclassifiedLine(String),

    /// Bad date or time field
    #[error(transparent)]
    DateTime(#[from] DateTimeError),
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(err.into())
    }
}

impl ParseError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        ParseError::InvalidField {
            field,
            value: value.into(),
        }
    }
}
