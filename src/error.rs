//! Error types for the record editor session.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`Session`](crate::session::Session) operations.
///
/// None of these are fatal: the session keeps its previous state and the
/// caller may retry.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The uploaded bytes could not be parsed as a table.
    #[error("malformed table: {0}")]
    Parse(#[from] ParseError),

    /// A field selection named a column that is unknown or read-only.
    #[error("field {name:?} cannot be edited: {reason}")]
    InvalidField { name: String, reason: FieldRejection },

    /// Serializing or writing the exported table failed.
    #[error("export to {} failed", target.display())]
    Export {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a table failed to load.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("missing header row")]
    MissingHeader,

    #[error("duplicate column {0:?}")]
    DuplicateColumn(String),
}

/// Why a field name was refused by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRejection {
    /// No column with that name exists in the loaded table.
    UnknownColumn,
    /// The column is a display-only field.
    ReadOnly,
}

impl std::fmt::Display for FieldRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownColumn => f.write_str("no such column"),
            Self::ReadOnly => f.write_str("column is read-only"),
        }
    }
}

impl SessionError {
    pub(crate) fn invalid_field(name: impl Into<String>, reason: FieldRejection) -> Self {
        Self::InvalidField {
            name: name.into(),
            reason,
        }
    }

    pub(crate) fn export(target: impl Into<PathBuf>, source: impl Into<std::io::Error>) -> Self {
        Self::Export {
            target: target.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_message_names_field_and_reason() {
        let err = SessionError::invalid_field("Year", FieldRejection::UnknownColumn);
        assert_eq!(
            err.to_string(),
            "field \"Year\" cannot be edited: no such column"
        );
    }

    #[test]
    fn test_parse_error_wraps_reason() {
        let err = SessionError::from(ParseError::DuplicateColumn("Year".to_string()));
        assert_eq!(err.to_string(), "malformed table: duplicate column \"Year\"");
    }
}
