// Domain error taxonomy shared by the catalog, entities and ingestion.

use thiserror::Error;

/// Crate-wide result alias for catalog operations.
pub type Result<T> = std::result::Result<T, GlacierError>;

/// Everything that can go wrong while building or querying a catalog.
///
/// `InvalidType` only arises where string record fields are parsed;
/// `InvalidValue` means the value was the right kind but out of domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GlacierError {
    #[error("{field}: expected {expected}, got '{got}'")]
    InvalidType {
        field: String,
        expected: &'static str,
        got: String,
    },

    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("no glacier with id '{id}' in the catalog")]
    UnknownKey { id: String },

    #[error("duplicate glacier id '{id}' (row {row})")]
    DuplicateKey { id: String, row: usize },

    #[error("record set is empty")]
    EmptyInput,

    #[error("no mass-balance measurements recorded")]
    NoData,

    #[error("requested {requested} glaciers but only {available} have measurements")]
    InsufficientData { requested: usize, available: usize },

    #[error("no glacier has a measurement to compute a percentage over")]
    DivideByZero,

    #[error("no glacier grew in its latest measurement")]
    NoGrowth,

    #[error("no glacier shrank in its latest measurement")]
    NoShrinkage,
}

impl GlacierError {
    pub(crate) fn invalid_type(
        field: impl Into<String>,
        expected: &'static str,
        got: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
            got: got.into(),
        }
    }

    pub(crate) fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Tags a validation error with the zero-based row it came from.
    /// The variant kind is preserved so callers can still match on it.
    pub(crate) fn at_row(self, row: usize) -> Self {
        match self {
            Self::InvalidType {
                field,
                expected,
                got,
            } => Self::InvalidType {
                field: format!("{field} (row {row})"),
                expected,
                got,
            },
            Self::InvalidValue { field, reason } => Self::InvalidValue {
                field: format!("{field} (row {row})"),
                reason,
            },
            other => other,
        }
    }
}
