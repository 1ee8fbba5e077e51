use crate::db::{cursor::TokenWireError, store::StoreError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Public error surface of the paged repository.
/// Precondition failures, empty results, bad tokens and store faults stay
/// distinguishable so callers can tell a bad call from an empty success.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },

    #[error("no entity matched the query (table {table})")]
    EmptyResult { table: String },

    #[error("corrupt continuation token: {0}")]
    CorruptContinuationToken(#[source] TokenWireError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    pub(crate) const fn invalid_argument(argument: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { argument, reason }
    }

    pub(crate) fn empty_result(table: impl Into<String>) -> Self {
        Self::EmptyResult {
            table: table.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable classification independent of message text.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument { .. } => ErrorClass::InvalidArgument,
            Self::EmptyResult { .. } => ErrorClass::EmptyResult,
            Self::CorruptContinuationToken(_) => ErrorClass::CorruptContinuationToken,
            Self::Storage(_) => ErrorClass::Storage,
            Self::Internal { .. } => ErrorClass::Internal,
        }
    }

    /// Name of the violated argument for precondition failures.
    #[must_use]
    pub const fn argument(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { argument, .. } => Some(*argument),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    EmptyResult,
    CorruptContinuationToken,
    Storage,
    Internal,
}

impl ErrorClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::EmptyResult => "empty_result",
            Self::CorruptContinuationToken => "corrupt_continuation_token",
            Self::Storage => "storage",
            Self::Internal => "internal",
        }
    }

    /// True for failures caused by the call itself rather than the store.
    #[must_use]
    pub const fn is_caller_error(self) -> bool {
        matches!(self, Self::InvalidArgument | Self::CorruptContinuationToken)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Error, ErrorClass};
    use crate::db::{cursor::TokenWireError, store::StoreError};

    #[test]
    fn class_maps_every_variant() {
        let cases = [
            (
                Error::invalid_argument("page_size", "must be greater than zero"),
                ErrorClass::InvalidArgument,
            ),
            (Error::empty_result("people"), ErrorClass::EmptyResult),
            (
                Error::CorruptContinuationToken(TokenWireError::UnsupportedVersion { version: 9 }),
                ErrorClass::CorruptContinuationToken,
            ),
            (
                Error::from(StoreError::TableNotFound {
                    table: "people".to_string(),
                }),
                ErrorClass::Storage,
            ),
            (Error::internal("boom"), ErrorClass::Internal),
        ];

        for (err, class) in cases {
            assert_eq!(err.class(), class, "unexpected class for {err}");
        }
    }

    #[test]
    fn invalid_argument_names_the_argument() {
        let err = Error::invalid_argument("partition_key", "must not be blank");

        assert_eq!(err.argument(), Some("partition_key"));
        assert_eq!(
            err.display_with_class(),
            "invalid_argument: invalid argument 'partition_key': must not be blank"
        );
    }

    #[test]
    fn caller_errors_are_not_storage_faults() {
        assert!(ErrorClass::InvalidArgument.is_caller_error());
        assert!(ErrorClass::CorruptContinuationToken.is_caller_error());
        assert!(!ErrorClass::Storage.is_caller_error());
        assert!(!ErrorClass::EmptyResult.is_caller_error());
    }
}
