// ── Error taxonomy ──
//
// Every public operation reports failure as an `OperationError`: a vendor-style
// error code plus the decoded reply that caused it (when there was one).
// Transport failures are folded into the same shape so callers match on one
// type.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::wire::{FieldValue, Mapping};

/// Error codes surfaced as the `result` of a failed operation.
///
/// The string forms match the codes the original PureResponse clients
/// returned, so they can be logged or forwarded unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString,
)]
pub enum ErrorCode {
    #[strum(serialize = "ERROR_NOT_AUTHENTICATED")]
    NotAuthenticated,
    #[strum(serialize = "ERROR_AUTHENTICATION_PARAMETERS")]
    AuthParams,
    #[strum(serialize = "ERROR_AUTHENTICATION_PROCESS")]
    AuthProcess,
    #[strum(serialize = "ERROR_LIST_NOT_FOUND")]
    ListNotFound,
    #[strum(serialize = "ERROR_LIST_NAME_EXISTS")]
    ListNameExists,
    #[strum(serialize = "ERROR_MESSAGE_NOT_FOUND")]
    MessageNotFound,
    #[strum(serialize = "ERROR_MESSAGE_NAME_EXISTS")]
    MessageNameExists,
    #[strum(serialize = "ERROR_LIST_NOT_SAVED")]
    ListNotSaved,
    #[strum(serialize = "ERROR_MESSAGE_NOT_SAVED")]
    MessageNotSaved,
    #[strum(serialize = "ERROR_BEAN_NOT_CREATED")]
    BeanNotCreated,
    #[strum(serialize = "ERROR_COULD_NOT_DELIVER")]
    CouldNotDeliver,
    #[strum(serialize = "ERROR_INVALID_PARAMETERS")]
    InvalidParameters,
    #[strum(serialize = "ERROR_GENERIC")]
    Generic,
    /// The transport collaborator failed before a reply was available.
    #[strum(serialize = "ERROR_TRANSPORT")]
    Transport,
}

/// A failed operation: the error code plus the diagnostic payload.
///
/// `meta` is the decoded vendor reply of the step that failed, or `None`
/// for local precondition failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}")]
pub struct OperationError {
    pub code: ErrorCode,
    pub meta: Option<Mapping>,
}

impl OperationError {
    pub fn new(code: ErrorCode, meta: Option<Mapping>) -> Self {
        Self { code, meta }
    }

    /// An error with no diagnostic payload.
    pub fn bare(code: ErrorCode) -> Self {
        Self { code, meta: None }
    }

    pub fn not_authenticated() -> Self {
        Self::bare(ErrorCode::NotAuthenticated)
    }

    /// Local parameter validation failure, with a human-readable reason.
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        let meta = Mapping::from([("reason".to_owned(), FieldValue::Text(reason.into()))]);
        Self::new(ErrorCode::InvalidParameters, Some(meta))
    }

    pub fn is_not_authenticated(&self) -> bool {
        self.code == ErrorCode::NotAuthenticated
    }
}

/// Convenience alias used by every fallible operation in the workspace.
pub type OperationResult<T> = Result<T, OperationError>;

/// Failure reported by a [`Transport`](crate::transport::Transport)
/// implementation (connection refused, SOAP fault, envelope parse error...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for OperationError {
    fn from(err: TransportError) -> Self {
        let meta = Mapping::from([(
            "transportError".to_owned(),
            FieldValue::Text(err.message),
        )]);
        Self::new(ErrorCode::Transport, Some(meta))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_as_vendor_strings() {
        assert_eq!(ErrorCode::ListNotFound.to_string(), "ERROR_LIST_NOT_FOUND");
        assert_eq!(
            ErrorCode::AuthParams.as_ref(),
            "ERROR_AUTHENTICATION_PARAMETERS"
        );
        let parsed: ErrorCode = "ERROR_GENERIC".parse().unwrap();
        assert_eq!(parsed, ErrorCode::Generic);
    }

    #[test]
    fn transport_error_keeps_message_in_meta() {
        let err = OperationError::from(TransportError::new("connection refused"));
        assert_eq!(err.code, ErrorCode::Transport);
        let meta = err.meta.unwrap();
        assert_eq!(
            meta.get("transportError"),
            Some(&FieldValue::Text("connection refused".into()))
        );
    }

    #[test]
    fn display_is_the_error_code() {
        let err = OperationError::not_authenticated();
        assert_eq!(err.to_string(), "ERROR_NOT_AUTHENTICATED");
        assert!(err.is_not_authenticated());
    }
}
