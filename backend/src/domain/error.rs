//! Domain-level error types.
//!
//! These errors are transport agnostic. The excluded HTTP layer maps them to
//! status codes; [`ErrorCode::is_caller_fault`] tells it whether the caller or
//! the system is to blame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A supplied or stored coordinate pair is malformed or out of range.
    InvalidLocation,
    /// The operation needs a position and none is available.
    LocationRequired,
    /// A rating value is outside `1..=5` or not an integer.
    InvalidRating,
    /// The request is malformed or fails validation for another reason.
    InvalidRequest,
    /// The referenced provider does not exist.
    ProviderNotFound,
    /// The referenced requester does not exist.
    RequesterNotFound,
    /// Concurrent writers kept invalidating an optimistic update.
    Conflict,
    /// The underlying store could not be reached or failed a query.
    StoreUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Whether the failure was caused by the caller's input rather than the
    /// system.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::ErrorCode;
    ///
    /// assert!(ErrorCode::LocationRequired.is_caller_fault());
    /// assert!(!ErrorCode::StoreUnavailable.is_caller_fault());
    /// ```
    pub fn is_caller_fault(self) -> bool {
        matches!(
            self,
            Self::InvalidLocation
                | Self::LocationRequired
                | Self::InvalidRating
                | Self::InvalidRequest
                | Self::ProviderNotFound
                | Self::RequesterNotFound
        )
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use marketplace::domain::{Error, ErrorCode};
///
/// let err = Error::provider_not_found("missing");
/// assert_eq!(err.code(), ErrorCode::ProviderNotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// # Panics
    /// Panics when `message` is blank; use [`Error::try_new`] for untrusted
    /// input.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "category" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidLocation`].
    pub fn invalid_location(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidLocation, message)
    }

    /// Convenience constructor for [`ErrorCode::LocationRequired`].
    pub fn location_required(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LocationRequired, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRating`].
    pub fn invalid_rating(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRating, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::ProviderNotFound`].
    pub fn provider_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProviderNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::RequesterNotFound`].
    pub fn requester_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequesterNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreUnavailable`].
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}
