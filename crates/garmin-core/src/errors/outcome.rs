// ABOUTME: Tagged call outcomes and the error category taxonomy
// ABOUTME: CallOutcome carries either the returned value or a categorized ErrorDescriptor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to a captured fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 400: usually an endpoint not enabled for the account or region
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429 or an explicit throttling fault
    RateLimited,
    /// 500
    ServerError,
    /// 503
    ServiceUnavailable,
    /// Transport could not reach the service
    ConnectionFailure,
    /// Authentication-specific fault
    AuthFailure,
    /// Catch-all
    Unexpected,
}

impl ErrorCategory {
    /// Map an HTTP status code to its category, if it is one we recognize
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            429 => Some(Self::RateLimited),
            500 => Some(Self::ServerError),
            503 => Some(Self::ServiceUnavailable),
            _ => None,
        }
    }

    /// Whether a failure in this category deserves a warning line.
    ///
    /// 400 responses mean "feature unavailable" and are expected often
    /// enough that reporting them is noise.
    #[must_use]
    pub const fn is_reportable(self) -> bool {
        !matches!(self, Self::BadRequest)
    }

    /// Stable snake-case name used in structured logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::ConnectionFailure => "connection_failure",
            Self::AuthFailure => "auth_failure",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCategory> for ErrorCode {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::BadRequest => Self::InvalidInput,
            ErrorCategory::Unauthorized => Self::AuthRequired,
            ErrorCategory::Forbidden => Self::PermissionDenied,
            ErrorCategory::NotFound => Self::ResourceNotFound,
            ErrorCategory::RateLimited => Self::RateLimitExceeded,
            ErrorCategory::ServerError | ErrorCategory::Unexpected => Self::ExternalServiceError,
            ErrorCategory::ServiceUnavailable | ErrorCategory::ConnectionFailure => {
                Self::ExternalServiceUnavailable
            }
            ErrorCategory::AuthFailure => Self::ExternalAuthFailed,
        }
    }
}

/// Categorized, human-readable description of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Category of the underlying fault
    pub category: ErrorCategory,
    /// Message suitable for display
    pub message: String,
}

impl ErrorDescriptor {
    /// Create a descriptor
    #[must_use]
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of invoking an external operation through the call guard.
///
/// A success may carry an empty or null value; use [`CallOutcome::is_ok`]
/// rather than inspecting the value to tell "no data" from "call failed".
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// The operation returned normally
    Success(T),
    /// The operation raised a fault
    Failure(ErrorDescriptor),
}

impl<T> CallOutcome<T> {
    /// `true` when the operation returned normally
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returned value, present only on success
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Error descriptor, present only on failure
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            Self::Success(_) => None,
            Self::Failure(descriptor) => Some(descriptor),
        }
    }

    /// Split into the `(success, result, error_message)` triple
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<T>, Option<String>) {
        match self {
            Self::Success(value) => (true, Some(value), None),
            Self::Failure(descriptor) => (false, None, Some(descriptor.message)),
        }
    }

    /// Convert into a `Result` keeping the descriptor
    ///
    /// # Errors
    ///
    /// Returns the descriptor when the outcome is a failure
    pub fn into_result(self) -> Result<T, ErrorDescriptor> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(descriptor) => Err(descriptor),
        }
    }

    /// Convert into an `AppResult`
    ///
    /// # Errors
    ///
    /// Returns an `AppError` whose code derives from the failure category
    pub fn into_app_result(self) -> Result<T, AppError> {
        self.into_result().map_err(AppError::from_descriptor)
    }

    /// Map the success value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CallOutcome<U> {
        match self {
            Self::Success(value) => CallOutcome::Success(f(value)),
            Self::Failure(descriptor) => CallOutcome::Failure(descriptor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_covers_known_codes() {
        assert_eq!(
            ErrorCategory::from_status(400),
            Some(ErrorCategory::BadRequest)
        );
        assert_eq!(
            ErrorCategory::from_status(503),
            Some(ErrorCategory::ServiceUnavailable)
        );
        assert_eq!(ErrorCategory::from_status(418), None);
        assert_eq!(ErrorCategory::from_status(502), None);
    }

    #[test]
    fn test_only_bad_request_is_silent() {
        assert!(!ErrorCategory::BadRequest.is_reportable());
        assert!(ErrorCategory::NotFound.is_reportable());
        assert!(ErrorCategory::Unexpected.is_reportable());
    }

    #[test]
    fn test_failure_parts() {
        let outcome: CallOutcome<u32> =
            CallOutcome::Failure(ErrorDescriptor::new(ErrorCategory::NotFound, "missing"));
        assert!(!outcome.is_ok());
        assert!(outcome.value().is_none());
        assert_eq!(outcome.into_parts(), (false, None, Some("missing".to_owned())));
    }

    #[test]
    fn test_empty_success_is_still_success() {
        let outcome = CallOutcome::Success(Vec::<u8>::new());
        assert!(outcome.is_ok());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.into_result(), Ok(Vec::new()));
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::ServiceUnavailable).ok();
        assert_eq!(json.as_deref(), Some("\"service_unavailable\""));
    }
}
