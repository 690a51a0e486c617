// ABOUTME: Unified error handling system with standard error codes
// ABOUTME: Defines AppError, ErrorCode, and the fault/outcome types shared across crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! - `AppError` / `ErrorCode`: errors that escape to callers (login failures,
//!   configuration problems, storage failures, surfaced API failures)
//! - `ConnectFault`: what the Garmin Connect collaborator raises
//! - `CallOutcome` / `ErrorDescriptor` / `ErrorCategory`: the captured form of
//!   a fault after it went through the call guard

/// Faults raised by the Garmin Connect collaborator
pub mod fault;
/// Tagged call outcomes and the error category taxonomy
pub mod outcome;

pub use fault::ConnectFault;
pub use outcome::{CallOutcome, ErrorCategory, ErrorDescriptor};

use crate::constants::messages;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No authenticated session
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Credentials or one-time code rejected
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    /// Account lacks permission
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Rate Limiting (2000-2999)
    /// Too many requests
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded = 2000,

    // Validation (3000-3999)
    /// Request rejected as malformed or unsupported
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    /// Endpoint or resource missing
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// Garmin Connect returned an error
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Garmin Connect unreachable or unavailable
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Login against Garmin Connect failed
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,

    // Configuration (6000-6999)
    /// Configuration error
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Internal error
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Filesystem failure
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// JSON encoding or decoding failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code that best describes this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::AuthRequired | Self::AuthInvalid | Self::ExternalAuthFailed => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::RateLimitExceeded => 429,
            Self::ExternalServiceError => 502,
            Self::ExternalServiceUnavailable => 503,
            Self::ConfigError
            | Self::ConfigMissing
            | Self::InternalError
            | Self::StorageError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required",
            Self::AuthInvalid => "The provided credentials are invalid",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::RateLimitExceeded => "Rate limit exceeded",
            Self::InvalidInput => "The request is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "Garmin Connect encountered an error",
            Self::ExternalServiceUnavailable => "Garmin Connect is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with Garmin Connect failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Data call attempted while no session is established
    #[must_use]
    pub fn not_connected() -> Self {
        Self::new(ErrorCode::AuthRequired, messages::NOT_CONNECTED)
    }

    /// Login failed against Garmin Connect
    #[must_use]
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalAuthFailed, message)
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Required configuration missing
    #[must_use]
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Filesystem failure
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Surface a captured call failure as an error
    #[must_use]
    pub fn from_descriptor(descriptor: ErrorDescriptor) -> Self {
        Self::new(ErrorCode::from(descriptor.category), descriptor.message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<ErrorDescriptor> for AppError {
    fn from(descriptor: ErrorDescriptor) -> Self {
        Self::from_descriptor(descriptor)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::RateLimitExceeded.http_status(), 429);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_not_connected_message() {
        let error = AppError::not_connected();
        assert_eq!(error.code, ErrorCode::AuthRequired);
        assert_eq!(error.message, "Client is not connected");
        assert_eq!(
            error.to_string(),
            "Authentication is required: Client is not connected"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let error = AppError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(error.code, ErrorCode::StorageError);
        assert!(error.source.is_some());
    }

    #[test]
    fn test_descriptor_conversion_keeps_message() {
        let descriptor = ErrorDescriptor::new(ErrorCategory::RateLimited, "slow down");
        let error = AppError::from(descriptor);
        assert_eq!(error.code, ErrorCode::RateLimitExceeded);
        assert_eq!(error.message, "slow down");
    }
}
