// ABOUTME: Fault types raised by the Garmin Connect collaborator
// ABOUTME: HTTP, authentication, connectivity, and rate limit faults before classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// A failure raised by an external Garmin Connect call.
///
/// Faults are never surfaced to callers directly: the call guard captures
/// them and turns them into an `ErrorDescriptor`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectFault {
    /// Non-success HTTP response. `status` is absent when the transport only
    /// produced a message (status codes then have to be read from the text).
    #[error("{message}")]
    Http {
        /// Status code, when attached to the fault
        status: Option<u16>,
        /// Transport message, e.g. `500 Server Error for url: ...`
        message: String,
    },

    /// Credentials, one-time code, or stored token rejected
    #[error("{0}")]
    Authentication(String),

    /// Host unreachable, DNS failure, timeout, reset connection
    #[error("{0}")]
    Connection(String),

    /// The service throttled the caller
    #[error("{0}")]
    TooManyRequests(String),

    /// Anything else: decoding failures, bad arguments, local I/O
    #[error("{0}")]
    Other(String),
}

impl ConnectFault {
    /// HTTP fault carrying a status code
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status: Some(status),
            message: message.into(),
        }
    }

    /// HTTP fault whose status is only present in its message
    #[must_use]
    pub fn http_message(message: impl Into<String>) -> Self {
        Self::Http {
            status: None,
            message: message.into(),
        }
    }

    /// Authentication fault
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Connectivity fault
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Any other fault
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Status code attached to an HTTP fault
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(feature = "http-errors")]
impl From<reqwest::Error> for ConnectFault {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            return Self::Connection(error.to_string());
        }
        if let Some(status) = error.status() {
            return Self::http(status.as_u16(), error.to_string());
        }
        if error.is_decode() || error.is_body() {
            return Self::Other(format!("Failed to decode response: {error}"));
        }
        Self::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let fault = ConnectFault::http(500, "500 Server Error for url: https://x");
        assert_eq!(fault.to_string(), "500 Server Error for url: https://x");
        assert_eq!(ConnectFault::connection("down").to_string(), "down");
    }

    #[test]
    fn test_status_only_on_http() {
        assert_eq!(ConnectFault::http(404, "nope").status(), Some(404));
        assert_eq!(ConnectFault::http_message("404 nope").status(), None);
        assert_eq!(ConnectFault::authentication("bad").status(), None);
    }
}
