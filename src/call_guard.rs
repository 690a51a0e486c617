// ABOUTME: Safe wrapper around single Garmin Connect calls
// ABOUTME: Captures faults and panics, classifies them, and warns through a pluggable sink
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Call Guard
//!
//! Every external call goes through [`CallGuard`]. The guard never returns an
//! error and never unwinds: a normal return becomes `CallOutcome::Success`,
//! anything else becomes `CallOutcome::Failure` carrying an
//! [`ErrorDescriptor`] produced by [`classify`].
//!
//! Failures are reported once through a [`WarningSink`] as
//! `⚠️ {operation} failed: {message}`, except for 400 responses, which usually
//! mean the feature is not enabled for the account and are too common to be
//! worth a warning.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::{json, Value};
use tracing::warn;

use crate::constants::messages;
use crate::errors::{CallOutcome, ConnectFault, ErrorCategory, ErrorDescriptor};

/// Destination for call failure warnings
pub trait WarningSink: Send + Sync {
    /// Report a failed operation
    fn warn(&self, operation: &str, descriptor: &ErrorDescriptor);
}

/// Writes the warning line to stderr and emits a `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl WarningSink for StderrSink {
    fn warn(&self, operation: &str, descriptor: &ErrorDescriptor) {
        eprintln!("⚠️ {operation} failed: {}", descriptor.message);
        warn!(
            operation = %operation,
            category = %descriptor.category,
            "{}",
            descriptor.message
        );
    }
}

/// Ordered substring checks for faults whose status only appears in the text
const MESSAGE_PATTERNS: &[(&[&str], ErrorCategory)] = &[
    (&["400", "Bad Request"], ErrorCategory::BadRequest),
    (&["401"], ErrorCategory::Unauthorized),
    (&["403"], ErrorCategory::Forbidden),
    (&["404"], ErrorCategory::NotFound),
    (&["429"], ErrorCategory::RateLimited),
    (&["500"], ErrorCategory::ServerError),
    (&["503"], ErrorCategory::ServiceUnavailable),
];

/// Fixed message for a status-derived category
#[must_use]
pub const fn status_message(category: ErrorCategory) -> Option<&'static str> {
    match category {
        ErrorCategory::BadRequest => Some(messages::BAD_REQUEST),
        ErrorCategory::Unauthorized => Some(messages::UNAUTHORIZED),
        ErrorCategory::Forbidden => Some(messages::FORBIDDEN),
        ErrorCategory::NotFound => Some(messages::NOT_FOUND),
        ErrorCategory::RateLimited => Some(messages::RATE_LIMITED),
        ErrorCategory::ServerError => Some(messages::SERVER_ERROR),
        ErrorCategory::ServiceUnavailable => Some(messages::SERVICE_UNAVAILABLE),
        ErrorCategory::ConnectionFailure
        | ErrorCategory::AuthFailure
        | ErrorCategory::Unexpected => None,
    }
}

fn from_category(category: ErrorCategory) -> Option<ErrorDescriptor> {
    status_message(category).map(|message| ErrorDescriptor::new(category, message))
}

fn category_from_message(message: &str) -> Option<ErrorCategory> {
    MESSAGE_PATTERNS
        .iter()
        .find(|(needles, _)| needles.iter().all(|needle| message.contains(needle)))
        .map(|(_, category)| *category)
}

/// Classify a collaborator fault.
///
/// Pure: the same fault always yields the same descriptor.
#[must_use]
pub fn classify(fault: &ConnectFault) -> ErrorDescriptor {
    match fault {
        ConnectFault::Http { status, message } => status
            .and_then(ErrorCategory::from_status)
            .or_else(|| category_from_message(message))
            .and_then(from_category)
            .unwrap_or_else(|| {
                ErrorDescriptor::new(
                    ErrorCategory::Unexpected,
                    format!("{}: {fault}", messages::HTTP_ERROR_PREFIX),
                )
            }),
        ConnectFault::Authentication(text) => ErrorDescriptor::new(
            ErrorCategory::AuthFailure,
            format!("{}: {text}", messages::AUTH_ISSUE_PREFIX),
        ),
        ConnectFault::Connection(text) => ErrorDescriptor::new(
            ErrorCategory::ConnectionFailure,
            format!("{}: {text}", messages::CONNECTION_ISSUE_PREFIX),
        ),
        ConnectFault::TooManyRequests(_) => {
            ErrorDescriptor::new(ErrorCategory::RateLimited, messages::RATE_LIMITED)
        }
        ConnectFault::Other(text) => unexpected(text),
    }
}

fn unexpected(text: &str) -> ErrorDescriptor {
    ErrorDescriptor::new(
        ErrorCategory::Unexpected,
        format!("{}: {text}", messages::UNEXPECTED_PREFIX),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "operation panicked".to_owned())
}

/// Render `method(arg1, arg2)` for display and warnings
#[must_use]
pub fn describe_call(method: &str, args: &[&dyn Display]) -> String {
    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    format!("{method}({})", rendered.join(", "))
}

/// Runs external operations and converts every failure into a `CallOutcome`
#[derive(Clone)]
pub struct CallGuard {
    sink: Arc<dyn WarningSink>,
}

impl Default for CallGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGuard {
    /// Guard reporting to stderr and `tracing`
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(Arc::new(StderrSink))
    }

    /// Guard reporting to a custom sink
    #[must_use]
    pub fn with_sink(sink: Arc<dyn WarningSink>) -> Self {
        Self { sink }
    }

    /// Await an operation and capture its outcome
    pub async fn run<T, F>(&self, operation: &str, future: F) -> CallOutcome<T>
    where
        F: Future<Output = Result<T, ConnectFault>> + Send,
        T: Send,
    {
        let result = AssertUnwindSafe(future).catch_unwind().await;
        self.settle(operation, result)
    }

    /// Run a blocking operation and capture its outcome
    pub fn run_sync<T, F>(&self, operation: &str, call: F) -> CallOutcome<T>
    where
        F: FnOnce() -> Result<T, ConnectFault>,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(call));
        self.settle(operation, result)
    }

    /// Run an operation for a grouped display.
    ///
    /// Success yields `(description, value)`; failure yields
    /// `("{description} [ERROR]", {"error": message})`.
    pub async fn run_for_group<F>(
        &self,
        operation: &str,
        description: &str,
        future: F,
    ) -> (String, Value)
    where
        F: Future<Output = Result<Value, ConnectFault>> + Send,
    {
        match self.run(operation, future).await {
            CallOutcome::Success(value) => (description.to_owned(), value),
            CallOutcome::Failure(descriptor) => (
                format!("{description} [ERROR]"),
                json!({ "error": descriptor.message }),
            ),
        }
    }

    fn settle<T>(
        &self,
        operation: &str,
        result: Result<Result<T, ConnectFault>, Box<dyn Any + Send>>,
    ) -> CallOutcome<T> {
        let descriptor = match result {
            Ok(Ok(value)) => return CallOutcome::Success(value),
            Ok(Err(fault)) => classify(&fault),
            Err(payload) => unexpected(&panic_message(payload.as_ref())),
        };

        if descriptor.category.is_reportable() {
            self.sink.warn(operation, &descriptor);
        }
        CallOutcome::Failure(descriptor)
    }
}
