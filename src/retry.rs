// ABOUTME: Bounded retry policy for the login handshake
// ABOUTME: Decides whether a rejected MFA resume starts another whole login attempt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::defaults;
use crate::errors::{ErrorCategory, ErrorDescriptor};

/// Categories that restart the login by default
pub const DEFAULT_RETRYABLE: &[ErrorCategory] =
    &[ErrorCategory::AuthFailure, ErrorCategory::Unauthorized];

/// How many whole login attempts to make, and which resume failures justify
/// another one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRetryPolicy {
    max_attempts: u32,
    retryable: Vec<ErrorCategory>,
}

impl Default for LoginRetryPolicy {
    fn default() -> Self {
        Self::new(defaults::LOGIN_ATTEMPTS, DEFAULT_RETRYABLE.to_vec())
    }
}

impl LoginRetryPolicy {
    /// Create a policy; zero attempts is treated as one
    #[must_use]
    pub fn new(max_attempts: u32, retryable: Vec<ErrorCategory>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retryable,
        }
    }

    /// Default retryable categories with a custom bound
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_RETRYABLE.to_vec())
    }

    /// Upper bound on whole login attempts
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Categories that restart the login
    #[must_use]
    pub fn retryable(&self) -> &[ErrorCategory] {
        &self.retryable
    }

    /// Whether `category` is worth another attempt
    #[must_use]
    pub fn is_retryable(&self, category: ErrorCategory) -> bool {
        self.retryable.contains(&category)
    }

    /// `true` iff attempt number `attempt` (1-based) was not the last one
    /// and the failure is retryable
    #[must_use]
    pub fn should_retry(&self, attempt: u32, descriptor: &ErrorDescriptor) -> bool {
        attempt < self.max_attempts && self.is_retryable(descriptor.category)
    }
}
