// ABOUTME: Re-exports the unified error types from garmin-core
// ABOUTME: AppError/ErrorCode for the client layer plus the call outcome taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The types live in `garmin-core` so the adapter crate and the client layer
//! share one taxonomy. This module keeps the `garmin_client::errors` path
//! stable for binaries and tests.

pub use garmin_core::errors::{
    AppError, AppResult, CallOutcome, ConnectFault, ErrorCategory, ErrorCode, ErrorDescriptor,
};
