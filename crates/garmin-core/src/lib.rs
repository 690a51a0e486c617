// ABOUTME: Core types and constants for the Garmin Connect client toolkit
// ABOUTME: Foundation crate with the fault taxonomy, call outcomes, unified errors, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Core
//!
//! Foundation crate shared by the Garmin Connect adapter and the client
//! layer.
//!
//! ## Modules
//!
//! - **errors**: `AppError`/`ErrorCode`, the collaborator's `ConnectFault`,
//!   and the `CallOutcome`/`ErrorDescriptor`/`ErrorCategory` taxonomy
//! - **constants**: environment variable names, defaults, endpoints, messages

/// Unified error handling system
pub mod errors;

/// Application constants organized by domain
pub mod constants;
