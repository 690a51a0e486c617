// ABOUTME: Garmin Connect collaborator seam and its HTTP implementation
// ABOUTME: ConnectApi trait, login handshake types, session tokens, and the reqwest-based adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Connect
//!
//! The client layer talks to Garmin Connect only through [`ConnectApi`].
//! [`GarminConnect`] is the production implementation; tests substitute a
//! scripted fake.
//!
//! ## Modules
//!
//! - **api**: the trait plus `Credentials`, `MfaChallenge`, `LoginStep`, `TokenLocation`
//! - **tokens**: `TokenBundle` and its directory / base64 storage formats
//! - **garmin**: `GarminConnect` and `ConnectConfig`
//! - **`http_client`**: pooled reqwest clients

/// Collaborator trait and login handshake types
pub mod api;

/// HTTP adapter
pub mod garmin;

/// Shared HTTP clients
pub mod http_client;

/// Session token persistence
pub mod tokens;

pub use api::{ConnectApi, Credentials, LoginStep, MfaChallenge, TokenLocation};
pub use garmin::{ConnectConfig, GarminConnect};
pub use tokens::TokenBundle;
