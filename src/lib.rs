// ABOUTME: Main library entry point for the Garmin Connect client toolkit
// ABOUTME: Guarded API calls, login/MFA session management, JSON display and export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Garmin Client
//!
//! A thin layer over a Garmin Connect collaborator (`garmin_connect::ConnectApi`).
//!
//! ## Architecture
//!
//! - **Call Guard**: runs one external call and turns any fault into a
//!   categorized `CallOutcome`, warning about everything except 400s
//! - **Session**: login state machine with MFA, bounded retry of rejected
//!   one-time codes, and token store reuse/persistence
//! - **Display / Export**: pretty-printed responses mirrored to
//!   `response.json`, and JSON exports under the export directory
//! - **Config / Logging**: environment-driven settings and `tracing` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use garmin_client::config::Config;
//! use garmin_client::errors::AppResult;
//! use garmin_client::session::SessionManager;
//! use garmin_connect::{ConnectConfig, GarminConnect};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> AppResult<()> {
//!     let config = Config::from_env()?;
//!     let api = GarminConnect::new(ConnectConfig::from_env());
//!     let mut session = SessionManager::new(api, config.session_settings());
//!
//!     session.login(None).await?;
//!     let profile = session.get_user_profile().await?;
//!     println!("{profile}");
//!     Ok(())
//! }
//! ```

/// Safe external call wrapper with categorized fault translation
pub mod call_guard;
/// Environment-based configuration
pub mod config;
/// Response display and `response.json` mirroring
pub mod display;
/// Unified error handling system
pub mod errors;
/// JSON export helpers
pub mod exporters;
/// Structured logging setup
pub mod logging;
/// Login retry policy
pub mod retry;
/// Login/MFA state machine and guarded data calls
pub mod session;
/// Terminal helpers: key reads, MFA prompt, duration formatting
pub mod utils;

/// Application constants
pub use garmin_core::constants;
