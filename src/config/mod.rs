// ABOUTME: Configuration management module for the Garmin client toolkit
// ABOUTME: Environment-driven settings for credentials, token stores, dates, and export paths
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module
//!
//! Configuration is environment-only. An optional `.env` file is loaded first
//! so local runs do not need exported variables.

/// Environment configuration
pub mod environment;

pub use environment::Config;
