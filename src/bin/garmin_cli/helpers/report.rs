// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Check results and console markers for garmin-cli
// ABOUTME: CliError separates failed expectations from library errors

use garmin_client::errors::AppError;
use serde_json::Value;
use thiserror::Error;

/// Why a command failed
#[derive(Debug, Error)]
pub enum CliError {
    /// Login did not complete
    #[error("Login failed: {0}")]
    Login(AppError),
    /// A response did not meet the command's expectations
    #[error("{0}")]
    Check(String),
    /// Library error outside login
    #[error(transparent)]
    App(#[from] AppError),
}

impl CliError {
    pub fn check(message: impl Into<String>) -> Self {
        Self::Check(message.into())
    }
}

pub fn ok(message: &str) {
    println!("✅ {message}");
}

/// Number of records in a list response; anything else counts as zero
pub fn record_count(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}
