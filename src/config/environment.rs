// ABOUTME: Environment configuration for Garmin Connect access
// ABOUTME: Parses credentials, token store paths, reporting dates, limits, and export settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use garmin_connect::Credentials;
use tracing::{debug, info};

use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult};
use crate::retry::LoginRetryPolicy;
use crate::session::SessionSettings;

/// Runtime configuration read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Account email
    pub email: Option<String>,
    /// Account password
    pub password: Option<String>,
    /// Token store directory
    pub token_store: PathBuf,
    /// Base64 token blob file
    pub token_store_base64: PathBuf,
    /// Reference date for ranges
    pub today: NaiveDate,
    /// `today` minus seven days
    pub week_start: NaiveDate,
    /// `today` minus thirty days
    pub month_start: NaiveDate,
    /// Page size for list calls
    pub default_limit: u32,
    /// List offset
    pub start: u32,
    /// Offset for badge calls, which count from 1
    pub start_badge: u32,
    /// Activity type filter (cycling, running, swimming, ...)
    pub activity_type: Option<String>,
    /// Directory receiving `response.json` and exports
    pub export_dir: PathBuf,
    /// Whole login attempts before giving up
    pub login_attempts: u32,
    /// Try stored tokens before credential login
    pub reuse_token_store: bool,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a numeric or boolean variable cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }
        Self::from_env_on(Local::now().date_naive())
    }

    /// Load configuration with an explicit reference date
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when a numeric or boolean variable cannot be parsed
    pub fn from_env_on(today: NaiveDate) -> AppResult<Self> {
        let config = Self {
            email: non_empty_var(env_vars::EMAIL),
            password: non_empty_var(env_vars::PASSWORD),
            token_store: expand_tilde(
                &non_empty_var(env_vars::TOKEN_STORE)
                    .unwrap_or_else(|| defaults::TOKEN_STORE.to_owned()),
            ),
            token_store_base64: expand_tilde(
                &non_empty_var(env_vars::TOKEN_STORE_BASE64)
                    .unwrap_or_else(|| defaults::TOKEN_STORE_BASE64.to_owned()),
            ),
            today,
            week_start: today - Duration::days(defaults::WEEK_DAYS),
            month_start: today - Duration::days(defaults::MONTH_DAYS),
            default_limit: defaults::DEFAULT_LIMIT,
            start: defaults::START,
            start_badge: defaults::START_BADGE,
            activity_type: non_empty_var(env_vars::ACTIVITY_TYPE),
            export_dir: non_empty_var(env_vars::EXPORT_DIR)
                .map_or_else(|| PathBuf::from(defaults::EXPORT_DIR), PathBuf::from),
            login_attempts: parse_var(env_vars::LOGIN_ATTEMPTS, defaults::LOGIN_ATTEMPTS)?,
            reuse_token_store: parse_bool(env_vars::REUSE_TOKENS, true)?,
        };

        info!(
            token_store = %config.token_store.display(),
            export_dir = %config.export_dir.display(),
            has_credentials = config.credentials().is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Credentials, present only when both email and password are set
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }

    /// Create the export directory if it does not exist
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the directory cannot be created
    pub fn ensure_dirs(&self) -> AppResult<()> {
        fs::create_dir_all(&self.export_dir).map_err(|e| {
            AppError::storage(format!(
                "Failed to create export directory {}: {e}",
                self.export_dir.display()
            ))
        })
    }

    /// Login inputs derived from this configuration
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            credentials: self.credentials(),
            token_store: self.token_store.clone(),
            token_store_base64: self.token_store_base64.clone(),
            reuse_token_store: self.reuse_token_store,
            retry_policy: LoginRetryPolicy::with_max_attempts(self.login_attempts),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    non_empty_var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|_| AppError::config(format!("Invalid {key} value: {raw}")))
    })
}

fn parse_bool(key: &str, default: bool) -> AppResult<bool> {
    let Some(raw) = non_empty_var(key) else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::config(format!("Invalid {key} value: {raw}"))),
    }
}

/// Expand a leading `~` to the home directory
#[must_use]
pub fn expand_tilde(raw: &str) -> PathBuf {
    let Some(rest) = raw.strip_prefix('~') else {
        return PathBuf::from(raw);
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => rest
            .strip_prefix(['/', '\\'])
            .map_or_else(|| PathBuf::from(raw), |tail| home.join(Path::new(tail))),
        None => PathBuf::from(raw),
    }
}
