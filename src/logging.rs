// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures level, format, and noise filters; logs go to stderr so stdout stays clean
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Structured logging for the client and CLI

use anyhow::Result;
use std::env;
use std::io;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to startup events
pub const SERVICE_NAME: &str = "garmin-client";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for structured logging
    pub service_name: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines
    Json,
    /// Multi-line human readable output
    Pretty,
    /// Single-line output
    Compact,
}

impl LogFormat {
    /// Parse a format name, defaulting to compact
    #[must_use]
    pub fn from_str_or_default(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Compact,
            include_location: false,
            service_name: SERVICE_NAME.into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env::var("RUST_LOG").unwrap_or(defaults.level),
            format: env::var("LOG_FORMAT")
                .map_or(defaults.format, |raw| LogFormat::from_str_or_default(&raw)),
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
        }
    }

    /// CLI configuration: environment settings, raised to `debug` when verbose
    #[must_use]
    pub fn for_cli(verbose: bool) -> Self {
        let mut config = Self::from_env();
        if verbose {
            config.level = "debug".into();
        }
        config
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let noise = [
            "hyper=warn",
            "hyper_util=warn",
            "reqwest=warn",
            "rustls=warn",
        ];
        let base = EnvFilter::try_new(&self.level)?;
        Ok(noise.iter().fold(base, |filter, directive| {
            filter.add_directive(directive.parse().unwrap_or_else(|_| Level::WARN.into()))
        }))
    }

    /// Install the global subscriber.
    ///
    /// Calling this more than once is harmless: later calls leave the first
    /// subscriber in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is not a valid filter directive
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter()?);
        let layer = fmt::layer()
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_writer(io::stderr);

        let installed = match self.format {
            LogFormat::Json => registry.with(layer.json()).try_init(),
            LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init(),
        };

        if installed.is_ok() {
            debug!(
                service.name = %self.service_name,
                log.level = %self.level,
                log.format = ?self.format,
                "Logging initialized"
            );
        }
        Ok(())
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
