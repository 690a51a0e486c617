// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Builds the Garmin Connect session for garmin-cli commands
// ABOUTME: Loads configuration, prepares the export directory, and logs in with a terminal MFA prompt

use garmin_client::config::Config;
use garmin_client::session::SessionManager;
use garmin_client::utils::stdin_mfa_prompt;
use garmin_connect::{ConnectConfig, GarminConnect};
use tracing::info;

use super::report::CliError;

pub type Session = SessionManager<GarminConnect>;

/// Load configuration and make sure the export directory exists
pub fn load_config() -> Result<Config, CliError> {
    let config = Config::from_env()?;
    config.ensure_dirs()?;
    Ok(config)
}

/// Log in, prompting on the terminal if a one-time code is requested
pub async fn login(config: &Config) -> Result<Session, CliError> {
    let api = GarminConnect::new(ConnectConfig::from_env());
    let mut session = SessionManager::new(api, config.session_settings());
    let mut prompt = stdin_mfa_prompt();

    session
        .login(Some(prompt.as_mut()))
        .await
        .map_err(CliError::Login)?;

    info!(attempts = session.attempts_made(), "garmin-cli session ready");
    Ok(session)
}
