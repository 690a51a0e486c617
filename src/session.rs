// ABOUTME: Login/MFA state machine that owns the authenticated Garmin Connect session
// ABOUTME: Token store reuse, bounded MFA retry, token persistence, and guarded data calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Manager
//!
//! ```text
//! Unauthenticated ──login──► Authenticated
//!        │                        ▲
//!        └──► AwaitingMfa ──code──┘
//!                  │
//!                  └──► LoginFailed
//! ```
//!
//! A stored session is tried first (token directory, then the base64 file).
//! Otherwise the credential step runs; when the service asks for a second
//! factor the caller-supplied [`MfaPrompt`] is consulted. A rejected code
//! restarts the whole login while the [`LoginRetryPolicy`] allows it.
//!
//! Data calls never retry: they fail fast when not connected and otherwise
//! run once through the [`CallGuard`].

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use chrono::NaiveDate;
use garmin_connect::{ConnectApi, Credentials, LoginStep, TokenLocation};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::call_guard::{classify, describe_call, CallGuard};
use crate::constants::messages;
use crate::errors::{AppError, AppResult, ConnectFault};
use crate::retry::LoginRetryPolicy;

/// Where the session manager is in the login handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No login attempted yet
    Unauthenticated,
    /// The service asked for a one-time code
    AwaitingMfa,
    /// Data calls are allowed
    Authenticated,
    /// Login gave up
    LoginFailed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::AwaitingMfa => "awaiting_mfa",
            Self::Authenticated => "authenticated",
            Self::LoginFailed => "login_failed",
        };
        f.write_str(name)
    }
}

/// Supplies the one-time code when the service requests a second factor.
///
/// The call may block for as long as it needs; there is no timeout.
pub trait MfaPrompt: Send {
    /// Obtain the code
    ///
    /// # Errors
    ///
    /// Returns an error if no code can be obtained (e.g. input closed)
    fn one_time_code(&mut self) -> AppResult<String>;
}

impl<F> MfaPrompt for F
where
    F: FnMut() -> AppResult<String> + Send,
{
    fn one_time_code(&mut self) -> AppResult<String> {
        self()
    }
}

/// Inputs to the login state machine
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Credentials for the password step; `None` allows token reuse only
    pub credentials: Option<Credentials>,
    /// Token store directory
    pub token_store: PathBuf,
    /// Base64 token blob file
    pub token_store_base64: PathBuf,
    /// Try stored tokens before the credential step
    pub reuse_token_store: bool,
    /// Login retry bound
    pub retry_policy: LoginRetryPolicy,
}

impl SessionSettings {
    /// Locations tried on load and written on persist, in order
    #[must_use]
    pub fn token_locations(&self) -> [TokenLocation; 2] {
        [
            TokenLocation::Directory(self.token_store.clone()),
            TokenLocation::Base64File(self.token_store_base64.clone()),
        ]
    }
}

/// Owns one Garmin Connect collaborator and its login state
pub struct SessionManager<A: ConnectApi> {
    api: A,
    settings: SessionSettings,
    guard: CallGuard,
    state: SessionState,
    attempts: u32,
}

impl<A: ConnectApi> SessionManager<A> {
    /// Create an unauthenticated manager with the default call guard
    #[must_use]
    pub fn new(api: A, settings: SessionSettings) -> Self {
        Self::with_guard(api, settings, CallGuard::new())
    }

    /// Create a manager with a custom call guard
    #[must_use]
    pub fn with_guard(api: A, settings: SessionSettings, guard: CallGuard) -> Self {
        Self {
            api,
            settings,
            guard,
            state: SessionState::Unauthenticated,
            attempts: 0,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// `true` once login has completed
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Credential attempts made by the last login
    #[must_use]
    pub const fn attempts_made(&self) -> u32 {
        self.attempts
    }

    /// Give back the collaborator, ending the session
    #[must_use]
    pub fn into_api(self) -> A {
        self.api
    }

    /// Guard used for data calls
    #[must_use]
    pub const fn guard(&self) -> &CallGuard {
        &self.guard
    }

    /// Settings in use
    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Log in, reusing a stored session when possible.
    ///
    /// # Errors
    ///
    /// - `ConfigMissing` when no stored session is usable and credentials are absent
    /// - `ExternalAuthFailed` when MFA is requested without a prompt
    /// - the classified login fault once retries are exhausted or the fault
    ///   is not retryable
    pub async fn login(&mut self, mfa: Option<&mut dyn MfaPrompt>) -> AppResult<()> {
        self.attempts = 0;

        if self.settings.reuse_token_store && self.restore_session() {
            self.state = SessionState::Authenticated;
            return Ok(());
        }

        let Some(credentials) = self.settings.credentials.clone() else {
            self.state = SessionState::LoginFailed;
            return Err(AppError::config_missing(
                "EMAIL and PASSWORD must be set when no stored session is available",
            ));
        };

        match self.login_with_credentials(&credentials, mfa).await {
            Ok(()) => {
                self.persist_session();
                self.state = SessionState::Authenticated;
                info!(attempts = self.attempts, "Logged in to Garmin Connect");
                Ok(())
            }
            Err(error) => {
                self.state = SessionState::LoginFailed;
                warn!(attempts = self.attempts, error = %error, "Login failed");
                Err(error)
            }
        }
    }

    fn restore_session(&mut self) -> bool {
        for location in self.settings.token_locations() {
            match self.api.load_session(&location) {
                Ok(()) => {
                    info!(location = %location, "Reusing stored Garmin Connect session");
                    return true;
                }
                Err(fault) => debug!(location = %location, reason = %fault, "Stored session unusable"),
            }
        }
        false
    }

    async fn login_with_credentials(
        &mut self,
        credentials: &Credentials,
        mut mfa: Option<&mut dyn MfaPrompt>,
    ) -> AppResult<()> {
        let policy = self.settings.retry_policy.clone();

        for attempt in 1..=policy.max_attempts() {
            self.attempts = attempt;
            self.state = SessionState::Unauthenticated;

            let step = self
                .api
                .login(credentials)
                .await
                .map_err(|fault| AppError::from_descriptor(classify(&fault)))?;

            let challenge = match step {
                LoginStep::Complete => return Ok(()),
                LoginStep::NeedsMfa(challenge) => challenge,
            };
            self.state = SessionState::AwaitingMfa;

            let Some(prompt) = mfa.as_deref_mut() else {
                return Err(AppError::auth_failed(messages::MFA_REQUIRED));
            };
            let code = prompt.one_time_code()?;

            let Err(fault) = self.api.resume_login(challenge, &code).await else {
                return Ok(());
            };
            let descriptor = classify(&fault);
            if !policy.should_retry(attempt, &descriptor) {
                return Err(AppError::from_descriptor(descriptor));
            }
            warn!(
                attempt,
                max_attempts = policy.max_attempts(),
                category = %descriptor.category,
                "One-time code rejected, retrying login"
            );
        }

        Err(AppError::auth_failed(format!(
            "Login failed after {} attempts",
            policy.max_attempts()
        )))
    }

    fn persist_session(&self) {
        for location in self.settings.token_locations() {
            if let Err(fault) = self.api.dump_session(&location) {
                warn!(location = %location, reason = %fault, "Failed to persist session tokens");
            }
        }
    }

    /// Fail fast unless logged in
    ///
    /// # Errors
    ///
    /// `AuthRequired` ("Client is not connected") when not authenticated
    pub fn ensure_connected(&self) -> AppResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(AppError::not_connected())
        }
    }

    async fn guarded<F>(&self, operation: &str, future: F) -> AppResult<Value>
    where
        F: Future<Output = Result<Value, ConnectFault>> + Send,
    {
        self.ensure_connected()?;
        self.guard.run(operation, future).await.into_app_result()
    }

    /// Activities between two dates (inclusive), optionally of one type
    ///
    /// # Errors
    ///
    /// Not connected, or the call failed (code derived from the failure category)
    pub async fn get_activities_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        activity_type: Option<&str>,
    ) -> AppResult<Value> {
        let operation = describe_call("get_activities_by_date", &[&start, &end]);
        self.guarded(
            &operation,
            self.api.get_activities_by_date(start, end, activity_type),
        )
        .await
    }

    /// Most recent activities
    ///
    /// # Errors
    ///
    /// Not connected, or the call failed
    pub async fn get_activities(&self, start: u32, limit: u32) -> AppResult<Value> {
        let operation = describe_call("get_activities", &[&start, &limit]);
        self.guarded(&operation, self.api.get_activities(start, limit))
            .await
    }

    /// Activity summary
    ///
    /// # Errors
    ///
    /// Not connected, or the call failed
    pub async fn get_activity(&self, activity_id: u64) -> AppResult<Value> {
        let operation = describe_call("get_activity", &[&activity_id]);
        self.guarded(&operation, self.api.get_activity(activity_id))
            .await
    }

    /// Activity details
    ///
    /// # Errors
    ///
    /// Not connected, or the call failed
    pub async fn get_activity_details(&self, activity_id: u64) -> AppResult<Value> {
        let operation = describe_call("get_activity_details", &[&activity_id]);
        self.guarded(&operation, self.api.get_activity_details(activity_id))
            .await
    }

    /// Profile of the logged-in user
    ///
    /// # Errors
    ///
    /// Not connected, or the call failed
    pub async fn get_user_profile(&self) -> AppResult<Value> {
        self.guarded("get_user_profile()", self.api.get_user_profile())
            .await
    }
}
