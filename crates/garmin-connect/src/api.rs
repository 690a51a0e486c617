// ABOUTME: Core collaborator trait for Garmin Connect access
// ABOUTME: Login/MFA handshake types, token store locations, and the data calls the client issues
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Garmin Connect Seam
//!
//! `ConnectApi` is everything the client layer needs from the platform:
//!
//! - **Login handshake**: `login` either completes or hands back an
//!   `MfaChallenge`, which `resume_login` consumes together with a one-time code
//! - **Session persistence**: `load_session` / `dump_session` against a
//!   `TokenLocation`; the on-disk format belongs to the implementation
//! - **Data calls**: activity lists, activity summaries and details, profile
//!
//! Every method reports failures as `ConnectFault`. Callers are expected to
//! route data calls through the call guard, which turns faults into
//! categorized outcomes.

use async_trait::async_trait;
use chrono::NaiveDate;
use garmin_core::errors::ConnectFault;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Account credentials for the password step of the login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Pending second-factor challenge.
///
/// Produced mid-login and consumed by value when the login resumes, so a
/// challenge cannot outlive the attempt that created it.
pub struct MfaChallenge {
    token: String,
}

impl MfaChallenge {
    /// Wrap the opaque challenge token issued by the service
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Opaque challenge token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for MfaChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MfaChallenge").finish_non_exhaustive()
    }
}

/// Result of the credential step
#[derive(Debug)]
pub enum LoginStep {
    /// Tokens were issued; the client is authenticated
    Complete,
    /// The account requires a one-time code
    NeedsMfa(MfaChallenge),
}

/// Where a serialized session lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLocation {
    /// Directory holding one JSON file per token
    Directory(PathBuf),
    /// Single file holding the whole session as a base64 blob
    Base64File(PathBuf),
}

impl TokenLocation {
    /// Filesystem path of this location
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Base64File(path) => path,
        }
    }
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Garmin Connect operations used by the client layer
#[async_trait]
pub trait ConnectApi: Send + Sync {
    /// Submit credentials.
    ///
    /// # Errors
    ///
    /// `Authentication` when the credentials are rejected, `Connection` when
    /// the service is unreachable, `Http` for other non-success responses.
    async fn login(&mut self, credentials: &Credentials) -> Result<LoginStep, ConnectFault>;

    /// Finish a login that stopped at an MFA challenge.
    ///
    /// # Errors
    ///
    /// `Authentication` when the code is rejected; other faults as for `login`.
    async fn resume_login(&mut self, challenge: MfaChallenge, code: &str)
        -> Result<(), ConnectFault>;

    /// Restore a previously dumped session.
    ///
    /// # Errors
    ///
    /// Fails when nothing is stored, the blob cannot be decoded, or the
    /// stored session has expired.
    fn load_session(&mut self, location: &TokenLocation) -> Result<(), ConnectFault>;

    /// Persist the current session.
    ///
    /// # Errors
    ///
    /// Fails when there is no session or the location cannot be written.
    fn dump_session(&self, location: &TokenLocation) -> Result<(), ConnectFault>;

    /// Activities whose start date falls in `[start, end]`, optionally filtered by type
    async fn get_activities_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        activity_type: Option<&str>,
    ) -> Result<Value, ConnectFault>;

    /// Most recent activities, `limit` entries from offset `start`
    async fn get_activities(&self, start: u32, limit: u32) -> Result<Value, ConnectFault>;

    /// Activity summary
    async fn get_activity(&self, activity_id: u64) -> Result<Value, ConnectFault>;

    /// Activity details (metrics, charts)
    async fn get_activity_details(&self, activity_id: u64) -> Result<Value, ConnectFault>;

    /// Profile of the authenticated user
    async fn get_user_profile(&self) -> Result<Value, ConnectFault>;
}
