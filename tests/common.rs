// ABOUTME: Shared test utilities for the root crate integration tests
// ABOUTME: Scripted ConnectApi fake, recording warning sink, and session settings builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
//! Shared test utilities for `garmin_client`
//!
//! [`ScriptedApi`] plays back queued login and resume results and answers
//! data calls from a per-method table, recording what it was asked.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use garmin_client::call_guard::WarningSink;
use garmin_client::errors::{ConnectFault, ErrorDescriptor};
use garmin_client::retry::LoginRetryPolicy;
use garmin_client::session::SessionSettings;
use garmin_connect::{ConnectApi, Credentials, LoginStep, MfaChallenge, TokenLocation};
use serde_json::Value;

/// Scripted result of the credential step
#[derive(Debug, Clone)]
pub enum ScriptedLogin {
    Complete,
    NeedsMfa,
    Fail(ConnectFault),
}

/// `ConnectApi` fake driven by queued results
#[derive(Default)]
pub struct ScriptedApi {
    pub logins: VecDeque<ScriptedLogin>,
    pub resumes: VecDeque<Result<(), ConnectFault>>,
    pub stored_session: Option<TokenLocation>,
    pub responses: HashMap<&'static str, Result<Value, ConnectFault>>,
    pub login_calls: u32,
    pub codes: Vec<String>,
    pub loaded: Vec<TokenLocation>,
    pub dumped: Mutex<Vec<TokenLocation>>,
    pub fail_dump: bool,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logins(mut self, logins: impl IntoIterator<Item = ScriptedLogin>) -> Self {
        self.logins = logins.into_iter().collect();
        self
    }

    pub fn with_resumes(
        mut self,
        resumes: impl IntoIterator<Item = Result<(), ConnectFault>>,
    ) -> Self {
        self.resumes = resumes.into_iter().collect();
        self
    }

    pub fn with_stored_session(mut self, location: TokenLocation) -> Self {
        self.stored_session = Some(location);
        self
    }

    pub fn with_response(
        mut self,
        method: &'static str,
        response: Result<Value, ConnectFault>,
    ) -> Self {
        self.responses.insert(method, response);
        self
    }

    pub fn dumped(&self) -> Vec<TokenLocation> {
        self.dumped.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, method: &'static str) -> Result<Value, ConnectFault> {
        self.calls.lock().unwrap().push(method.to_owned());
        self.responses
            .get(method)
            .cloned()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait]
impl ConnectApi for ScriptedApi {
    async fn login(&mut self, _credentials: &Credentials) -> Result<LoginStep, ConnectFault> {
        self.login_calls += 1;
        match self.logins.pop_front().unwrap_or(ScriptedLogin::Complete) {
            ScriptedLogin::Complete => Ok(LoginStep::Complete),
            ScriptedLogin::NeedsMfa => Ok(LoginStep::NeedsMfa(MfaChallenge::new(format!(
                "challenge-{}",
                self.login_calls
            )))),
            ScriptedLogin::Fail(fault) => Err(fault),
        }
    }

    async fn resume_login(
        &mut self,
        challenge: MfaChallenge,
        code: &str,
    ) -> Result<(), ConnectFault> {
        assert!(challenge.token().starts_with("challenge-"));
        self.codes.push(code.to_owned());
        self.resumes.pop_front().unwrap_or(Ok(()))
    }

    fn load_session(&mut self, location: &TokenLocation) -> Result<(), ConnectFault> {
        self.loaded.push(location.clone());
        if self.stored_session.as_ref() == Some(location) {
            Ok(())
        } else {
            Err(ConnectFault::other("No stored session"))
        }
    }

    fn dump_session(&self, location: &TokenLocation) -> Result<(), ConnectFault> {
        if self.fail_dump {
            return Err(ConnectFault::other("disk full"));
        }
        self.dumped.lock().unwrap().push(location.clone());
        Ok(())
    }

    async fn get_activities_by_date(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        _activity_type: Option<&str>,
    ) -> Result<Value, ConnectFault> {
        self.respond("get_activities_by_date")
    }

    async fn get_activities(&self, _start: u32, _limit: u32) -> Result<Value, ConnectFault> {
        self.respond("get_activities")
    }

    async fn get_activity(&self, _activity_id: u64) -> Result<Value, ConnectFault> {
        self.respond("get_activity")
    }

    async fn get_activity_details(&self, _activity_id: u64) -> Result<Value, ConnectFault> {
        self.respond("get_activity_details")
    }

    async fn get_user_profile(&self) -> Result<Value, ConnectFault> {
        self.respond("get_user_profile")
    }
}

/// Warning sink that keeps `(operation, message)` pairs
#[derive(Default)]
pub struct RecordingSink {
    pub warnings: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn warnings(&self) -> Vec<(String, String)> {
        self.warnings.lock().unwrap().clone()
    }
}

impl WarningSink for RecordingSink {
    fn warn(&self, operation: &str, descriptor: &ErrorDescriptor) {
        self.warnings
            .lock()
            .unwrap()
            .push((operation.to_owned(), descriptor.message.clone()));
    }
}

/// Settings with credentials, token paths under `dir`, and three attempts
pub fn session_settings(dir: &Path) -> SessionSettings {
    SessionSettings {
        credentials: Some(Credentials::new("athlete@example.com", "hunter2")),
        token_store: dir.join("tokens"),
        token_store_base64: dir.join("tokens_base64"),
        reuse_token_store: true,
        retry_policy: LoginRetryPolicy::with_max_attempts(3),
    }
}
