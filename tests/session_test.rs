// ABOUTME: Integration tests for the login/MFA session manager
// ABOUTME: Token reuse, MFA round trips, bounded retry of rejected codes, and guarded data calls
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{session_settings, RecordingSink, ScriptedApi, ScriptedLogin};
use chrono::NaiveDate;
use garmin_client::call_guard::CallGuard;
use garmin_client::errors::{AppResult, ConnectFault, ErrorCode};
use garmin_client::session::{SessionManager, SessionState};
use garmin_connect::TokenLocation;
use serde_json::{json, Value};
use tempfile::TempDir;

fn code(value: &'static str) -> impl FnMut() -> AppResult<String> + Send {
    move || Ok(value.to_owned())
}

#[tokio::test]
async fn test_login_without_mfa() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new().with_logins([ScriptedLogin::Complete]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));

    assert_eq!(session.state(), SessionState::Unauthenticated);
    session.login(None).await.unwrap();

    assert!(session.is_connected());
    assert_eq!(session.attempts_made(), 1);
    let api = session.into_api();
    assert_eq!(api.login_calls, 1);
    assert!(api.codes.is_empty());
}

#[tokio::test]
async fn test_login_persists_to_both_locations() {
    let dir = TempDir::new().unwrap();
    let settings = session_settings(dir.path());
    let expected = settings.token_locations().to_vec();
    let mut session = SessionManager::new(ScriptedApi::new(), settings);

    session.login(None).await.unwrap();
    let api = session.into_api();
    assert_eq!(api.dumped(), expected);
}

#[tokio::test]
async fn test_persistence_failure_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi {
        fail_dump: true,
        ..ScriptedApi::default()
    };
    let mut session = SessionManager::new(api, session_settings(dir.path()));

    session.login(None).await.unwrap();
    assert!(session.is_connected());
}

#[tokio::test]
async fn test_stored_session_skips_network_login() {
    let dir = TempDir::new().unwrap();
    let settings = session_settings(dir.path());
    let base64 = TokenLocation::Base64File(settings.token_store_base64.clone());
    let api = ScriptedApi::new().with_stored_session(base64);
    let mut session = SessionManager::new(api, settings);

    session.login(None).await.unwrap();

    assert!(session.is_connected());
    let api = session.into_api();
    assert_eq!(api.login_calls, 0);
    assert_eq!(api.loaded.len(), 2);
    assert!(api.dumped().is_empty());
}

#[tokio::test]
async fn test_reuse_disabled_ignores_stored_session() {
    let dir = TempDir::new().unwrap();
    let mut settings = session_settings(dir.path());
    settings.reuse_token_store = false;
    let directory = TokenLocation::Directory(settings.token_store.clone());
    let api = ScriptedApi::new().with_stored_session(directory);
    let mut session = SessionManager::new(api, settings);

    session.login(None).await.unwrap();
    let api = session.into_api();
    assert!(api.loaded.is_empty());
    assert_eq!(api.login_calls, 1);
}

#[tokio::test]
async fn test_missing_credentials_is_config_error() {
    let dir = TempDir::new().unwrap();
    let mut settings = session_settings(dir.path());
    settings.credentials = None;
    let mut session = SessionManager::new(ScriptedApi::new(), settings);

    let err = session.login(None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert_eq!(session.state(), SessionState::LoginFailed);
}

#[tokio::test]
async fn test_mfa_single_round_trip() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new()
        .with_logins([ScriptedLogin::NeedsMfa])
        .with_resumes([Ok(())]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));
    let mut prompt = code("123456");

    session.login(Some(&mut prompt)).await.unwrap();

    assert!(session.is_connected());
    let api = session.into_api();
    assert_eq!(api.login_calls, 1);
    assert_eq!(api.codes, vec!["123456".to_owned()]);
}

#[tokio::test]
async fn test_mfa_without_prompt_fails() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new().with_logins([ScriptedLogin::NeedsMfa]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));

    let err = session.login(None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(err.message, "MFA required");
    assert_eq!(session.state(), SessionState::LoginFailed);
}

#[tokio::test]
async fn test_rejected_codes_retry_until_bound() {
    let dir = TempDir::new().unwrap();
    let rejected = || Err(ConnectFault::authentication("Invalid MFA code"));
    let api = ScriptedApi::new()
        .with_logins([
            ScriptedLogin::NeedsMfa,
            ScriptedLogin::NeedsMfa,
            ScriptedLogin::NeedsMfa,
        ])
        .with_resumes([rejected(), rejected(), rejected()]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));
    let mut prompt = code("000000");

    let err = session.login(Some(&mut prompt)).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(session.state(), SessionState::LoginFailed);
    assert_eq!(session.attempts_made(), 3);
    let api = session.into_api();
    assert_eq!(api.login_calls, 3);
    assert_eq!(api.codes.len(), 3);
}

#[tokio::test]
async fn test_second_code_accepted() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new()
        .with_logins([ScriptedLogin::NeedsMfa, ScriptedLogin::NeedsMfa])
        .with_resumes([Err(ConnectFault::http(401, "401 Client Error")), Ok(())]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));
    let mut codes = vec!["222222".to_owned(), "111111".to_owned()];
    let mut prompt = move || -> AppResult<String> { Ok(codes.pop().unwrap()) };

    session.login(Some(&mut prompt)).await.unwrap();

    assert_eq!(session.attempts_made(), 2);
    let api = session.into_api();
    assert_eq!(
        api.codes,
        vec!["111111".to_owned(), "222222".to_owned()]
    );
}

#[tokio::test]
async fn test_non_retryable_resume_fault_stops() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new()
        .with_logins([ScriptedLogin::NeedsMfa])
        .with_resumes([Err(ConnectFault::connection("reset by peer"))]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));
    let mut prompt = code("123456");

    let err = session.login(Some(&mut prompt)).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
    assert_eq!(err.message, "Connection issue: reset by peer");
    let api = session.into_api();
    assert_eq!(api.login_calls, 1);
}

#[tokio::test]
async fn test_credential_step_fault_is_not_retried() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new().with_logins([ScriptedLogin::Fail(ConnectFault::authentication(
        "Bad credentials",
    ))]);
    let mut session = SessionManager::new(api, session_settings(dir.path()));

    let err = session.login(None).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(session.state(), SessionState::LoginFailed);
    let api = session.into_api();
    assert_eq!(api.login_calls, 1);
}

#[tokio::test]
async fn test_data_calls_require_login() {
    let dir = TempDir::new().unwrap();
    let session = SessionManager::new(ScriptedApi::new(), session_settings(dir.path()));

    let err = session.get_user_profile().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AuthRequired);
    assert_eq!(err.message, "Client is not connected");
    let api = session.into_api();
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_data_calls_return_values_unchanged() {
    let dir = TempDir::new().unwrap();
    let api = ScriptedApi::new()
        .with_response("get_activities_by_date", Ok(json!([])))
        .with_response("get_activity", Ok(json!({"activityId": 7})));
    let mut session = SessionManager::new(api, session_settings(dir.path()));
    session.login(None).await.unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert_eq!(
        session.get_activities_by_date(start, end, None).await.unwrap(),
        json!([])
    );
    assert_eq!(
        session.get_activity(7).await.unwrap(),
        json!({"activityId": 7})
    );
    assert_eq!(session.get_user_profile().await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_data_call_failure_maps_category_and_warns() {
    let dir = TempDir::new().unwrap();
    let sink = RecordingSink::new();
    let api = ScriptedApi::new().with_response(
        "get_activity_details",
        Err(ConnectFault::http(404, "404 Client Error")),
    );
    let mut session = SessionManager::with_guard(
        api,
        session_settings(dir.path()),
        CallGuard::with_sink(sink.clone()),
    );
    session.login(None).await.unwrap();

    let err = session.get_activity_details(99).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert_eq!(
        sink.warnings(),
        vec![(
            "get_activity_details(99)".to_owned(),
            "Endpoint not found (404) - This feature may have been moved or removed".to_owned()
        )]
    );
    let api = session.into_api();
    assert_eq!(api.calls(), vec!["get_activity_details".to_owned()]);
}
