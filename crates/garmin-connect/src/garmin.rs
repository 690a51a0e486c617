// ABOUTME: Thin HTTP adapter implementing ConnectApi against the Garmin Connect web API
// ABOUTME: Token exchange (password and one-time code grants), bearer-authenticated data calls, paging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use chrono::NaiveDate;
use garmin_core::constants::{env_vars, garmin};
use garmin_core::errors::ConnectFault;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::env;
use tracing::{debug, info};

use crate::api::{ConnectApi, Credentials, LoginStep, MfaChallenge, TokenLocation};
use crate::http_client::{self, DEFAULT_TIMEOUT_SECS};
use crate::tokens::{TokenBundle, TokenResponse};

/// Endpoints and transport settings for the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Connect API base URL
    pub api_base_url: String,
    /// SSO token endpoint
    pub sso_url: String,
    /// OAuth client identifier
    pub client_id: String,
    /// Request timeout for data calls
    pub timeout_secs: u64,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            api_base_url: garmin::API_BASE_URL.to_owned(),
            sso_url: garmin::SSO_URL.to_owned(),
            client_id: garmin::CLIENT_ID.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConnectConfig {
    /// Read endpoint overrides from the environment, keeping defaults for
    /// anything unset or unparsable
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var(env_vars::API_URL).unwrap_or(defaults.api_base_url),
            sso_url: env::var(env_vars::SSO_URL).unwrap_or(defaults.sso_url),
            client_id: env::var(env_vars::CLIENT_ID).unwrap_or(defaults.client_id),
            timeout_secs: env::var(env_vars::HTTP_TIMEOUT_SECS)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Point both the API and the SSO endpoint at one base URL
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            api_base_url: base.to_owned(),
            sso_url: format!("{base}/sso/oauth/token"),
            ..Self::default()
        }
    }
}

/// Error body the SSO endpoint returns on a rejected exchange
#[derive(Debug, Default, Deserialize)]
struct SsoError {
    error: Option<String>,
    error_description: Option<String>,
    mfa_token: Option<String>,
}

/// Garmin Connect over HTTPS
pub struct GarminConnect {
    api: Client,
    sso: Client,
    config: ConnectConfig,
    session: Option<TokenBundle>,
}

impl Default for GarminConnect {
    fn default() -> Self {
        Self::new(ConnectConfig::default())
    }
}

impl GarminConnect {
    /// Create an unauthenticated adapter
    #[must_use]
    pub fn new(config: ConnectConfig) -> Self {
        Self {
            api: http_client::api_client(config.timeout_secs),
            sso: http_client::sso_client(),
            config,
            session: None,
        }
    }

    /// Adapter configuration
    #[must_use]
    pub const fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// `true` once tokens are held
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.session.is_some()
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<Response, ConnectFault> {
        Ok(self.sso.post(&self.config.sso_url).form(form).send().await?)
    }

    async fn accept_tokens(&mut self, response: Response) -> Result<(), ConnectFault> {
        let tokens: TokenResponse = response.json().await?;
        self.session = Some(TokenBundle::from(tokens));
        info!("Garmin Connect session established");
        Ok(())
    }

    async fn api_request(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ConnectFault> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ConnectFault::authentication("No active session"))?;

        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        debug!(url = %url, "Garmin Connect request");

        let response = self
            .api
            .get(&url)
            .header(AUTHORIZATION, session.authorization())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_fault(status, response.url().as_str()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|e| ConnectFault::other(format!("Failed to decode response from {url}: {e}")))
    }
}

/// Fault for a non-success response, phrased the way HTTP libraries report them
fn status_fault(status: StatusCode, url: &str) -> ConnectFault {
    let kind = if status.is_server_error() {
        "Server Error"
    } else {
        "Client Error"
    };
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = format!("{} {kind}: {reason} for url: {url}", status.as_u16());

    if status == StatusCode::TOO_MANY_REQUESTS {
        return ConnectFault::TooManyRequests(message);
    }
    ConnectFault::http(status.as_u16(), message)
}

async fn rejection(response: Response) -> (StatusCode, String, SsoError) {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.json::<SsoError>().await.unwrap_or_default();
    (status, url, body)
}

fn login_fault(status: StatusCode, url: &str, body: &SsoError, context: &str) -> ConnectFault {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        let detail = body
            .error_description
            .as_deref()
            .or(body.error.as_deref())
            .unwrap_or("credentials rejected");
        return ConnectFault::authentication(format!("{context}: {detail}"));
    }
    status_fault(status, url)
}

#[async_trait]
impl ConnectApi for GarminConnect {
    async fn login(&mut self, credentials: &Credentials) -> Result<LoginStep, ConnectFault> {
        let response = self
            .exchange(&[
                ("grant_type", garmin::PASSWORD_GRANT),
                ("client_id", self.config.client_id.as_str()),
                ("username", credentials.email.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .await?;

        if response.status().is_success() {
            self.accept_tokens(response).await?;
            return Ok(LoginStep::Complete);
        }

        let (status, url, body) = rejection(response).await;
        if body.error.as_deref() == Some(garmin::MFA_REQUIRED_ERROR) {
            if let Some(token) = body.mfa_token.as_deref() {
                info!("Garmin Connect requested a one-time code");
                return Ok(LoginStep::NeedsMfa(MfaChallenge::new(token)));
            }
        }
        Err(login_fault(status, &url, &body, "Login failed"))
    }

    async fn resume_login(
        &mut self,
        challenge: MfaChallenge,
        code: &str,
    ) -> Result<(), ConnectFault> {
        let response = self
            .exchange(&[
                ("grant_type", garmin::MFA_OTP_GRANT),
                ("client_id", self.config.client_id.as_str()),
                ("mfa_token", challenge.token()),
                ("otp", code),
            ])
            .await?;

        if response.status().is_success() {
            return self.accept_tokens(response).await;
        }
        let (status, url, body) = rejection(response).await;
        Err(login_fault(status, &url, &body, "MFA verification failed"))
    }

    fn load_session(&mut self, location: &TokenLocation) -> Result<(), ConnectFault> {
        self.session = Some(TokenBundle::load(location)?);
        debug!(location = %location, "Loaded stored session");
        Ok(())
    }

    fn dump_session(&self, location: &TokenLocation) -> Result<(), ConnectFault> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ConnectFault::other("No active session to persist"))?;
        session.dump(location)
    }

    async fn get_activities_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        activity_type: Option<&str>,
    ) -> Result<Value, ConnectFault> {
        let page_size = garmin::ACTIVITIES_PAGE_SIZE;
        let mut activities = Vec::new();
        let mut offset = 0_u32;

        loop {
            let mut query = vec![
                ("startDate", start.to_string()),
                ("endDate", end.to_string()),
                ("start", offset.to_string()),
                ("limit", page_size.to_string()),
            ];
            if let Some(kind) = activity_type {
                query.push(("activityType", kind.to_owned()));
            }

            let page = match self.api_request(garmin::ACTIVITIES_SEARCH, &query).await? {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => {
                    return Err(ConnectFault::other(format!(
                        "Expected an activity list, got {other}"
                    )))
                }
            };

            let fetched = page.len();
            activities.extend(page);
            if fetched < page_size as usize {
                break;
            }
            offset += page_size;
        }

        debug!(count = activities.len(), "Fetched activities by date");
        Ok(Value::Array(activities))
    }

    async fn get_activities(&self, start: u32, limit: u32) -> Result<Value, ConnectFault> {
        self.api_request(
            garmin::ACTIVITIES_SEARCH,
            &[("start", start.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn get_activity(&self, activity_id: u64) -> Result<Value, ConnectFault> {
        self.api_request(&format!("{}/{activity_id}", garmin::ACTIVITY), &[])
            .await
    }

    async fn get_activity_details(&self, activity_id: u64) -> Result<Value, ConnectFault> {
        self.api_request(&format!("{}/{activity_id}/details", garmin::ACTIVITY), &[])
            .await
    }

    async fn get_user_profile(&self) -> Result<Value, ConnectFault> {
        self.api_request(garmin::SOCIAL_PROFILE, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_fault_wording() {
        let fault = status_fault(StatusCode::INTERNAL_SERVER_ERROR, "https://x/y");
        assert_eq!(
            fault.to_string(),
            "500 Server Error: Internal Server Error for url: https://x/y"
        );
        assert_eq!(fault.status(), Some(500));
    }

    #[test]
    fn test_throttling_is_its_own_fault() {
        let fault = status_fault(StatusCode::TOO_MANY_REQUESTS, "https://x");
        assert!(matches!(fault, ConnectFault::TooManyRequests(_)));
    }

    #[test]
    fn test_base_url_override_moves_sso_too() {
        let config = ConnectConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.sso_url, "http://127.0.0.1:9000/sso/oauth/token");
        assert_eq!(config.client_id, garmin::CLIENT_ID);
    }
}
