// ABOUTME: Shared HTTP client with connection pooling and timeout configuration
// ABOUTME: One pooled client for Connect API calls plus a short-timeout client for SSO exchanges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Request timeout for data calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const SSO_TIMEOUT_SECS: u64 = 15;
const SSO_CONNECT_TIMEOUT_SECS: u64 = 5;

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared client with default timeouts
#[must_use]
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| client_with_timeout(DEFAULT_TIMEOUT_SECS, CONNECT_TIMEOUT_SECS))
}

/// Client for Connect API calls.
///
/// Reuses the shared pool unless a non-default timeout was configured.
#[must_use]
pub fn api_client(timeout_secs: u64) -> Client {
    if timeout_secs == DEFAULT_TIMEOUT_SECS {
        return shared_client().clone();
    }
    client_with_timeout(timeout_secs, CONNECT_TIMEOUT_SECS)
}

/// Client for token exchanges, which should be fast
#[must_use]
pub fn sso_client() -> Client {
    client_with_timeout(SSO_TIMEOUT_SECS, SSO_CONNECT_TIMEOUT_SECS)
}

/// Create a client with custom timeouts, falling back to a default client if
/// the builder fails
#[must_use]
pub fn client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
