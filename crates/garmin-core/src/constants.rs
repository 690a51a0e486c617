// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Environment variable names, defaults, user-facing messages, and Garmin endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants grouped by domain.

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// Account email for credential login
    pub const EMAIL: &str = "EMAIL";
    /// Account password for credential login
    pub const PASSWORD: &str = "PASSWORD";
    /// Token store directory
    pub const TOKEN_STORE: &str = "GARMINTOKENS";
    /// Token store as a single base64 blob file
    pub const TOKEN_STORE_BASE64: &str = "GARMINTOKENS_BASE64";
    /// Optional activity type filter (cycling, running, swimming, ...)
    pub const ACTIVITY_TYPE: &str = "GARMIN_ACTIVITY_TYPE";
    /// Directory receiving `response.json` and exported files
    pub const EXPORT_DIR: &str = "GARMIN_EXPORT_DIR";
    /// Upper bound on whole login attempts
    pub const LOGIN_ATTEMPTS: &str = "GARMIN_LOGIN_ATTEMPTS";
    /// Whether a stored session is reused before credential login
    pub const REUSE_TOKENS: &str = "GARMIN_REUSE_TOKENS";
    /// Connect API base URL override
    pub const API_URL: &str = "GARMIN_CONNECT_API_URL";
    /// SSO token endpoint override
    pub const SSO_URL: &str = "GARMIN_SSO_URL";
    /// OAuth client identifier override
    pub const CLIENT_ID: &str = "GARMIN_CLIENT_ID";
    /// Request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "GARMIN_HTTP_TIMEOUT_SECS";
}

/// Default configuration values
pub mod defaults {
    /// Token store directory (tilde is expanded at load time)
    pub const TOKEN_STORE: &str = "~/.garminconnect";
    /// Base64 token blob file
    pub const TOKEN_STORE_BASE64: &str = "~/.garminconnect_base64";
    /// Export directory, relative to the working directory
    pub const EXPORT_DIR: &str = "your_data";
    /// Default page size for list calls
    pub const DEFAULT_LIMIT: u32 = 100;
    /// Default list offset
    pub const START: u32 = 0;
    /// Badge related calls start counting at 1
    pub const START_BADGE: u32 = 1;
    /// Whole login attempts before giving up
    pub const LOGIN_ATTEMPTS: u32 = 3;
    /// Days covered by the "week" range
    pub const WEEK_DAYS: i64 = 7;
    /// Days covered by the "month" range
    pub const MONTH_DAYS: i64 = 30;
}

/// Garmin Connect endpoints and wire constants
pub mod garmin {
    /// Connect API base URL
    pub const API_BASE_URL: &str = "https://connectapi.garmin.com";
    /// SSO token endpoint used for credential and MFA exchange
    pub const SSO_URL: &str = "https://sso.garmin.com/sso/oauth/token";
    /// OAuth client identifier presented at login
    pub const CLIENT_ID: &str = "GarminConnect";
    /// Page size used when walking activity search results by date
    pub const ACTIVITIES_PAGE_SIZE: u32 = 20;
    /// Grant type for the credential step
    pub const PASSWORD_GRANT: &str = "password";
    /// Grant type for the one-time code step
    pub const MFA_OTP_GRANT: &str = "mfa_otp";
    /// Error code the SSO endpoint returns when a second factor is needed
    pub const MFA_REQUIRED_ERROR: &str = "mfa_required";
    /// File written inside the token store directory
    pub const TOKEN_FILE: &str = "oauth2_token.json";
    /// Activity search endpoint
    pub const ACTIVITIES_SEARCH: &str = "activitylist-service/activities/search/activities";
    /// Activity summary endpoint prefix
    pub const ACTIVITY: &str = "activity-service/activity";
    /// Social profile endpoint
    pub const SOCIAL_PROFILE: &str = "userprofile-service/socialProfile";
}

/// User-facing messages produced by fault classification
pub mod messages {
    /// 400 Bad Request
    pub const BAD_REQUEST: &str = "Endpoint not available (400 Bad Request) - This feature may not be enabled for your account or region";
    /// 401 Unauthorized
    pub const UNAUTHORIZED: &str =
        "Authentication required (401 Unauthorized) - Please re-authenticate";
    /// 403 Forbidden
    pub const FORBIDDEN: &str =
        "Access denied (403 Forbidden) - Your account may not have permission for this feature";
    /// 404 Not Found
    pub const NOT_FOUND: &str =
        "Endpoint not found (404) - This feature may have been moved or removed";
    /// 429 Too Many Requests
    pub const RATE_LIMITED: &str =
        "Rate limit exceeded (429) - Please wait before making more requests";
    /// 500 Internal Server Error
    pub const SERVER_ERROR: &str = "Server error (500) - Garmin's servers are experiencing issues";
    /// 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: &str =
        "Service unavailable (503) - Garmin's servers are temporarily unavailable";
    /// Prefix for unrecognized HTTP failures
    pub const HTTP_ERROR_PREFIX: &str = "HTTP error";
    /// Prefix for authentication faults
    pub const AUTH_ISSUE_PREFIX: &str = "Authentication issue";
    /// Prefix for connectivity faults
    pub const CONNECTION_ISSUE_PREFIX: &str = "Connection issue";
    /// Prefix for everything else
    pub const UNEXPECTED_PREFIX: &str = "Unexpected error";
    /// Data call attempted without a session
    pub const NOT_CONNECTED: &str = "Client is not connected";
    /// MFA challenge raised but no prompt supplied
    pub const MFA_REQUIRED: &str = "MFA required";
}
