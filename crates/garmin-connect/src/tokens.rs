// ABOUTME: Session token bundle and its on-disk formats
// ABOUTME: JSON file inside a token directory, or the whole bundle as a base64 blob
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use garmin_core::constants::garmin;
use garmin_core::errors::ConnectFault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::api::TokenLocation;

/// Token response returned by the SSO endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token
    pub access_token: String,
    /// Refresh token, when issued
    pub refresh_token: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry as a unix timestamp
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Authenticated session state
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    /// Bearer token sent with every data call
    pub access_token: String,
    /// Refresh token, when issued
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token stops being valid
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Authorization scheme
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("expires_at", &self.expires_at)
            .field("token_type", &self.token_type)
            .finish_non_exhaustive()
    }
}

impl From<TokenResponse> for TokenBundle {
    fn from(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| {
                response
                    .expires_in
                    .and_then(Duration::try_seconds)
                    .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            });

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            token_type: response.token_type.unwrap_or_else(default_token_type),
        }
    }
}

impl TokenBundle {
    /// Bundle holding only an access token
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            token_type: default_token_type(),
        }
    }

    /// `true` once the access token is past its expiry
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() >= expires_at)
    }

    /// Value of the `Authorization` header
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }

    /// Encode the bundle as a single base64 string
    ///
    /// # Errors
    ///
    /// Returns `Other` if JSON encoding fails
    pub fn to_base64(&self) -> Result<String, ConnectFault> {
        let json = serde_json::to_vec(self)
            .map_err(|e| ConnectFault::other(format!("Failed to encode session: {e}")))?;
        Ok(STANDARD.encode(json))
    }

    /// Decode a bundle produced by [`TokenBundle::to_base64`]
    ///
    /// # Errors
    ///
    /// Returns `Other` if the blob is not valid base64 or JSON
    pub fn from_base64(blob: &str) -> Result<Self, ConnectFault> {
        let bytes = STANDARD
            .decode(blob.trim())
            .map_err(|e| ConnectFault::other(format!("Stored session is not base64: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ConnectFault::other(format!("Stored session is malformed: {e}")))
    }

    /// Load a bundle from a token location and reject it if it has expired
    ///
    /// # Errors
    ///
    /// `Other` when nothing usable is stored, `Authentication` when the
    /// stored token has expired
    pub fn load(location: &TokenLocation) -> Result<Self, ConnectFault> {
        let bundle = match location {
            TokenLocation::Directory(dir) => {
                let raw = read_file(&dir.join(garmin::TOKEN_FILE))?;
                serde_json::from_str(&raw)
                    .map_err(|e| ConnectFault::other(format!("Stored session is malformed: {e}")))?
            }
            TokenLocation::Base64File(file) => Self::from_base64(&read_file(file)?)?,
        };

        if bundle.is_expired() {
            return Err(ConnectFault::authentication(format!(
                "Stored session at {location} has expired"
            )));
        }
        Ok(bundle)
    }

    /// Write the bundle to a token location, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `Other` if encoding or writing fails
    pub fn dump(&self, location: &TokenLocation) -> Result<(), ConnectFault> {
        match location {
            TokenLocation::Directory(dir) => {
                fs::create_dir_all(dir).map_err(|e| write_fault(dir, &e))?;
                let json = serde_json::to_string_pretty(self)
                    .map_err(|e| ConnectFault::other(format!("Failed to encode session: {e}")))?;
                let file = dir.join(garmin::TOKEN_FILE);
                fs::write(&file, json).map_err(|e| write_fault(&file, &e))
            }
            TokenLocation::Base64File(file) => {
                if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| write_fault(parent, &e))?;
                }
                fs::write(file, self.to_base64()?).map_err(|e| write_fault(file, &e))
            }
        }
    }
}

fn read_file(path: &Path) -> Result<String, ConnectFault> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConnectFault::other(format!("No stored session at {}", path.display()))
        } else {
            ConnectFault::other(format!("Failed to read {}: {e}", path.display()))
        }
    })
}

fn write_fault(path: &Path, error: &io::Error) -> ConnectFault {
    ConnectFault::other(format!("Failed to write {}: {error}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TokenBundle {
        TokenBundle {
            access_token: "access-abc".to_owned(),
            refresh_token: Some("refresh-def".to_owned()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            token_type: "Bearer".to_owned(),
        }
    }

    #[test]
    fn test_directory_dump_then_load() -> Result<(), ConnectFault> {
        let temp = TempDir::new().map_err(|e| ConnectFault::other(e.to_string()))?;
        let location = TokenLocation::Directory(temp.path().join("nested").join("tokens"));

        let bundle = sample();
        bundle.dump(&location)?;
        assert!(location.path().join(garmin::TOKEN_FILE).exists());
        assert_eq!(TokenBundle::load(&location)?, bundle);
        Ok(())
    }

    #[test]
    fn test_base64_file_holds_single_blob() -> Result<(), ConnectFault> {
        let temp = TempDir::new().map_err(|e| ConnectFault::other(e.to_string()))?;
        let location = TokenLocation::Base64File(temp.path().join("session_base64"));
        let bundle = sample();

        bundle.dump(&location)?;
        let raw = fs::read_to_string(location.path())
            .map_err(|e| ConnectFault::other(e.to_string()))?;
        assert!(!raw.contains("access-abc"));
        assert_eq!(TokenBundle::load(&location)?.access_token, "access-abc");
        Ok(())
    }

    #[test]
    fn test_missing_store_is_reported() {
        let location = TokenLocation::Directory("/definitely/not/here".into());
        let fault = TokenBundle::load(&location).err();
        assert!(matches!(fault, Some(ConnectFault::Other(msg)) if msg.contains("No stored session")));
    }

    #[test]
    fn test_expired_session_is_rejected() -> Result<(), ConnectFault> {
        let temp = TempDir::new().map_err(|e| ConnectFault::other(e.to_string()))?;
        let location = TokenLocation::Directory(temp.path().to_path_buf());
        let mut bundle = sample();
        bundle.expires_at = Some(Utc::now() - Duration::minutes(1));
        bundle.dump(&location)?;

        assert!(matches!(
            TokenBundle::load(&location),
            Err(ConnectFault::Authentication(_))
        ));
        Ok(())
    }

    #[test]
    fn test_response_expiry_from_lifetime() {
        let bundle = TokenBundle::from(TokenResponse {
            access_token: "a".to_owned(),
            refresh_token: None,
            expires_in: Some(3600),
            expires_at: None,
            token_type: None,
        });
        assert!(!bundle.is_expired());
        assert_eq!(bundle.authorization(), "Bearer a");
    }

    #[test]
    fn test_unrepresentable_lifetime_leaves_expiry_open() {
        for lifetime in [i64::MAX, 9_000_000_000_000_000, 9_000_000_000_000] {
            let bundle = TokenBundle::from(TokenResponse {
                access_token: "a".to_owned(),
                refresh_token: None,
                expires_in: Some(lifetime),
                expires_at: None,
                token_type: None,
            });
            assert!(bundle.expires_at.is_none(), "lifetime {lifetime}");
            assert!(!bundle.is_expired());
        }
    }

    #[test]
    fn test_debug_hides_tokens() {
        assert!(!format!("{:?}", sample()).contains("access-abc"));
    }
}
