//! Runtime configuration sourced from the environment.

use std::path::PathBuf;
use std::time::Duration;

use aweber_oauth::provider::{AWEBER_AUTH_URL, AWEBER_TOKEN_URL};
use url::Url;

use crate::error::{Error, Result};

/// Production API root.
pub const DEFAULT_API_BASE: &str = "https://api.aweber.com/1.0";

/// Redirect URI registered for the integration.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Report destination.
pub const DEFAULT_OUTPUT_FILE: &str = "aweber_dump.md";

/// Marker left in credentials copied from the sample `.env`.
const PLACEHOLDER_MARKER: &str = "place_your";

/// Everything a run needs besides the token cache.
#[derive(Debug, Clone)]
pub struct Config {
    /// `OAuth2` client id.
    pub client_id: String,
    /// `OAuth2` client secret.
    pub client_secret: String,
    /// Redirect URI sent with the authorization request.
    pub redirect_uri: String,
    /// Where the report is written.
    pub output_file: PathBuf,
    /// Authorization endpoint.
    pub auth_url: Url,
    /// Token endpoint.
    pub token_url: Url,
    /// API root, without trailing slash.
    pub api_base: String,
    /// Transport timeout applied to every request.
    pub request_timeout: Duration,
    /// Pause after each broadcast detail request.
    pub detail_delay: Duration,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if credentials are missing or a value is invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if credentials are missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let client_id = get("AWEBER_CLIENT_ID").unwrap_or_default();
        let client_secret = get("AWEBER_CLIENT_SECRET").unwrap_or_default();
        let unset = |value: &str| value.is_empty() || value.contains(PLACEHOLDER_MARKER);
        if unset(&client_id) || unset(&client_secret) {
            return Err(Error::Config(
                "please set AWEBER_CLIENT_ID and AWEBER_CLIENT_SECRET in your .env file".into(),
            ));
        }

        let api_base = get("API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Url::parse(&api_base).map_err(|e| Error::Config(format!("API_BASE: {e}")))?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: get("AWEBER_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            output_file: get("OUTPUT_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE), PathBuf::from),
            auth_url: parse_url(
                "AUTHORIZATION_BASE_URL",
                get("AUTHORIZATION_BASE_URL").as_deref().unwrap_or(AWEBER_AUTH_URL),
            )?,
            token_url: parse_url(
                "TOKEN_URL",
                get("TOKEN_URL").as_deref().unwrap_or(AWEBER_TOKEN_URL),
            )?,
            api_base: api_base.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(parse_number(
                "AWEBER_HTTP_TIMEOUT_SECS",
                get("AWEBER_HTTP_TIMEOUT_SECS"),
                30,
            )?),
            detail_delay: Duration::from_millis(parse_number(
                "AWEBER_DETAIL_DELAY_MS",
                get("AWEBER_DETAIL_DELAY_MS"),
                100,
            )?),
        })
    }

    /// URL of the accounts collection.
    #[must_use]
    pub fn accounts_url(&self) -> String {
        format!("{}/accounts", self.api_base)
    }

    /// URL of a list's broadcasts collection.
    #[must_use]
    pub fn broadcasts_url(&self, account_id: u64, list_id: u64) -> String {
        format!(
            "{}/accounts/{account_id}/lists/{list_id}/broadcasts",
            self.api_base
        )
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::Config(format!("{key}: {e}")))
}

fn parse_number(key: &str, value: Option<String>, default: u64) -> Result<u64> {
    value.map_or(Ok(default), |v| {
        v.parse()
            .map_err(|_| Error::Config(format!("{key} must be a whole number, got {v:?}")))
    })
}
