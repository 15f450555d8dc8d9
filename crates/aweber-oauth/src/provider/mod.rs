//! Authorization server endpoints.

use crate::error::{Error, Result};
use url::Url;

/// Production authorization endpoint.
pub const AWEBER_AUTH_URL: &str = "https://auth.aweber.com/oauth2/authorize";

/// Production token endpoint.
pub const AWEBER_TOKEN_URL: &str = "https://auth.aweber.com/oauth2/token";

/// Read-only scopes needed to walk accounts, lists and broadcasts.
pub const AWEBER_SCOPES: [&str; 3] = ["account.read", "list.read", "email.read"];

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Scopes requested when none are given explicitly.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a provider from explicit endpoints, with no default scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is invalid.
    pub fn new(auth_url: impl AsRef<str>, token_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// AWeber production endpoints with the read-only scope set.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn aweber() -> Result<Self> {
        Self::aweber_with_endpoints(AWEBER_AUTH_URL, AWEBER_TOKEN_URL)
    }

    /// AWeber scopes against overridden endpoints (staging, mocks).
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn aweber_with_endpoints(
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self::new(auth_url, token_url)?.with_default_scopes(
            AWEBER_SCOPES.iter().map(ToString::to_string).collect(),
        ))
    }

    /// Validates that the endpoints can carry an authorization request.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint cannot be used as a base URL.
    pub fn validate(&self) -> Result<()> {
        if self.auth_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "authorization URL is not a base URL: {}",
                self.auth_url
            )));
        }
        if self.token_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "token URL is not a base URL: {}",
                self.token_url
            )));
        }
        Ok(())
    }
}
