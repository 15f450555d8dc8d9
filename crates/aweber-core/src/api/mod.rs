//! Authenticated access to the AWeber REST API.

pub mod model;
pub mod walker;

pub use model::{Account, BroadcastDetail, BroadcastEntry, Collection, List};
pub use walker::{fetch_account, fetch_broadcasts, fetch_list};

use aweber_oauth::{OAuthClient, Token, TokenCache};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Bearer-authenticated GET client.
///
/// Before each request the token's expiry is checked; an expired token is
/// refreshed explicitly (when a refresh token and an [`OAuthClient`] are
/// available) and the new token is written to the cache.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    token: Token,
    refresher: Option<Refresher>,
}

#[derive(Debug)]
struct Refresher {
    oauth: OAuthClient,
    cache: TokenCache,
}

impl ApiClient {
    /// Creates a client sending `token` with every request.
    #[must_use]
    pub const fn new(http: Client, token: Token) -> Self {
        Self {
            http,
            token,
            refresher: None,
        }
    }

    /// Enables explicit refresh through `oauth`, persisting into `cache`.
    #[must_use]
    pub fn with_refresh(mut self, oauth: OAuthClient, cache: TokenCache) -> Self {
        self.refresher = Some(Refresher { oauth, cache });
        self
    }

    /// Token currently in use.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Sends `GET url` with the given query pairs.
    ///
    /// Any HTTP status is returned as a response; only transport failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`] if no response was received.
    pub async fn get(&mut self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        self.refresh_if_needed().await;

        debug!("GET {url} {query:?}");
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(self.token.bearer())
            .send()
            .await?;
        debug!("{} from {url}", response.status());
        Ok(response)
    }

    async fn refresh_if_needed(&mut self) {
        if !self.token.is_expired() || self.token.refresh_token().is_err() {
            return;
        }
        let Some(refresher) = &self.refresher else {
            return;
        };

        info!("Access token expired, refreshing");
        match refresher.oauth.refresh_token(&self.token).await {
            Ok(token) => {
                if let Err(e) = refresher.cache.save(&token) {
                    warn!("Could not cache refreshed token: {e}");
                }
                self.token = token;
            }
            Err(e) => warn!("Token refresh failed: {e}"),
        }
    }
}
