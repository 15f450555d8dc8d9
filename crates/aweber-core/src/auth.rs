//! Bearer token resolution: cache, explicit refresh, or interactive grant.

use aweber_oauth::{AuthorizationCodeFlow, CachedToken, OAuthClient, Provider, Token, TokenCache};
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::Result;

/// Operator side of the authorization-code grant.
pub trait AuthorizationPrompt {
    /// Presents `url` and returns the redirect URL the operator pastes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator's answer cannot be read.
    fn redirect_url(&mut self, url: &Url) -> std::io::Result<String>;
}

/// Builds the `OAuth2` client for the configured endpoints and credentials.
///
/// # Errors
///
/// Returns an error if the endpoints are unusable.
pub fn oauth_client(config: &Config, http: Client) -> Result<OAuthClient> {
    let provider = Provider::aweber_with_endpoints(&config.auth_url, &config.token_url)?;
    provider.validate()?;
    Ok(OAuthClient::new(&config.client_id, provider)
        .with_client_secret(&config.client_secret)
        .with_redirect_uri(&config.redirect_uri)
        .with_http_client(http))
}

/// Produces a bearer token for the run.
///
/// A cached token is reused only while its expiry lies in the future. An
/// expired token with a refresh token is renewed explicitly; if that fails,
/// or there is nothing to refresh, the interactive grant runs.
///
/// # Errors
///
/// Returns an error if the interactive grant fails or its token cannot be saved.
pub async fn resolve_token<P>(
    oauth: &OAuthClient,
    cache: &TokenCache,
    prompt: &mut P,
) -> Result<Token>
where
    P: AuthorizationPrompt + ?Sized,
{
    match cache.load_valid() {
        CachedToken::Valid(token) => return Ok(token),
        CachedToken::Expired(token) if token.refresh_token().is_ok() => {
            match refresh(oauth, cache, &token).await {
                Ok(token) => return Ok(token),
                Err(e) => warn!("Token refresh failed, re-authorizing: {e}"),
            }
        }
        CachedToken::Expired(_) | CachedToken::Missing => {}
    }

    authorize(oauth, cache, prompt).await
}

async fn refresh(oauth: &OAuthClient, cache: &TokenCache, expired: &Token) -> Result<Token> {
    let token = oauth.refresh_token(expired).await?;
    cache.save(&token)?;
    info!("Token refreshed");
    Ok(token)
}

/// Runs the authorization-code grant with the operator and caches the result.
///
/// # Errors
///
/// Returns an error if the prompt, the redirect, the exchange, or the
/// cache write fails.
pub async fn authorize<P>(oauth: &OAuthClient, cache: &TokenCache, prompt: &mut P) -> Result<Token>
where
    P: AuthorizationPrompt + ?Sized,
{
    let flow = AuthorizationCodeFlow::new(oauth.clone());
    let url = flow.authorization_url()?;

    info!("Authorization required");
    let redirect = prompt.redirect_url(&url)?;

    let token = flow.exchange_redirect(&redirect).await?;
    cache.save(&token)?;
    info!("Token acquired");
    Ok(token)
}
