//! The whole run: token, account, list, broadcasts, report.

use aweber_oauth::TokenCache;
use reqwest::Client;
use tracing::info;

use crate::api::{self, ApiClient};
use crate::auth::{self, AuthorizationPrompt};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{self, WriteOutcome};

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Name of the exported list.
    pub list_name: String,
    /// Broadcasts collected across all statuses.
    pub collected: usize,
    /// Whether a report was written.
    pub outcome: WriteOutcome,
}

/// HTTP client shared by the token endpoint and the API.
///
/// # Errors
///
/// Returns [`Error::Config`] if the client cannot be built.
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("aweber-dump/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Config(format!("HTTP client: {e}")))
}

/// Runs the export end to end.
///
/// # Errors
///
/// Returns the first fatal error: authorization failure, rejected token,
/// missing account or list, or a failed report write. Per-status and
/// per-broadcast failures are logged and skipped.
pub async fn export<P>(config: &Config, cache: TokenCache, prompt: &mut P) -> Result<ExportSummary>
where
    P: AuthorizationPrompt + ?Sized,
{
    let http = http_client(config)?;
    let oauth = auth::oauth_client(config, http.clone())?;
    let token = auth::resolve_token(&oauth, &cache, prompt).await?;
    let mut client = ApiClient::new(http, token).with_refresh(oauth, cache);

    info!("Connecting to API...");
    let account = api::fetch_account(&mut client, &config.accounts_url()).await?;
    let list = api::fetch_list(&mut client, &account).await?;
    info!("List: {} (ID: {})", list.name, list.id);

    let broadcasts_url = config.broadcasts_url(account.id, list.id);
    let messages = api::fetch_broadcasts(&mut client, &broadcasts_url, config.detail_delay).await;
    let collected = messages.len();

    let outcome = report::write_report(&config.output_file, &list.name, messages)?;
    Ok(ExportSummary {
        list_name: list.name,
        collected,
        outcome,
    })
}
