//! Walks accounts → lists → broadcasts → broadcast detail.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::ApiClient;
use super::model::{Account, BroadcastDetail, BroadcastEntry, Collection, List};
use crate::error::{Error, Result};
use crate::message::{BroadcastMessage, BroadcastStatus};

/// Characters of the subject shown in progress lines.
const PROGRESS_SUBJECT_CHARS: usize = 40;

/// Fetches the first account visible to the token.
///
/// # Errors
///
/// Returns [`Error::Unauthorized`] on 401, [`Error::Status`] on any other
/// non-200, [`Error::NoAccount`] if the collection is empty.
pub async fn fetch_account(client: &mut ApiClient, accounts_url: &str) -> Result<Account> {
    let response = client.get(accounts_url, &[]).await?;
    match response.status() {
        StatusCode::OK => {}
        StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized),
        status => {
            return Err(Error::Status {
                url: accounts_url.to_string(),
                status: status.as_u16(),
            });
        }
    }

    let page: Collection<Account> = decode(response).await?;
    page.entries.into_iter().next().ok_or(Error::NoAccount)
}

/// Fetches the first list of `account`.
///
/// # Errors
///
/// Returns [`Error::Status`] on a non-200 response, [`Error::NoLists`] if
/// the collection is empty.
pub async fn fetch_list(client: &mut ApiClient, account: &Account) -> Result<List> {
    let url = account.lists_collection_link.as_str();
    let response = client.get(url, &[]).await?;
    if response.status() != StatusCode::OK {
        return Err(Error::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let page: Collection<List> = decode(response).await?;
    page.entries.into_iter().next().ok_or(Error::NoLists)
}

/// Collects every broadcast under `broadcasts_url`, one status at a time.
///
/// Failures never abort the walk: a failing page ends its status, a failing
/// detail drops its entry. `delay` is slept after every detail request.
pub async fn fetch_broadcasts(
    client: &mut ApiClient,
    broadcasts_url: &str,
    delay: Duration,
) -> Vec<BroadcastMessage> {
    let mut collected = Vec::new();
    for status in BroadcastStatus::ALL {
        info!("Fetching '{status}' messages...");
        fetch_status(client, broadcasts_url, status, delay, &mut collected).await;
    }
    collected
}

async fn fetch_status(
    client: &mut ApiClient,
    broadcasts_url: &str,
    status: BroadcastStatus,
    delay: Duration,
    collected: &mut Vec<BroadcastMessage>,
) {
    let status_query = [("status", status.as_str())];
    let mut link = Some(broadcasts_url.to_string());
    let mut first_page = true;

    while let Some(url) = link.take() {
        // The server's next link already carries the filter.
        let query: &[(&str, &str)] = if first_page { &status_query } else { &[] };

        let page = match fetch_page(client, &url, query).await {
            Ok(page) => page,
            Err(Error::Status { status: 404, .. }) if first_page => {
                info!("None found.");
                return;
            }
            Err(e) => {
                warn!("Stopping '{status}' listing: {e}");
                return;
            }
        };
        first_page = false;

        for raw in page.entries {
            let entry: BroadcastEntry = match serde_json::from_value(raw) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping malformed broadcast entry: {e}");
                    continue;
                }
            };
            let Some(detail_link) = entry.detail_link(broadcasts_url) else {
                warn!("Skipping broadcast entry with neither self_link nor broadcast_id");
                continue;
            };

            if let Some(message) = fetch_detail(client, &detail_link, status).await {
                info!(
                    "✓ {}... [{}]",
                    message.short_subject(PROGRESS_SUBJECT_CHARS),
                    message.date
                );
                collected.push(message);
            }
            tokio::time::sleep(delay).await;
        }

        link = page.next_collection_link.filter(|next| !next.is_empty());
    }
}

async fn fetch_page(
    client: &mut ApiClient,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Collection<Value>> {
    let response = client.get(url, query).await?;
    if response.status() != StatusCode::OK {
        return Err(Error::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    decode(response).await
}

/// Fetches one broadcast. Every failure is a skip.
async fn fetch_detail(
    client: &mut ApiClient,
    url: &str,
    listed_as: BroadcastStatus,
) -> Option<BroadcastMessage> {
    let response = match client.get(url, &[]).await {
        Ok(response) => response,
        Err(e) => {
            debug!("Skipping {url}: {e}");
            return None;
        }
    };
    if response.status() != StatusCode::OK {
        debug!("Skipping {url}: {}", response.status());
        return None;
    }

    match decode::<BroadcastDetail>(response).await {
        Ok(detail) => Some(BroadcastMessage::from_detail(detail, listed_as)),
        Err(e) => {
            warn!("Skipping malformed broadcast {url}: {e}");
            None
        }
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
