//! Wire types for the account, list and broadcast resources.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of a collection resource.
///
/// Broadcast pages keep their entries as raw JSON so a single malformed row
/// can be skipped without losing the page.
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T = Value> {
    /// Entries on this page.
    #[serde(default = "Vec::new")]
    pub entries: Vec<T>,
    /// Link to the following page, absent on the last one.
    #[serde(default)]
    pub next_collection_link: Option<String>,
}

/// An account the token can access.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: u64,
    /// Link to the account's lists collection.
    pub lists_collection_link: String,
}

/// A subscriber list.
#[derive(Debug, Clone, Deserialize)]
pub struct List {
    /// List id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// A row of the broadcasts collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastEntry {
    /// Link to the full broadcast resource.
    #[serde(default)]
    pub self_link: Option<String>,
    /// Broadcast id, used when no `self_link` is given.
    #[serde(default)]
    pub broadcast_id: Option<u64>,
}

impl BroadcastEntry {
    /// Detail URL: the explicit self link, else `{base}/{broadcast_id}`.
    #[must_use]
    pub fn detail_link(&self, broadcasts_url: &str) -> Option<String> {
        self.self_link
            .as_deref()
            .filter(|link| !link.is_empty())
            .map(ToString::to_string)
            .or_else(|| self.broadcast_id.map(|id| format!("{broadcasts_url}/{id}")))
    }
}

/// The full broadcast resource.
///
/// Fields holding anything but a string read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastDetail {
    /// Subject line.
    #[serde(default, deserialize_with = "string_or_none")]
    pub subject: Option<String>,
    /// Lifecycle status as reported by the server.
    #[serde(default, deserialize_with = "string_or_none")]
    pub status: Option<String>,
    /// Send time, for sent broadcasts.
    #[serde(default, deserialize_with = "string_or_none")]
    pub sent_at: Option<String>,
    /// Planned send time, for scheduled broadcasts.
    #[serde(default, deserialize_with = "string_or_none")]
    pub scheduled_for: Option<String>,
    /// HTML body.
    #[serde(default, deserialize_with = "string_or_none")]
    pub body_html: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.aweber.com/1.0/accounts/1/lists/2/broadcasts";

    #[test]
    fn test_collection_defaults() {
        let page: Collection<Account> = serde_json::from_str("{}").unwrap();
        assert!(page.entries.is_empty());
        assert!(page.next_collection_link.is_none());
    }

    #[test]
    fn test_collection_page_keeps_malformed_rows() {
        let page: Collection = serde_json::from_value(serde_json::json!({
            "entries": [{"broadcast_id": 5, "subject": "ignored"}, {"broadcast_id": "6"}],
            "next_collection_link": "https://next",
            "total_size": 120
        }))
        .unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.next_collection_link.as_deref(), Some("https://next"));

        let good: BroadcastEntry = serde_json::from_value(page.entries[0].clone()).unwrap();
        assert_eq!(good.broadcast_id, Some(5));
        assert!(serde_json::from_value::<BroadcastEntry>(page.entries[1].clone()).is_err());
    }

    #[test]
    fn test_detail_link_prefers_self_link() {
        let entry = BroadcastEntry {
            self_link: Some("https://api/broadcasts/9".into()),
            broadcast_id: Some(5),
        };
        assert_eq!(entry.detail_link(BASE).unwrap(), "https://api/broadcasts/9");
    }

    #[test]
    fn test_detail_link_falls_back_to_id() {
        let entry = BroadcastEntry {
            self_link: Some(String::new()),
            broadcast_id: Some(5),
        };
        assert_eq!(entry.detail_link(BASE).unwrap(), format!("{BASE}/5"));
        assert!(BroadcastEntry::default().detail_link(BASE).is_none());
    }

    #[test]
    fn test_detail_nulls() {
        let detail: BroadcastDetail = serde_json::from_value(serde_json::json!({
            "subject": "Hello",
            "sent_at": null,
            "scheduled_for": "2024-05-01T10:00:00Z",
            "body_html": null
        }))
        .unwrap();
        assert_eq!(detail.subject.as_deref(), Some("Hello"));
        assert!(detail.sent_at.is_none());
        assert!(detail.body_html.is_none());
    }

    #[test]
    fn test_detail_odd_field_types() {
        let detail: BroadcastDetail = serde_json::from_value(serde_json::json!({
            "subject": 42,
            "sent_at": "2024-05-01",
            "body_html": {"html": "<p>x</p>"}
        }))
        .unwrap();
        assert!(detail.subject.is_none());
        assert_eq!(detail.sent_at.as_deref(), Some("2024-05-01"));
        assert!(detail.body_html.is_none());
    }
}
