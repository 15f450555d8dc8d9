//! Collected broadcast records.

use std::fmt;

use crate::api::model::BroadcastDetail;
use crate::extract;

/// Subject used when a broadcast has none.
pub const NO_SUBJECT: &str = "(No Subject)";

/// Date used when a broadcast is neither sent nor scheduled.
pub const NO_DATE: &str = "N/A";

/// Lifecycle states queried, in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastStatus {
    /// Not yet scheduled.
    Draft,
    /// Queued for a future send.
    Scheduled,
    /// Already delivered.
    Sent,
}

impl BroadcastStatus {
    /// All states, in the order they are fetched.
    pub const ALL: [Self; 3] = [Self::Draft, Self::Scheduled, Self::Sent];

    /// Value of the `status` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Sent => "sent",
        }
    }
}

impl fmt::Display for BroadcastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broadcast as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastMessage {
    /// Subject line.
    pub subject: String,
    /// Status reported by the server, or the status it was listed under.
    pub status: String,
    /// Sent date, else scheduled date, else [`NO_DATE`].
    pub date: String,
    /// Extracted text content.
    pub content: String,
}

impl BroadcastMessage {
    /// Builds the record from a detail resource fetched under `listed_as`.
    #[must_use]
    pub fn from_detail(detail: BroadcastDetail, listed_as: BroadcastStatus) -> Self {
        let content = extract::clean_html(detail.body_html.as_deref());
        Self {
            subject: detail.subject.unwrap_or_else(|| NO_SUBJECT.to_string()),
            status: non_empty(detail.status).unwrap_or_else(|| listed_as.as_str().to_string()),
            date: non_empty(detail.sent_at)
                .or_else(|| non_empty(detail.scheduled_for))
                .unwrap_or_else(|| NO_DATE.to_string()),
            content,
        }
    }

    /// Subject cut to `max` characters, for progress lines.
    #[must_use]
    pub fn short_subject(&self, max: usize) -> &str {
        self.subject
            .char_indices()
            .nth(max)
            .map_or(self.subject.as_str(), |(idx, _)| &self.subject[..idx])
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
