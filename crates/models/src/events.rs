//! Public activity events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single commit carried by a push event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushCommit {
    pub message: String,
}

/// Event-specific data, keyed by event kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    Push { commits: Vec<PushCommit> },
    PullRequest,
    PullRequestReview,
    Issues { action: Option<String> },
    IssueComment,
    Other { event_type: String },
}

/// A public activity event from the user's timeline
///
/// `created_at` is kept as the raw upstream string: event data is untrusted
/// and a malformed timestamp only disqualifies that one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub created_at: String,
    pub repo_name: String,
    pub payload: EventPayload,
}

impl ActivityEvent {
    /// Parsed event time, `None` if the timestamp is malformed
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
