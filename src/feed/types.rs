use chrono::{DateTime, Utc};
use serde::Serialize;

/// One `<item>` as read off the wire. Fields are trimmed but otherwise untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

/// A feed entry after normalization, keyed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    pub external_url: String,
}

/// Why a fetch produced no feed body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchFailure {
    #[error("{code} {reason}")]
    BadStatus { code: u16, reason: String },
    #[error("{detail}")]
    Transport { detail: String },
}

impl FetchFailure {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: err.to_string(),
        }
    }
}

/// Why a raw entry did not make it into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRejection {
    UnresolvableId,
    BadDate,
}
