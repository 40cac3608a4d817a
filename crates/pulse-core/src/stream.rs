use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted stream-control record. At most one exists system-wide.
///
/// `search_term` keeps the last tracked term after a stop, so the status view
/// can show what was being tracked; only `is_active` decides whether a stream
/// is running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamState {
    pub search_term: Option<String>,
    pub is_active: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
}

impl StreamState {
    /// The term currently being tracked, if the stream is active.
    #[must_use]
    pub fn active_term(&self) -> Option<&str> {
        if self.is_active {
            self.search_term.as_deref()
        } else {
            None
        }
    }

    /// State after a successful start for `term`.
    #[must_use]
    pub fn started(&self, term: &str, at: DateTime<Utc>) -> Self {
        Self {
            search_term: Some(term.to_string()),
            is_active: true,
            started_at: Some(at),
            stopped_at: self.stopped_at,
        }
    }

    /// State after a successful stop.
    #[must_use]
    pub fn stopped(&self, at: DateTime<Utc>) -> Self {
        Self {
            search_term: self.search_term.clone(),
            is_active: false,
            started_at: self.started_at,
            stopped_at: Some(at),
        }
    }
}

/// Where a status answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    /// Read from the persistence collaborator.
    Persisted,
    /// Persistence was unreadable; served from the last known in-memory state.
    Cached,
}

/// Read-only projection of [`StreamState`] returned by status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    pub is_active: bool,
    pub search_term: Option<String>,
    pub source: StatusSource,
}

impl StreamStatus {
    #[must_use]
    pub fn from_state(state: &StreamState, source: StatusSource) -> Self {
        Self {
            is_active: state.is_active,
            search_term: state.search_term.clone(),
            source,
        }
    }
}
