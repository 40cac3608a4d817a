use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pulse_core::{normalize_search_term, StatusSource, StreamState, StreamStatus};
use tracing::{info, warn};

use crate::error::StreamError;
use crate::store::StreamStore;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Idle/Active stream state machine backed by a [`StreamStore`].
///
/// The store is the source of truth. The controller keeps the last state it
/// read or wrote only to answer [`status`](Self::status) when the store is
/// unreadable. Calls are expected to be serialized by the owner (`&mut self`).
pub struct StreamController<S> {
    store: S,
    cache: StreamState,
    clock: Clock,
}

impl<S: fmt::Debug> fmt::Debug for StreamController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamController")
            .field("store", &self.store)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<S: StreamStore> StreamController<S> {
    /// Controller with an idle cache and the wall clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    pub fn with_clock<F>(store: S, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            store,
            cache: StreamState::default(),
            clock: Arc::new(clock),
        }
    }

    /// Controller whose cache is hydrated from the store.
    ///
    /// A failed read leaves the cache idle; the next successful read or
    /// write replaces it.
    pub async fn restore(store: S) -> Self {
        let mut controller = Self::new(store);
        match controller.store.load().await {
            Ok(Some(state)) => {
                info!(
                    term = state.search_term.as_deref().unwrap_or(""),
                    is_active = state.is_active,
                    "restored stream state"
                );
                controller.cache = state;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not restore stream state; starting idle"),
        }
        controller
    }

    /// Last state read from or written to the store.
    pub fn cached(&self) -> &StreamState {
        &self.cache
    }

    /// Track `term`, stopping any active stream first.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Validation`] for an empty or whitespace-only
    /// term before anything is read or written, and
    /// [`StreamError::StoreUnavailable`] if a write fails.
    pub async fn start(&mut self, term: &str) -> Result<StreamState, StreamError> {
        let term = normalize_search_term(term)?;

        if self.current().await.is_active {
            self.stop().await?;
        }

        let next = self.cache.started(term, (self.clock)());
        self.store.save(&next).await?;
        info!(term, "stream started");
        self.cache = next.clone();
        Ok(next)
    }

    /// Go idle. Succeeds when already idle, refreshing `stopped_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::StoreUnavailable`] if the write fails.
    pub async fn stop(&mut self) -> Result<StreamState, StreamError> {
        let previous = self.current().await;
        let next = previous.stopped((self.clock)());
        self.store.save(&next).await?;
        if let Some(term) = previous.active_term() {
            info!(term, "stream stopped");
        }
        self.cache = next.clone();
        Ok(next)
    }

    /// Persisted state, or the cached state flagged as such if the store is unreadable.
    pub async fn status(&mut self) -> StreamStatus {
        match self.store.load().await {
            Ok(state) => {
                self.cache = state.unwrap_or_default();
                StreamStatus::from_state(&self.cache, StatusSource::Persisted)
            }
            Err(e) => {
                warn!(error = %e, "stream store unreadable; serving cached status");
                StreamStatus::from_state(&self.cache, StatusSource::Cached)
            }
        }
    }

    async fn current(&mut self) -> StreamState {
        match self.store.load().await {
            Ok(state) => {
                self.cache = state.unwrap_or_default();
            }
            Err(e) => warn!(error = %e, "stream store unreadable; using cached state"),
        }
        self.cache.clone()
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
