//! Collaborator seams: stream-state persistence and record fetching.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use pulse_core::{Batch, StreamState};

use crate::error::StreamError;

/// Durable home of the single stream-control record.
#[async_trait]
pub trait StreamStore: Send + Sync {
    /// Upsert the stream-control record.
    async fn save(&self, state: &StreamState) -> Result<(), StreamError>;

    /// Read the stream-control record; `None` before the first start.
    async fn load(&self) -> Result<Option<StreamState>, StreamError>;
}

#[async_trait]
impl<T: StreamStore + ?Sized> StreamStore for Arc<T> {
    async fn save(&self, state: &StreamState) -> Result<(), StreamError> {
        (**self).save(state).await
    }

    async fn load(&self) -> Result<Option<StreamState>, StreamError> {
        (**self).load().await
    }
}

/// Supplier of the current record batch for a term.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_batch(&self, term: &str) -> Result<Batch, StreamError>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn fetch_batch(&self, term: &str) -> Result<Batch, StreamError> {
        (**self).fetch_batch(term).await
    }
}

/// In-process [`StreamStore`] with switchable failures.
///
/// Every successful save is appended to a write log so callers can observe
/// intermediate transitions.
#[derive(Debug, Default)]
pub struct MemoryStreamStore {
    state: Mutex<Option<StreamState>>,
    writes: Mutex<Vec<StreamState>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStreamStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_state(state: StreamState) -> Self {
        let store = Self::default();
        *store.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current record, bypassing failure injection.
    #[must_use]
    pub fn snapshot(&self) -> Option<StreamState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every state saved so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<StreamState> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl StreamStore for MemoryStreamStore {
    async fn save(&self, state: &StreamState) -> Result<(), StreamError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StreamError::StoreUnavailable(
                "memory store rejecting writes".to_string(),
            ));
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<StreamState>, StreamError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StreamError::StoreUnavailable(
                "memory store rejecting reads".to_string(),
            ));
        }
        Ok(self.snapshot())
    }
}
