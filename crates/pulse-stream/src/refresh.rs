use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pulse_analytics::DashboardSnapshot;
use pulse_core::Batch;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::store::RecordSource;

/// One applied refresh: the batch and everything derived from it.
#[derive(Debug, Clone)]
pub struct RefreshState {
    pub term: String,
    /// Tick sequence number; strictly increases across applied results.
    pub seq: u64,
    pub batch: Batch,
    pub snapshot: DashboardSnapshot,
    pub refreshed_at: DateTime<Utc>,
}

/// What subscribers observe.
#[derive(Debug, Clone, Default)]
pub struct LoopView {
    /// `None` while idle.
    pub active_term: Option<String>,
    pub latest: Option<Arc<RefreshState>>,
    session: u64,
}

impl LoopView {
    fn accepts(&self, session: u64, term: &str, seq: u64) -> bool {
        self.session == session
            && self.active_term.as_deref() == Some(term)
            && self.latest.as_ref().map_or(true, |latest| latest.seq < seq)
    }
}

/// Periodic fetcher for the active term.
///
/// Ticks start immediately on [`activate`](Self::activate) and repeat every
/// `period`. Each tick's fetch runs as its own task, so a hung fetch never
/// delays later ticks. A result is applied only if the loop is still active
/// for the session and term it was issued under, and no newer tick has
/// already been applied; everything else is dropped.
pub struct RefreshLoop<R> {
    source: Arc<R>,
    period: Duration,
    view: Arc<watch::Sender<LoopView>>,
    seq: Arc<AtomicU64>,
    ticks: Option<CancellationToken>,
}

impl<R: RecordSource + 'static> RefreshLoop<R> {
    #[must_use]
    pub fn new(source: Arc<R>, period: Duration) -> Self {
        let (view, _) = watch::channel(LoopView::default());
        Self {
            source,
            period,
            view: Arc::new(view),
            seq: Arc::new(AtomicU64::new(0)),
            ticks: None,
        }
    }

    /// Start polling `term`, replacing any current activation.
    ///
    /// Switching to a different term drops the previous term's results.
    pub fn activate(&mut self, term: &str) {
        self.cancel_ticks();

        let mut session = 0;
        self.view.send_modify(|view| {
            view.session += 1;
            session = view.session;
            if view.active_term.as_deref() != Some(term) {
                view.latest = None;
            }
            view.active_term = Some(term.to_string());
        });

        let cancel = CancellationToken::new();
        tokio::spawn(run_ticks(
            Arc::clone(&self.source),
            self.period,
            term.to_string(),
            session,
            Arc::clone(&self.view),
            Arc::clone(&self.seq),
            cancel.clone(),
        ));
        self.ticks = Some(cancel);
        info!(term, period_secs = self.period.as_secs(), "refresh loop active");
    }

    /// Stop ticking. In-flight fetches are aborted and never applied.
    pub fn deactivate(&mut self) {
        self.cancel_ticks();
        self.view.send_if_modified(|view| {
            if view.active_term.is_none() {
                return false;
            }
            view.active_term = None;
            view.session += 1;
            true
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoopView> {
        self.view.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> LoopView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.view.borrow().active_term.is_some()
    }
}

impl<R> RefreshLoop<R> {
    fn cancel_ticks(&mut self) {
        if let Some(ticks) = self.ticks.take() {
            ticks.cancel();
        }
    }
}

impl<R> Drop for RefreshLoop<R> {
    fn drop(&mut self) {
        self.cancel_ticks();
    }
}

async fn run_ticks<R: RecordSource + 'static>(
    source: Arc<R>,
    period: Duration,
    term: String,
    session: u64,
    view: Arc<watch::Sender<LoopView>>,
    seq: Arc<AtomicU64>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(term = %term, in_flight = in_flight.len(), "refresh ticks cancelled");
                in_flight.abort_all();
                break;
            }
            _ = ticker.tick() => {
                let tick = seq.fetch_add(1, Ordering::SeqCst) + 1;
                in_flight.spawn(fetch_and_apply(
                    Arc::clone(&source),
                    term.clone(),
                    session,
                    tick,
                    Arc::clone(&view),
                ));
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
}

async fn fetch_and_apply<R: RecordSource>(
    source: Arc<R>,
    term: String,
    session: u64,
    tick: u64,
    view: Arc<watch::Sender<LoopView>>,
) {
    let batch = match source.fetch_batch(&term).await {
        Ok(batch) => batch,
        Err(e) => {
            warn!(term = %term, tick, error = %e, "refresh tick failed; keeping previous batch");
            return;
        }
    };

    let snapshot = DashboardSnapshot::from_batch(&batch);
    let record_count = batch.len();
    let mut pending = Some(RefreshState {
        term: term.clone(),
        seq: tick,
        batch,
        snapshot,
        refreshed_at: Utc::now(),
    });

    let applied = view.send_if_modified(|current| {
        if !current.accepts(session, &term, tick) {
            return false;
        }
        current.latest = pending.take().map(Arc::new);
        true
    });

    if applied {
        debug!(term = %term, tick, records = record_count, "refresh applied");
    } else {
        debug!(term = %term, tick, "discarding stale refresh result");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_other_session_term_or_older_tick() {
        let view = LoopView {
            active_term: Some("a".to_string()),
            latest: None,
            session: 2,
        };
        assert!(view.accepts(2, "a", 1));
        assert!(!view.accepts(1, "a", 5));
        assert!(!view.accepts(2, "b", 5));

        let idle = LoopView {
            active_term: None,
            ..view
        };
        assert!(!idle.accepts(2, "a", 5));
    }
}
