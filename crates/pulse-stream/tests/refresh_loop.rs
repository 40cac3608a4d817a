use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pulse_core::{Batch, Record, Sentiment};
use pulse_stream::{
    LoopView, MemoryStreamStore, RecordSource, RefreshLoop, StreamController, StreamError,
};
use tokio::sync::{watch, Semaphore};
use tokio::time::{timeout, Instant};

const PERIOD: Duration = Duration::from_secs(5);

/// Record source whose calls can be delayed, held, or failed.
#[derive(Default)]
struct FakeSource {
    calls: AtomicUsize,
    fail: AtomicBool,
    gate: Option<Semaphore>,
    delays: Mutex<VecDeque<Duration>>,
}

impl FakeSource {
    fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    fn with_delays(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: Mutex::new(delays.into_iter().collect()),
            ..Self::default()
        }
    }

    fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn fetch_batch(&self, term: &str) -> Result<Batch, StreamError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(StreamError::Fetch("store down".to_string()));
        }
        Ok(Batch::new(vec![Record {
            id: format!("{term}-{call}"),
            text: format!("talking about {term} #{term}"),
            author: "fake".to_string(),
            created_at: Utc::now(),
            sentiment: Sentiment::Positive,
            sentiment_score: 0.5,
            is_synthetic: false,
        }]))
    }
}

async fn wait_until(
    rx: &mut watch::Receiver<LoopView>,
    pred: impl FnMut(&LoopView) -> bool,
) -> LoopView {
    timeout(Duration::from_secs(60), rx.wait_for(pred))
        .await
        .expect("timed out waiting for refresh")
        .expect("refresh loop dropped")
        .clone()
}

async fn wait_for_calls(source: &FakeSource, n: usize) {
    for _ in 0..1_000 {
        if source.calls() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("source saw {} calls, expected {n}", source.calls());
}

#[tokio::test(start_paused = true)]
async fn first_fetch_happens_without_waiting_a_period() {
    let source = Arc::new(FakeSource::default());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    let started = Instant::now();
    refresh.activate("rust");
    let view = wait_until(&mut rx, |v| v.latest.is_some()).await;

    assert!(started.elapsed() < PERIOD);
    let latest = view.latest.unwrap();
    assert_eq!(latest.term, "rust");
    assert_eq!(latest.batch.len(), 1);
    assert!(latest.snapshot.hashtags.has_data());
}

#[tokio::test(start_paused = true)]
async fn each_tick_replaces_the_batch() {
    let source = Arc::new(FakeSource::default());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    refresh.activate("go");
    let first = wait_until(&mut rx, |v| v.latest.is_some()).await;
    let first_seq = first.latest.unwrap().seq;

    let second = wait_until(&mut rx, |v| {
        v.latest.as_ref().is_some_and(|l| l.seq > first_seq)
    })
    .await;
    let latest = second.latest.unwrap();
    assert_eq!(latest.batch.len(), 1, "batch is replaced, not merged");
    assert_eq!(latest.batch.records[0].id, "go-2");
}

#[tokio::test(start_paused = true)]
async fn failed_tick_keeps_previous_batch_and_loop_survives() {
    let source = Arc::new(FakeSource::default());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    refresh.activate("tokio");
    let first = wait_until(&mut rx, |v| v.latest.is_some()).await;
    let first_seq = first.latest.unwrap().seq;

    source.fail.store(true, Ordering::SeqCst);
    tokio::time::sleep(PERIOD * 2).await;
    assert!(source.calls() >= 2);
    assert_eq!(refresh.current().latest.unwrap().seq, first_seq);

    source.fail.store(false, Ordering::SeqCst);
    let recovered = wait_until(&mut rx, |v| {
        v.latest.as_ref().is_some_and(|l| l.seq > first_seq)
    })
    .await;
    assert!(recovered.active_term.is_some());
}

#[tokio::test(start_paused = true)]
async fn fetch_resolving_after_stop_is_discarded() {
    let source = Arc::new(FakeSource::gated());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);

    refresh.activate("a");
    wait_for_calls(&source, 1).await;

    refresh.deactivate();
    source.release(10);
    tokio::time::sleep(PERIOD * 3).await;

    let view = refresh.current();
    assert!(view.active_term.is_none());
    assert!(view.latest.is_none(), "stale fetch mutated state after stop");
    assert_eq!(source.calls(), 1, "no ticks after deactivation");
}

#[tokio::test(start_paused = true)]
async fn fetch_for_previous_term_is_discarded() {
    let source = Arc::new(FakeSource::gated());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    refresh.activate("old");
    wait_for_calls(&source, 1).await;
    refresh.activate("new");
    wait_for_calls(&source, 2).await;

    source.release(100);
    let view = wait_until(&mut rx, |v| v.latest.is_some()).await;
    assert_eq!(view.latest.unwrap().term, "new");

    tokio::time::sleep(PERIOD).await;
    assert_eq!(refresh.current().latest.unwrap().term, "new");
}

#[tokio::test(start_paused = true)]
async fn slow_older_tick_never_overwrites_newer_result() {
    // Tick 1 takes longer than two periods; ticks 2 and 3 resolve first.
    let source = Arc::new(FakeSource::with_delays([
        Duration::from_secs(12),
        Duration::ZERO,
        Duration::ZERO,
    ]));
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    refresh.activate("race");
    let view = wait_until(&mut rx, |v| v.latest.as_ref().is_some_and(|l| l.seq >= 3)).await;
    let applied = view.latest.unwrap().seq;

    tokio::time::sleep(Duration::from_secs(3)).await;
    let after = refresh.current().latest.unwrap();
    assert!(after.seq >= applied, "tick {} overwrote tick {applied}", after.seq);
    assert_ne!(after.seq, 1);
}

#[tokio::test(start_paused = true)]
async fn controller_and_loop_stop_together() {
    let store = Arc::new(MemoryStreamStore::new());
    let mut controller = StreamController::new(Arc::clone(&store));
    let source = Arc::new(FakeSource::default());
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);
    let mut rx = refresh.subscribe();

    let state = controller.start("pulse").await.unwrap();
    refresh.activate(state.active_term().unwrap());
    wait_until(&mut rx, |v| v.latest.is_some()).await;

    controller.stop().await.unwrap();
    refresh.deactivate();
    let calls = source.calls();
    tokio::time::sleep(PERIOD * 4).await;

    assert_eq!(source.calls(), calls);
    assert!(!store.snapshot().unwrap().is_active);
    assert!(!refresh.is_active());
}

/// Source whose fetches never resolve; counts fetches still alive.
#[derive(Default)]
struct HangingSource {
    live: Arc<AtomicUsize>,
}

struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordSource for HangingSource {
    async fn fetch_batch(&self, _term: &str) -> Result<Batch, StreamError> {
        self.live.fetch_add(1, Ordering::SeqCst);
        let _guard = LiveGuard(Arc::clone(&self.live));
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn hung_fetches_are_aborted_on_deactivate() {
    let source = Arc::new(HangingSource::default());
    let live = Arc::clone(&source.live);
    let mut refresh = RefreshLoop::new(Arc::clone(&source), PERIOD);

    refresh.activate("stuck");
    tokio::time::sleep(PERIOD * 3 + Duration::from_millis(10)).await;
    assert!(live.load(Ordering::SeqCst) >= 3, "ticks should pile up");

    refresh.deactivate();
    for _ in 0..1_000 {
        if live.load(Ordering::SeqCst) == 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(live.load(Ordering::SeqCst), 0, "fetches outlived the loop");
}
