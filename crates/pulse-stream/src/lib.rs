//! Stream lifecycle and the periodic refresh loop.
//!
//! [`StreamController`] owns the Idle/Active state machine and writes every
//! transition through a [`StreamStore`]. [`RefreshLoop`] polls a
//! [`RecordSource`] for the active term and publishes each applied batch,
//! with its derived dashboard snapshot, over a `watch` channel.

pub mod controller;
pub mod error;
pub mod refresh;
pub mod store;

pub use controller::StreamController;
pub use error::StreamError;
pub use refresh::{LoopView, RefreshLoop, RefreshState};
pub use store::{MemoryStreamStore, RecordSource, StreamStore};
