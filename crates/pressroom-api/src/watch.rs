//! Live-query subscription primitives.
//!
//! A live query delivers complete result snapshots through callbacks; the
//! caller owns a [`WatchHandle`] and must cancel it when the consuming view
//! goes away. Cancellation is tracked with an explicit liveness flag rather
//! than a captured closure variable so that late-delivery races are
//! observable in tests: a delivery attempted after `cancel()` is dropped,
//! never surfaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::AbortHandle;

use crate::ApiError;

/// Callbacks invoked by a live query.
///
/// `on_snapshot` receives the full result set on every delivery; each
/// snapshot replaces the previous one outright. `on_error` receives faults
/// already translated into the [`ApiError`] taxonomy.
pub struct WatchCallbacks<T> {
    pub on_snapshot: Box<dyn Fn(T) + Send + Sync>,
    pub on_error: Box<dyn Fn(ApiError) + Send + Sync>,
}

impl<T> WatchCallbacks<T> {
    pub fn new(
        on_snapshot: impl Fn(T) + Send + Sync + 'static,
        on_error: impl Fn(ApiError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_snapshot: Box::new(on_snapshot),
            on_error: Box::new(on_error),
        }
    }
}

/// Handle to an active live-query subscription.
///
/// Dropping the handle does NOT cancel the subscription; call
/// [`WatchHandle::cancel`]. This mirrors the ownership rule of the view
/// layer: whoever opened the watch disposes of it.
#[derive(Debug)]
pub struct WatchHandle {
    alive: Arc<AtomicBool>,
    abort: AbortHandle,
}

impl WatchHandle {
    pub fn new(alive: Arc<AtomicBool>, abort: AbortHandle) -> Self {
        Self { alive, abort }
    }

    /// Stop further callback delivery.
    ///
    /// The liveness flag flips synchronously, so a snapshot arriving after
    /// this call is discarded even if the delivery task has not yet been
    /// torn down.
    pub fn cancel(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.abort.abort();
    }

    pub fn is_active(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}
