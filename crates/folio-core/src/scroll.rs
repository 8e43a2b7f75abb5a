//! Scroll position tracker
//!
//! Derives the compact-header flag from the vertical scroll offset. The
//! flag is a pure threshold function of the latest sample with no
//! hysteresis, so offsets oscillating around the threshold flip it on
//! every sample.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::subscription::Subscription;
use crate::traits::ScrollSource;

/// Offset (in pixels) past which the header turns compact
pub const COMPACT_THRESHOLD: f64 = 50.0;

/// Whether `offset` is past `threshold`
///
/// Strictly greater: an offset equal to the threshold is not compact.
/// A NaN sample is never compact.
pub fn is_compact(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

/// Latest scroll sample and its derived flag
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub offset: f64,
    pub is_compact: bool,
}

impl ScrollState {
    fn sample(offset: f64, threshold: f64) -> Self {
        Self {
            offset,
            is_compact: is_compact(offset, threshold),
        }
    }
}

/// Tracks the scroll offset for the header
pub struct ScrollTracker {
    state: Arc<watch::Sender<ScrollState>>,
    attached: Arc<AtomicBool>,
    subscription: Subscription,
    threshold: f64,
}

impl ScrollTracker {
    /// Subscribe to `source` with the default threshold
    pub fn attach(source: &dyn ScrollSource) -> Self {
        Self::with_threshold(source, COMPACT_THRESHOLD)
    }

    /// Subscribe to `source` with a custom threshold
    pub fn with_threshold(source: &dyn ScrollSource, threshold: f64) -> Self {
        let (tx, _) = watch::channel(ScrollState::sample(0.0, threshold));
        let state = Arc::new(tx);
        let attached = Arc::new(AtomicBool::new(true));

        let callback = {
            let state = Arc::clone(&state);
            let attached = Arc::clone(&attached);
            Arc::new(move |offset: f64| {
                if !attached.load(Ordering::Acquire) {
                    return;
                }
                let next = ScrollState::sample(offset, threshold);
                // Watchers only wake on a compact flip; the offset is
                // still recorded for every sample.
                state.send_if_modified(|current| {
                    let flipped = current.is_compact != next.is_compact;
                    if flipped {
                        debug!(offset, is_compact = next.is_compact, "Header compact mode changed");
                    }
                    *current = next;
                    flipped
                });
            })
        };
        let subscription = source.subscribe(callback);

        Self {
            state,
            attached,
            subscription,
            threshold,
        }
    }

    pub fn state(&self) -> ScrollState {
        *self.state.borrow()
    }

    pub fn is_compact(&self) -> bool {
        self.state().is_compact
    }

    pub fn offset(&self) -> f64 {
        self.state().offset
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Watch compact-mode flips
    pub fn subscribe(&self) -> watch::Receiver<ScrollState> {
        self.state.subscribe()
    }

    /// Whether the tracker still listens to its source
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Stop listening; repeated calls are no-ops
    pub fn detach(&self) {
        self.attached.store(false, Ordering::Release);
        if self.subscription.cancel() {
            info!("Scroll tracker detached");
        }
    }
}

impl Drop for ScrollTracker {
    fn drop(&mut self) {
        self.detach();
    }
}
