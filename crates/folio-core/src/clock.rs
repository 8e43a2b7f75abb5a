//! Clock implementations
//!
//! - [`ManualClock`]: virtual time advanced explicitly, for deterministic tests
//! - [`TokioClock`]: real timers on a tokio runtime

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

use crate::subscription::Subscription;
use crate::traits::{Clock, TickCallback};

/// Shortest interval a clock will schedule
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct Timer {
    interval: Duration,
    next_due: Duration,
    tick: TickCallback,
}

#[derive(Default)]
struct ManualClockInner {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<u64, Timer>,
}

/// Virtual clock driven by [`ManualClock::advance`]
///
/// Ticks fire in due-time order; timers due at the same instant fire in
/// the order they were scheduled. No lock is held while a tick runs, so a
/// tick may schedule or cancel timers.
#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of timers not yet cancelled
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Advance virtual time, firing every tick that falls due
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().now + by;
        while let Some(tick) = self.next_due(target) {
            tick();
        }
    }

    fn next_due(&self, target: Duration) -> Option<TickCallback> {
        let mut inner = self.inner.lock();
        let due = inner
            .timers
            .iter()
            .filter(|(_, timer)| timer.next_due <= target)
            .min_by_key(|(id, timer)| (timer.next_due, **id))
            .map(|(id, timer)| (*id, timer.next_due));

        let Some((id, due_at)) = due else {
            inner.now = target;
            return None;
        };
        inner.now = due_at;
        let timer = inner.timers.get_mut(&id)?;
        timer.next_due += timer.interval;
        trace!(timer = id, at_ms = due_at.as_millis() as u64, "Manual clock tick");
        Some(Arc::clone(&timer.tick))
    }
}

impl Clock for ManualClock {
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Subscription {
        let interval = interval.max(MIN_INTERVAL);
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let next_due = inner.now + interval;
            inner.timers.insert(
                id,
                Timer {
                    interval,
                    next_due,
                    tick,
                },
            );
            id
        };

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock().timers.remove(&id);
            }
        })
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ManualClock")
            .field("now", &inner.now)
            .field("timers", &inner.timers.len())
            .finish()
    }
}

/// Clock backed by tokio timers
///
/// The first tick fires one full interval after scheduling. Ticks that
/// fall behind are delayed rather than fired in a burst.
#[derive(Debug, Clone)]
pub struct TokioClock {
    handle: Handle,
}

impl TokioClock {
    /// Spawn timers on the given runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the current context, if any
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Clock for TokioClock {
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Subscription {
        let interval = interval.max(MIN_INTERVAL);
        let task = self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick();
            }
        });
        Subscription::new(move || task.abort())
    }
}
