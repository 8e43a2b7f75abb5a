//! Rotating label animator
//!
//! Cycles a fixed, non-empty list of role labels on a repeating timer.
//! The animator owns its timer subscription; stopping it (explicitly or by
//! drop) cancels the timer so no tick mutates state after teardown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::RotationError;
use crate::subscription::Subscription;
use crate::traits::Clock;

/// Default delay between rotation ticks
pub const ROTATION_INTERVAL: Duration = Duration::from_millis(3000);

/// Role labels shown on the landing section
pub fn default_roles() -> Vec<String> {
    [
        "Full Stack Developer",
        "DevOps Engineer",
        "Cloud Architect",
        "Software Engineer",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Label list plus the current position
///
/// `index` is always in `0..roles.len()` and the list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRotation {
    roles: Arc<[String]>,
    index: usize,
}

impl RoleRotation {
    pub fn new(roles: Vec<String>) -> Result<Self, RotationError> {
        if roles.is_empty() {
            return Err(RotationError::EmptyRoles);
        }
        Ok(Self {
            roles: roles.into(),
            index: 0,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.roles[self.index]
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Move to the next label, wrapping at the end
    ///
    /// Returns `true` if the index changed (always, unless there is a
    /// single label).
    pub fn advance(&mut self) -> bool {
        let next = (self.index + 1) % self.roles.len();
        let changed = next != self.index;
        self.index = next;
        changed
    }
}

/// Drives a [`RoleRotation`] from a [`Clock`]
pub struct RotatingLabel {
    state: Arc<watch::Sender<RoleRotation>>,
    running: Arc<AtomicBool>,
    subscription: Subscription,
    interval: Duration,
}

impl RotatingLabel {
    /// Start rotating `roles` every `interval`
    pub fn start(
        roles: Vec<String>,
        interval: Duration,
        clock: &dyn Clock,
    ) -> Result<Self, RotationError> {
        if interval.is_zero() {
            return Err(RotationError::ZeroInterval);
        }
        let rotation = RoleRotation::new(roles)?;
        let labels = rotation.len();
        let (tx, _) = watch::channel(rotation);
        let state = Arc::new(tx);
        let running = Arc::new(AtomicBool::new(true));

        let tick = {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Arc::new(move || {
                // A tick already in flight when the timer is cancelled
                if !running.load(Ordering::Acquire) {
                    return;
                }
                state.send_if_modified(|rotation| {
                    let changed = rotation.advance();
                    debug!(index = rotation.index(), label = rotation.current(), "Role rotated");
                    changed
                });
            })
        };
        let subscription = clock.schedule_repeating(interval, tick);
        info!(labels, interval_ms = interval.as_millis() as u64, "Role rotation started");

        Ok(Self {
            state,
            running,
            subscription,
            interval,
        })
    }

    /// Start with the stock labels and interval
    pub fn with_defaults(clock: &dyn Clock) -> Result<Self, RotationError> {
        Self::start(default_roles(), ROTATION_INTERVAL, clock)
    }

    pub fn index(&self) -> usize {
        self.state.borrow().index()
    }

    /// The label currently shown
    pub fn current_label(&self) -> String {
        self.state.borrow().current().to_string()
    }

    pub fn snapshot(&self) -> RoleRotation {
        self.state.borrow().clone()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Watch label changes
    pub fn subscribe(&self) -> watch::Receiver<RoleRotation> {
        self.state.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Cancel the timer; repeated calls are no-ops
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        if self.subscription.cancel() {
            info!(index = self.index(), "Role rotation stopped");
        }
    }
}

impl Drop for RotatingLabel {
    fn drop(&mut self) {
        self.stop();
    }
}
