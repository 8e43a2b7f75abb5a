//! Cancellable subscription handles
//!
//! Every host capability (scroll listener, visibility observer, interval
//! timer) hands back a [`Subscription`]. Cancelling runs the host's teardown
//! exactly once; repeated cancellation and drop after cancellation are no-ops.

use std::fmt;

use parking_lot::Mutex;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to an active host subscription
pub struct Subscription {
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` when cancelled
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A subscription with nothing to tear down
    pub fn inert() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    /// Cancel the subscription
    ///
    /// Returns `true` if this call performed the teardown.
    pub fn cancel(&self) -> bool {
        // Take under the lock, run outside it so teardown may re-enter.
        let teardown = self.teardown.lock().take();
        match teardown {
            Some(teardown) => {
                teardown();
                true
            }
            None => false,
        }
    }

    /// Whether teardown is still pending
    pub fn is_active(&self) -> bool {
        self.teardown.lock().is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
