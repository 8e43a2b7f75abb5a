//! In-memory host implementations
//!
//! These hosts implement the capability traits without a rendering
//! surface. Real adapters feed [`ScrollHub`] and [`VisibilityHub`] from
//! their event streams; tests drive them directly with synthetic samples.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_core::{ScrollHub, ScrollTracker};
//!
//! let hub = ScrollHub::new();
//! let tracker = ScrollTracker::attach(&hub);
//!
//! hub.publish(120.0);
//! assert!(tracker.is_compact());
//! ```

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::{CueError, PreferenceError};
use crate::section::{SectionId, SectionRegistry};
use crate::subscription::Subscription;
use crate::theme::ThemeMode;
use crate::traits::{
    FeedbackCue, NavigationHost, ScrollBehavior, ScrollCallback, ScrollSource, ThemePreferenceStore,
    ThemeSink, VisibilityCallback, VisibilityEntry, VisibilitySource,
};

/// Listener table shared between a hub and its subscriptions
struct Listeners<T> {
    next_id: u64,
    entries: BTreeMap<u64, T>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

fn register<T: Send + 'static>(listeners: &Arc<Mutex<Listeners<T>>>, entry: T) -> Subscription {
    let id = {
        let mut guard = listeners.lock();
        let id = guard.next_id;
        guard.next_id += 1;
        guard.entries.insert(id, entry);
        id
    };
    let listeners = Arc::downgrade(listeners);
    Subscription::new(move || {
        if let Some(listeners) = listeners.upgrade() {
            listeners.lock().entries.remove(&id);
        }
    })
}

/// Scroll source fed by [`ScrollHub::publish`]
#[derive(Clone, Default)]
pub struct ScrollHub {
    listeners: Arc<Mutex<Listeners<ScrollCallback>>>,
}

impl ScrollHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an offset sample to every subscriber
    pub fn publish(&self, offset: f64) {
        let callbacks: Vec<ScrollCallback> =
            self.listeners.lock().entries.values().cloned().collect();
        for callback in callbacks {
            callback(offset);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

impl ScrollSource for ScrollHub {
    fn subscribe(&self, callback: ScrollCallback) -> Subscription {
        register(&self.listeners, callback)
    }
}

struct Observer {
    targets: Vec<SectionId>,
    threshold: f64,
    callback: VisibilityCallback,
}

/// Visibility source fed by [`VisibilityHub::publish`]
///
/// Each observer only receives the entries for the ids it observes, in
/// batch order. Observers with no matching entry are not called.
#[derive(Clone, Default)]
pub struct VisibilityHub {
    observers: Arc<Mutex<Listeners<Observer>>>,
}

impl VisibilityHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a batch to every observer
    pub fn publish(&self, batch: &[VisibilityEntry]) {
        let deliveries: Vec<(VisibilityCallback, Vec<VisibilityEntry>)> = self
            .observers
            .lock()
            .entries
            .values()
            .filter_map(|observer| {
                let entries: Vec<VisibilityEntry> = batch
                    .iter()
                    .filter(|entry| observer.targets.contains(&entry.id))
                    .cloned()
                    .collect();
                (!entries.is_empty()).then(|| (Arc::clone(&observer.callback), entries))
            })
            .collect();

        for (callback, entries) in deliveries {
            callback(&entries);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().entries.len()
    }

    /// Every id currently observed, in registration order
    pub fn observed_ids(&self) -> Vec<SectionId> {
        self.observers
            .lock()
            .entries
            .values()
            .flat_map(|observer| observer.targets.iter().cloned())
            .collect()
    }

    /// Threshold requested by the most recent live observer
    pub fn last_threshold(&self) -> Option<f64> {
        self.observers
            .lock()
            .entries
            .values()
            .next_back()
            .map(|observer| observer.threshold)
    }
}

impl VisibilitySource for VisibilityHub {
    fn observe(
        &self,
        targets: &[SectionId],
        threshold: f64,
        callback: VisibilityCallback,
    ) -> Subscription {
        register(
            &self.observers,
            Observer {
                targets: targets.to_vec(),
                threshold,
                callback,
            },
        )
    }
}

/// Theme sink that records every marker it applies
#[derive(Debug, Default)]
pub struct RecordingThemeSink {
    applied: Mutex<Vec<ThemeMode>>,
}

impl RecordingThemeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mode applied, oldest first
    pub fn applied(&self) -> Vec<ThemeMode> {
        self.applied.lock().clone()
    }

    /// The marker currently on the document
    pub fn current(&self) -> Option<ThemeMode> {
        self.applied.lock().last().copied()
    }
}

impl ThemeSink for RecordingThemeSink {
    fn apply_theme(&self, mode: ThemeMode) {
        self.applied.lock().push(mode);
    }
}

/// Navigation host with a fixed set of rendered regions
#[derive(Debug, Default)]
pub struct StaticNavigationHost {
    regions: Mutex<HashSet<SectionId>>,
    requests: Mutex<Vec<(SectionId, ScrollBehavior)>>,
}

impl StaticNavigationHost {
    pub fn new(regions: impl IntoIterator<Item = SectionId>) -> Self {
        Self {
            regions: Mutex::new(regions.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Host rendering every registered section
    pub fn from_registry(registry: &SectionRegistry) -> Self {
        Self::new(registry.ids())
    }

    pub fn insert_region(&self, id: SectionId) {
        self.regions.lock().insert(id);
    }

    pub fn remove_region(&self, id: &SectionId) {
        self.regions.lock().remove(id);
    }

    /// Scroll requests received, oldest first
    pub fn requests(&self) -> Vec<(SectionId, ScrollBehavior)> {
        self.requests.lock().clone()
    }
}

impl NavigationHost for StaticNavigationHost {
    fn has_region(&self, id: &SectionId) -> bool {
        self.regions.lock().contains(id)
    }

    fn scroll_into_view(&self, id: &SectionId, behavior: ScrollBehavior) {
        self.requests.lock().push((id.clone(), behavior));
    }
}

/// Cue that always succeeds and counts plays
#[derive(Debug, Default)]
pub struct SilentCue {
    plays: AtomicUsize,
}

impl SilentCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }
}

impl FeedbackCue for SilentCue {
    fn play(&self) -> Result<(), CueError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Cue that always fails, as when the host blocks playback
#[derive(Debug)]
pub struct FailingCue {
    reason: String,
    attempts: AtomicUsize,
}

impl FailingCue {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl FeedbackCue for FailingCue {
    fn play(&self) -> Result<(), CueError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CueError::Rejected(self.reason.clone()))
    }
}

/// Preference store kept in memory
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    mode: Mutex<Option<ThemeMode>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            mode: Mutex::new(Some(mode)),
        }
    }

    pub fn stored(&self) -> Option<ThemeMode> {
        *self.mode.lock()
    }
}

impl ThemePreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<ThemeMode>, PreferenceError> {
        Ok(*self.mode.lock())
    }

    fn save(&self, mode: ThemeMode) -> Result<(), PreferenceError> {
        *self.mode.lock() = Some(mode);
        Ok(())
    }
}
