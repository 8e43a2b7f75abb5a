//! Active section tracking
//!
//! [`ActiveSectionTracker`] observes every registered region and keeps the
//! id of the one most recently reported in view. Within one intersection
//! batch entries are processed in the order the host delivers them and each
//! qualifying entry overwrites the previous choice, so the last qualifying
//! entry of the batch wins. There is no ranking by visible area.
//!
//! [`SectionVisibility`] is the single-region variant: a plain
//! visible/hidden flag for one id.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, trace};

use crate::section::{SectionId, SectionRegistry};
use crate::subscription::Subscription;
use crate::traits::{VisibilityEntry, VisibilitySource};

/// Fraction of a region that must be in view for it to count
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Whether an entry makes its section the active one
pub fn qualifies(entry: &VisibilityEntry, threshold: f64) -> bool {
    entry.is_intersecting && entry.intersection_ratio >= threshold
}

/// Pick the section a batch leaves active, if any entry qualifies
///
/// Entries for ids outside the registry are ignored.
pub fn resolve_batch<'a>(
    registry: &SectionRegistry,
    batch: &'a [VisibilityEntry],
    threshold: f64,
) -> Option<&'a SectionId> {
    batch
        .iter()
        .filter(|entry| qualifies(entry, threshold))
        .filter(|entry| registry.contains(entry.id.as_str()))
        .last()
        .map(|entry| &entry.id)
}

/// Tracks which registered section is active
pub struct ActiveSectionTracker {
    registry: SectionRegistry,
    state: Arc<watch::Sender<SectionId>>,
    observing: Arc<AtomicBool>,
    subscription: Subscription,
}

impl ActiveSectionTracker {
    /// Observe every registered section with the default threshold
    pub fn observe(registry: SectionRegistry, source: &dyn VisibilitySource) -> Self {
        Self::with_threshold(registry, source, VISIBILITY_THRESHOLD)
    }

    /// Observe every registered section with a custom threshold
    pub fn with_threshold(
        registry: SectionRegistry,
        source: &dyn VisibilitySource,
        threshold: f64,
    ) -> Self {
        let (tx, _) = watch::channel(registry.initial().clone());
        let state = Arc::new(tx);
        let observing = Arc::new(AtomicBool::new(true));

        let callback = {
            let registry = registry.clone();
            let state = Arc::clone(&state);
            let observing = Arc::clone(&observing);
            Arc::new(move |batch: &[VisibilityEntry]| {
                if !observing.load(Ordering::Acquire) {
                    return;
                }
                trace!(entries = batch.len(), "Visibility batch");
                let Some(next) = resolve_batch(&registry, batch, threshold) else {
                    return;
                };
                state.send_if_modified(|current| {
                    if *current == *next {
                        return false;
                    }
                    debug!(from = %current, to = %next, "Active section changed");
                    *current = next.clone();
                    true
                });
            })
        };
        let subscription = source.observe(&registry.ids(), threshold, callback);
        info!(sections = registry.len(), threshold, "Observing sections");

        Self {
            registry,
            state,
            observing,
            subscription,
        }
    }

    pub fn active_id(&self) -> SectionId {
        self.state.borrow().clone()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.state.borrow().as_str() == id
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    /// Watch active section changes
    pub fn subscribe(&self) -> watch::Receiver<SectionId> {
        self.state.subscribe()
    }

    pub fn is_observing(&self) -> bool {
        self.observing.load(Ordering::Acquire)
    }

    /// Stop observing all regions; repeated calls are no-ops
    pub fn disconnect(&self) {
        self.observing.store(false, Ordering::Release);
        if self.subscription.cancel() {
            info!("Section observer disconnected");
        }
    }
}

impl Drop for ActiveSectionTracker {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Visible/hidden flag for a single section
pub struct SectionVisibility {
    id: SectionId,
    state: Arc<watch::Sender<bool>>,
    observing: Arc<AtomicBool>,
    subscription: Subscription,
}

impl SectionVisibility {
    /// Observe `id` with the default threshold
    pub fn observe(id: SectionId, source: &dyn VisibilitySource) -> Self {
        Self::with_threshold(id, source, VISIBILITY_THRESHOLD)
    }

    pub fn with_threshold(id: SectionId, source: &dyn VisibilitySource, threshold: f64) -> Self {
        let (tx, _) = watch::channel(false);
        let state = Arc::new(tx);
        let observing = Arc::new(AtomicBool::new(true));

        let callback = {
            let id = id.clone();
            let state = Arc::clone(&state);
            let observing = Arc::clone(&observing);
            Arc::new(move |batch: &[VisibilityEntry]| {
                if !observing.load(Ordering::Acquire) {
                    return;
                }
                if let Some(entry) = batch.iter().rev().find(|entry| entry.id == id) {
                    state.send_if_modified(|visible| {
                        let changed = *visible != entry.is_intersecting;
                        *visible = entry.is_intersecting;
                        changed
                    });
                }
            })
        };
        let subscription = source.observe(std::slice::from_ref(&id), threshold, callback);

        Self {
            id,
            state,
            observing,
            subscription,
        }
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Stop observing; repeated calls are no-ops
    pub fn unobserve(&self) {
        self.observing.store(false, Ordering::Release);
        if self.subscription.cancel() {
            debug!(section = %self.id, "Section visibility probe stopped");
        }
    }
}

impl Drop for SectionVisibility {
    fn drop(&mut self) {
        self.unobserve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::VisibilityHub;
    use crate::section::NavItem;
    use crate::traits::VisibilityCallback;
    use parking_lot::Mutex;

    /// Source that keeps the callback so batches can arrive after teardown
    #[derive(Default)]
    struct CapturingSource {
        callback: Mutex<Option<VisibilityCallback>>,
    }

    impl VisibilitySource for CapturingSource {
        fn observe(
            &self,
            _ids: &[SectionId],
            _threshold: f64,
            callback: VisibilityCallback,
        ) -> Subscription {
            *self.callback.lock() = Some(callback);
            Subscription::new(|| {})
        }
    }

    fn registry() -> SectionRegistry {
        SectionRegistry::default()
    }

    #[test]
    fn test_initial_is_first_registered() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);
        assert_eq!(tracker.active_id().as_str(), "hero");
        assert!(tracker.is_active("hero"));
    }

    #[test]
    fn test_explicit_initial() {
        let hub = VisibilityHub::new();
        let items = vec![NavItem::new("a", "A"), NavItem::new("b", "B")];
        let registry = SectionRegistry::with_initial(items, &SectionId::new("b")).unwrap();
        let tracker = ActiveSectionTracker::observe(registry, &hub);
        assert_eq!(tracker.active_id().as_str(), "b");
    }

    #[test]
    fn test_last_intersecting_entry_wins() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);

        hub.publish(&[VisibilityEntry::visible("about"), VisibilityEntry::visible("skills")]);
        assert_eq!(tracker.active_id().as_str(), "skills");

        // Batch order, not registry order
        hub.publish(&[VisibilityEntry::visible("contact"), VisibilityEntry::visible("about")]);
        assert_eq!(tracker.active_id().as_str(), "about");
    }

    #[test]
    fn test_no_area_ranking() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);

        hub.publish(&[
            VisibilityEntry::new("about", true, 1.0),
            VisibilityEntry::new("skills", true, 0.5),
        ]);
        assert_eq!(tracker.active_id().as_str(), "skills");
    }

    #[test]
    fn test_non_qualifying_entries_ignored() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);

        hub.publish(&[
            VisibilityEntry::visible("about"),
            VisibilityEntry::hidden("skills"),
            VisibilityEntry::new("projects", true, 0.2),
            VisibilityEntry::visible("footer"),
        ]);
        assert_eq!(tracker.active_id().as_str(), "about");

        hub.publish(&[VisibilityEntry::hidden("about")]);
        assert_eq!(tracker.active_id().as_str(), "about");
    }

    #[test]
    fn test_resolve_batch_empty() {
        let registry = registry();
        assert!(resolve_batch(&registry, &[], VISIBILITY_THRESHOLD).is_none());
    }

    #[test]
    fn test_observes_all_registered_ids() {
        let hub = VisibilityHub::new();
        let _tracker = ActiveSectionTracker::observe(registry(), &hub);
        let observed: Vec<String> = hub.observed_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(observed, ["hero", "about", "skills", "projects", "contact"]);
        assert_eq!(hub.last_threshold(), Some(VISIBILITY_THRESHOLD));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);
        assert_eq!(hub.observer_count(), 1);

        tracker.disconnect();
        tracker.disconnect();
        assert_eq!(hub.observer_count(), 0);
        assert!(!tracker.is_observing());

        hub.publish(&[VisibilityEntry::visible("contact")]);
        assert_eq!(tracker.active_id().as_str(), "hero");
    }

    #[test]
    fn test_watchers_see_changes_only() {
        let hub = VisibilityHub::new();
        let tracker = ActiveSectionTracker::observe(registry(), &hub);
        let mut rx = tracker.subscribe();

        hub.publish(&[VisibilityEntry::visible("hero")]);
        assert!(!rx.has_changed().unwrap());

        hub.publish(&[VisibilityEntry::visible("projects")]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_str(), "projects");
    }

    #[test]
    fn test_section_visibility_probe() {
        let hub = VisibilityHub::new();
        let probe = SectionVisibility::observe(SectionId::new("skills"), &hub);
        assert!(!probe.is_visible());

        hub.publish(&[VisibilityEntry::visible("about")]);
        assert!(!probe.is_visible());

        hub.publish(&[VisibilityEntry::visible("skills")]);
        assert!(probe.is_visible());

        hub.publish(&[VisibilityEntry::hidden("skills")]);
        assert!(!probe.is_visible());

        probe.unobserve();
        probe.unobserve();
        assert_eq!(hub.observer_count(), 0);
    }

    #[test]
    fn test_late_batch_after_unobserve_is_dropped() {
        let source = CapturingSource::default();
        let probe = SectionVisibility::observe(SectionId::new("skills"), &source);
        let deliver = source.callback.lock().clone().unwrap();

        deliver(&[VisibilityEntry::visible("skills")]);
        assert!(probe.is_visible());

        probe.unobserve();
        deliver(&[VisibilityEntry::hidden("skills")]);
        assert!(probe.is_visible());
    }

    #[test]
    fn test_late_batch_after_disconnect_is_dropped() {
        let source = CapturingSource::default();
        let tracker = ActiveSectionTracker::observe(registry(), &source);
        let deliver = source.callback.lock().clone().unwrap();

        tracker.disconnect();
        deliver(&[VisibilityEntry::visible("contact")]);
        assert_eq!(tracker.active_id().as_str(), "hero");
    }
}
