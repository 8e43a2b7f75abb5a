//! Watcher wake-ups for each controller
//!
//! Renderers re-render when a watch receiver wakes, so each controller must
//! wake watchers exactly when its observable value changes.

use std::sync::Arc;
use std::time::Duration;

use tokio_test::{assert_pending, assert_ready_ok, task};

use folio_core::{
    ActiveSectionTracker, ManualClock, RecordingThemeSink, RotatingLabel, ScrollHub,
    ScrollTracker, SectionRegistry, ThemeManager, ThemeMode, VisibilityEntry, VisibilityHub,
};

#[test]
fn test_scroll_wakes_only_on_flip() {
    let hub = ScrollHub::new();
    let tracker = ScrollTracker::attach(&hub);
    let mut rx = tracker.subscribe();

    {
        let mut changed = task::spawn(rx.changed());
        assert_pending!(changed.poll());

        hub.publish(10.0);
        hub.publish(49.0);
        assert!(!changed.is_woken());
        assert_pending!(changed.poll());

        hub.publish(75.0);
        assert!(changed.is_woken());
        assert_ready_ok!(changed.poll());
    }
    assert!(rx.borrow_and_update().is_compact);

    // Deeper scrolling keeps compact mode without waking
    hub.publish(900.0);
    let mut changed = task::spawn(rx.changed());
    assert_pending!(changed.poll());
    assert_eq!(tracker.offset(), 900.0);
}

#[test]
fn test_active_section_wakes_on_change_only() {
    let hub = VisibilityHub::new();
    let tracker = ActiveSectionTracker::observe(SectionRegistry::default(), &hub);
    let mut rx = tracker.subscribe();

    {
        let mut changed = task::spawn(rx.changed());
        assert_pending!(changed.poll());

        // Re-reporting the initial section is not a change
        hub.publish(&[VisibilityEntry::visible("hero")]);
        // Below threshold
        hub.publish(&[VisibilityEntry::new("about", true, 0.3)]);
        assert!(!changed.is_woken());

        hub.publish(&[VisibilityEntry::new("about", true, 0.6)]);
        assert!(changed.is_woken());
        assert_ready_ok!(changed.poll());
    }
    assert_eq!(rx.borrow_and_update().as_str(), "about");
}

#[test]
fn test_rotation_wakes_per_tick() {
    let clock = ManualClock::new();
    let label = RotatingLabel::start(
        vec!["A".into(), "B".into()],
        Duration::from_millis(3000),
        &clock,
    )
    .unwrap();
    let mut rx = label.subscribe();

    let mut changed = task::spawn(rx.changed());
    clock.advance(Duration::from_millis(2999));
    assert_pending!(changed.poll());

    clock.advance(Duration::from_millis(1));
    assert!(changed.is_woken());
    assert_ready_ok!(changed.poll());
}

#[test]
fn test_toggle_wakes_watchers() {
    let theme = ThemeManager::new(ThemeMode::Dark, Arc::new(RecordingThemeSink::new()));
    let mut rx = theme.subscribe();

    let mut changed = task::spawn(rx.changed());
    assert_pending!(changed.poll());

    theme.toggle_theme();
    assert!(changed.is_woken());
    assert_ready_ok!(changed.poll());
    drop(changed);
    assert_eq!(*rx.borrow(), ThemeMode::Light);
}
