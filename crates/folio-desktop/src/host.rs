//! DOM-backed host capabilities.
//!
//! Each capability turns a controller request into a small JavaScript
//! snippet run through `document::eval`. Ids are JSON-encoded before being
//! spliced into a script.

use std::collections::BTreeSet;
use std::sync::Arc;

use dioxus::prelude::*;
use parking_lot::Mutex;

use folio_core::{
    CueError, FeedbackCue, NavigationHost, ScrollBehavior, SectionId, ThemeMode, ThemeSink,
};

/// Encode a string as a JavaScript literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script toggling the dark marker class on the document root.
pub fn theme_script(mode: ThemeMode) -> String {
    format!(
        "document.documentElement.classList.toggle({}, {});",
        js_string(ThemeMode::ROOT_CLASS),
        mode.is_dark()
    )
}

/// Script scrolling a region into view.
pub fn scroll_script(id: &SectionId, behavior: ScrollBehavior) -> String {
    format!(
        "document.getElementById({})?.scrollIntoView({{ behavior: {} }});",
        js_string(id.as_str()),
        js_string(behavior.as_str())
    )
}

/// Short two-tone click played through Web Audio.
///
/// Autoplay restrictions reject the context silently; the script never throws.
const CUE_SCRIPT: &str = r#"
try {
    const ctx = new (window.AudioContext || window.webkitAudioContext)();
    const osc = ctx.createOscillator();
    const gain = ctx.createGain();
    osc.frequency.setValueAtTime(880, ctx.currentTime);
    osc.frequency.setValueAtTime(660, ctx.currentTime + 0.05);
    gain.gain.setValueAtTime(0.08, ctx.currentTime);
    gain.gain.exponentialRampToValueAtTime(0.0001, ctx.currentTime + 0.12);
    osc.connect(gain).connect(ctx.destination);
    osc.start();
    osc.stop(ctx.currentTime + 0.12);
    ctx.resume().catch(() => {});
} catch (_) {}
"#;

/// Applies the theme marker to `<html>`.
#[derive(Debug, Default)]
pub struct DomThemeSink;

impl ThemeSink for DomThemeSink {
    fn apply_theme(&self, mode: ThemeMode) {
        document::eval(&theme_script(mode));
    }
}

/// Plays the toggle cue.
#[derive(Debug, Default)]
pub struct DomCue;

impl FeedbackCue for DomCue {
    fn play(&self) -> Result<(), CueError> {
        document::eval(CUE_SCRIPT);
        Ok(())
    }
}

/// Navigation host over the rendered section regions.
///
/// Regions register themselves from their `onmounted` handler and drop out
/// when unmounted, so navigation to a region that is not on the page is
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct DomNavigationHost {
    mounted: Arc<Mutex<BTreeSet<SectionId>>>,
}

impl DomNavigationHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region_mounted(&self, id: SectionId) {
        tracing::debug!(section = %id, "Region mounted");
        self.mounted.lock().insert(id);
    }

    pub fn region_unmounted(&self, id: &SectionId) {
        tracing::debug!(section = %id, "Region unmounted");
        self.mounted.lock().remove(id);
    }

    /// Whether both handles share one mounted set
    pub fn same_host(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.mounted, &other.mounted)
    }

    pub fn mounted_regions(&self) -> Vec<SectionId> {
        self.mounted.lock().iter().cloned().collect()
    }
}

impl NavigationHost for DomNavigationHost {
    fn has_region(&self, id: &SectionId) -> bool {
        self.mounted.lock().contains(id)
    }

    fn scroll_into_view(&self, id: &SectionId, behavior: ScrollBehavior) {
        document::eval(&scroll_script(id, behavior));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_script() {
        assert_eq!(
            theme_script(ThemeMode::Dark),
            r#"document.documentElement.classList.toggle("dark", true);"#
        );
        assert!(theme_script(ThemeMode::Light).ends_with("false);"));
    }

    #[test]
    fn test_scroll_script_escapes_ids() {
        let script = scroll_script(&SectionId::new("about"), ScrollBehavior::Smooth);
        assert_eq!(
            script,
            r#"document.getElementById("about")?.scrollIntoView({ behavior: "smooth" });"#
        );

        let script = scroll_script(&SectionId::new("a\"); alert(1); (\""), ScrollBehavior::Instant);
        assert!(script.contains(r#""a\"); alert(1); (\"""#));
    }

    #[test]
    fn test_mounted_regions() {
        let host = DomNavigationHost::new();
        let about = SectionId::new("about");
        assert!(!host.has_region(&about));

        host.region_mounted(about.clone());
        assert!(host.has_region(&about));
        assert_eq!(host.mounted_regions(), vec![about.clone()]);

        host.region_unmounted(&about);
        assert!(!host.has_region(&about));

        assert!(host.same_host(&host.clone()));
        assert!(!host.same_host(&DomNavigationHost::new()));
    }
}
