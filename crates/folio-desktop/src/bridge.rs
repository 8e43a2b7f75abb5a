//! JavaScript bridges feeding the host hubs.
//!
//! The page reports scroll offsets and intersection batches back to Rust
//! with `dioxus.send`; each pump forwards them into the matching hub until
//! the eval channel closes.

use dioxus::prelude::*;
use tracing::{debug, warn};

use folio_core::{ScrollHub, SectionId, VisibilityEntry, VisibilityHub};

use crate::host::js_string;

const SCROLL_BRIDGE: &str = r#"
const send = () => dioxus.send(window.scrollY);
window.addEventListener("scroll", send, { passive: true });
send();
"#;

/// Script observing `ids` and sending each intersection batch.
///
/// Regions may mount after the script starts, so missing elements are
/// retried on the next animation frame.
pub fn visibility_script(ids: &[SectionId], threshold: f64) -> String {
    let ids = ids
        .iter()
        .map(|id| js_string(id.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
const ids = [{ids}];
const observer = new IntersectionObserver((entries) => {{
    dioxus.send(entries.map((entry) => ({{
        id: entry.target.id,
        is_intersecting: entry.isIntersecting,
        intersection_ratio: entry.intersectionRatio,
    }})));
}}, {{ threshold: [0, {threshold}] }});
const attached = new Set();
const attach = () => {{
    for (const id of ids) {{
        const el = document.getElementById(id);
        if (el && !attached.has(id)) {{
            observer.observe(el);
            attached.add(id);
        }}
    }}
    if (attached.size < ids.length) requestAnimationFrame(attach);
}};
attach();
"#
    )
}

/// Forward window scroll offsets into `hub`.
pub async fn pump_scroll(hub: ScrollHub) {
    let mut eval = document::eval(SCROLL_BRIDGE);
    loop {
        match eval.recv::<f64>().await {
            Ok(offset) => hub.publish(offset),
            Err(err) => {
                warn!(error = ?err, "Scroll bridge closed");
                break;
            }
        }
    }
}

/// Forward intersection batches for the hub's observed regions.
pub async fn pump_visibility(hub: VisibilityHub, threshold: f64) {
    let ids = hub.observed_ids();
    if ids.is_empty() {
        debug!("No observed regions; visibility bridge not started");
        return;
    }
    let threshold = hub.last_threshold().unwrap_or(threshold);

    let mut eval = document::eval(&visibility_script(&ids, threshold));
    loop {
        match eval.recv::<Vec<VisibilityEntry>>().await {
            Ok(batch) => hub.publish(&batch),
            Err(err) => {
                warn!(error = ?err, "Visibility bridge closed");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_script_lists_ids() {
        let ids = [SectionId::new("hero"), SectionId::new("about")];
        let script = visibility_script(&ids, 0.5);
        assert!(script.contains(r#"const ids = ["hero", "about"];"#));
        assert!(script.contains("threshold: [0, 0.5]"));
    }

    #[test]
    fn test_entry_shape_matches_bridge() {
        let entry: VisibilityEntry = serde_json::from_str(
            r#"{"id":"about","is_intersecting":true,"intersection_ratio":0.75}"#,
        )
        .unwrap();
        assert_eq!(entry, VisibilityEntry::new("about", true, 0.75));
    }
}
