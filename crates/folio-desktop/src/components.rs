//! Page components.

use std::rc::Rc;

use dioxus::prelude::*;
use tracing::{error, info};

use folio_core::{HeaderAppearance, NavEntry, NavItem, SectionId, ToggleIcon};

use crate::bridge;
use crate::host::DomNavigationHost;
use crate::state::{self, PageSession, SessionHandle};

/// Site title shown in the header.
const SITE_TITLE: &str = "Portfolio";

/// Root component: mounts the session or reports why it could not.
#[component]
pub fn App() -> Element {
    let session = use_hook(|| {
        let options = state::options();
        let Some(clock) = state::timer_clock() else {
            return Err("no timer runtime available".to_string());
        };
        PageSession::mount(&options, &clock)
            .map(|session| SessionHandle(Rc::new(session)))
            .map_err(|err| err.to_string())
    });

    match session {
        Ok(session) => rsx! { Page { session } },
        Err(message) => {
            error!(error = %message, "Failed to mount page");
            rsx! {
                div { class: "mount-error",
                    h1 { "Unable to start" }
                    p { "{message}" }
                }
            }
        }
    }
}

/// The mounted page.
#[component]
fn Page(session: SessionHandle) -> Element {
    let mut snapshot = use_signal(|| session.snapshot());

    // Teardown on unmount
    use_drop({
        let session = session.clone();
        move || {
            info!("Page unmounted");
            session.composer.teardown();
        }
    });

    // DOM bridges
    use_future({
        let hub = session.scroll.clone();
        move || bridge::pump_scroll(hub.clone())
    });
    use_future({
        let hub = session.visibility.clone();
        let threshold = state::options().config.sections.visibility_threshold;
        move || bridge::pump_visibility(hub.clone(), threshold)
    });

    // Controller state -> snapshot signal
    use_future({
        let session = session.clone();
        move || {
            let session = session.clone();
            let mut snapshot = snapshot;
            async move {
                let composer = &session.composer;
                let mut theme = composer.theme().subscribe();
                let mut scroll = composer.scroll().subscribe();
                let mut sections = composer.sections().subscribe();
                let mut roles = composer.roles().subscribe();
                loop {
                    let changed = tokio::select! {
                        r = theme.changed() => r,
                        r = scroll.changed() => r,
                        r = sections.changed() => r,
                        r = roles.changed() => r,
                    };
                    if changed.is_err() {
                        break;
                    }
                    let next = session.snapshot();
                    if *snapshot.peek() != next {
                        snapshot.set(next);
                    }
                }
            }
        }
    });

    let on_navigate = {
        let session = session.clone();
        move |id: SectionId| {
            session.composer.scroll_to_section(id.as_str());
        }
    };
    let on_toggle = {
        let session = session.clone();
        move |_: ()| {
            session.composer.toggle_theme();
        }
    };

    let view = snapshot.read().clone();
    let items: Vec<NavItem> = session.composer.registry().items().to_vec();
    let contact = state::options().config.contact_section().cloned();
    let host = session.navigation.clone();

    rsx! {
        div { class: "page",
            Header {
                appearance: view.appearance,
                entries: view.entries.clone(),
                on_navigate: on_navigate.clone(),
                on_toggle: on_toggle,
            }
            main { class: "page-main",
                for (index, item) in items.into_iter().enumerate() {
                    if index == 0 {
                        Hero {
                            key: "{item.id}",
                            item: item.clone(),
                            host: RegionHost(host.clone()),
                            role: view.role.clone(),
                            contact: contact.clone(),
                            on_navigate: on_navigate.clone(),
                        }
                    } else {
                        SectionBlock {
                            key: "{item.id}",
                            item: item.clone(),
                            host: RegionHost(host.clone()),
                        }
                    }
                }
            }
        }
    }
}

/// Fixed header with navigation links and the theme toggle.
#[component]
pub fn Header(
    appearance: HeaderAppearance,
    entries: Vec<NavEntry>,
    on_navigate: EventHandler<SectionId>,
    on_toggle: EventHandler<()>,
) -> Element {
    let link_class = appearance.link_class();

    rsx! {
        header { class: "{appearance.container_class()}",
            div { class: "header-inner",
                span { class: "{appearance.title_class()}", "{SITE_TITLE}" }
                nav { class: "nav-links",
                    for entry in entries {
                        {
                            let id = entry.item.id.clone();
                            let active = if entry.active { " active" } else { "" };
                            rsx! {
                                button {
                                    key: "{entry.item.id}",
                                    class: "{link_class}{active}",
                                    onclick: move |_| on_navigate.call(id.clone()),
                                    "{entry.item.label}"
                                }
                            }
                        }
                    }
                }
                ThemeToggle {
                    class: appearance.toggle_class(),
                    icon: appearance.toggle_icon(),
                    on_toggle: on_toggle,
                }
            }
        }
    }
}

/// Sun/moon button flipping the theme.
#[component]
pub fn ThemeToggle(class: &'static str, icon: ToggleIcon, on_toggle: EventHandler<()>) -> Element {
    rsx! {
        button {
            class: "{class}",
            title: "{icon.title()}",
            onclick: move |_| on_toggle.call(()),
            "{icon.glyph()}"
        }
    }
}

/// Navigation host handed to regions.
///
/// Equal when both wrap the same mounted set.
#[derive(Clone)]
pub struct RegionHost(pub DomNavigationHost);

impl PartialEq for RegionHost {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_host(&other.0)
    }
}

/// Page region registered with the navigation host while mounted.
#[component]
fn Region(item: NavItem, host: RegionHost, class: String, children: Element) -> Element {
    use_drop({
        let host = host.0.clone();
        let id = item.id.clone();
        move || host.region_unmounted(&id)
    });

    let id = item.id.clone();
    rsx! {
        section {
            id: "{item.id}",
            class: "{class}",
            onmounted: move |_| host.0.region_mounted(id.clone()),
            {children}
        }
    }
}

/// Landing region with the rotating role label.
#[component]
pub fn Hero(
    item: NavItem,
    host: RegionHost,
    role: String,
    contact: Option<SectionId>,
    on_navigate: EventHandler<SectionId>,
) -> Element {
    rsx! {
        Region { item, host, class: "hero".to_string(),
            div { class: "hero-inner",
                h1 { class: "hero-title", "Hello, I'm a" }
                p { class: "hero-role", "{role}" }
                if let Some(contact) = contact {
                    button {
                        class: "hero-cta",
                        onclick: move |_| on_navigate.call(contact.clone()),
                        "Get in touch"
                    }
                }
            }
        }
    }
}

/// Placeholder region for a registered section.
#[component]
pub fn SectionBlock(item: NavItem, host: RegionHost) -> Element {
    let label = item.label.clone();
    rsx! {
        Region { item, host, class: "section-block".to_string(),
            h2 { class: "section-title", "{label}" }
        }
    }
}
