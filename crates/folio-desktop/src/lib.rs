//! Desktop shell for the folio portfolio page.
//!
//! Renders the view-state controllers from `folio-core` in a Dioxus
//! desktop window, with JavaScript bridges standing in for the host
//! observers.

pub mod bridge;
pub mod components;
pub mod host;
pub mod state;
