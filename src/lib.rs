//! Address autocomplete for a host form field, backed by the geo.admin.ch
//! SearchServer.
//!
//! The widget is headless: hosts translate their DOM events into
//! [`widget::event::WidgetEvent`]s, run the [`widget::event::SearchRequest`]s the
//! controller hands back, and apply the surface patches and field writes it
//! produces. The `bridge` module does this over NDJSON for an external page.

pub mod address;
pub mod bridge;
pub mod cli;
pub mod form;
pub mod panel;
pub mod search;
pub mod trace;
pub mod widget;
