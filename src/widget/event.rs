use serde::{Deserialize, Serialize};

use crate::{
    panel::geometry::{ElementGeometry, ScrollOffset},
    search::client::{SearchBackend, SearchOutcome},
};

/// Identifies one issued query. Newer queries get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryToken(pub u64);

/// What a pointer press landed on, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The anchor input itself
    Anchor,
    /// The surface, outside any row
    Panel,
    /// A suggestion row; activates it
    Row(usize),
    Outside,
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum WidgetEvent {
    Input {
        value: String,
        anchor: ElementGeometry,
        scroll: ScrollOffset,
    },
    SearchResolved {
        token: QueryToken,
        outcome: SearchOutcome,
    },
    Pointer {
        target: PointerTarget,
    },
    Hover {
        row: usize,
        entered: bool,
    },
}

/// A search the controller wants run. Nothing happens until `run` is called,
/// so hosts decide where and when the request executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: QueryToken,
    pub query: String,
}

impl SearchRequest {
    /// Execute against `backend` and wrap the answer as a resolution event.
    pub fn run(&self, backend: &dyn SearchBackend) -> WidgetEvent {
        WidgetEvent::SearchResolved {
            token: self.token,
            outcome: backend.search(&self.query),
        }
    }
}
