use serde::{Deserialize, Serialize};

/// Viewport-relative bounding box of a host element, as `getBoundingClientRect` reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementGeometry {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Page scroll offset at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Absolute (document) coordinates of the floating surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

/// Directly below the anchor's bottom edge, left-aligned, same width.
pub fn position_below(anchor: &ElementGeometry, scroll: &ScrollOffset) -> PanelPosition {
    PanelPosition {
        top: anchor.bottom() + scroll.y,
        left: anchor.left + scroll.x,
        width: anchor.width,
    }
}
