use serde::Serialize;

use crate::{
    address::markup::escape_html,
    panel::geometry::{ElementGeometry, PanelPosition, ScrollOffset, position_below},
};

pub const SURFACE_STYLE: &str = "position:absolute; background:white; border:2px solid #00bcd4; \
z-index:999999; box-shadow:0 10px 30px rgba(0,0,0,0.3); display:none; max-height:300px; \
overflow-y:auto; font-family:Roboto, sans-serif; font-size:13px; color:#333;";
pub const ROW_STYLE: &str = "padding:10px; cursor:pointer; border-bottom:1px solid #eee;";
pub const HOVER_BACKGROUND: &str = "#e0f7fa";
pub const IDLE_BACKGROUND: &str = "white";

/// One suggestion row as shown on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    pub title: String,
    pub subtitle: String,
}

/// A mutation the host must apply to the floating surface.
///
/// The panel is the only producer of these; hosts apply them in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SurfacePatch {
    /// Create the surface once and append it to the document body
    Attach { style: String },
    Move { position: PanelPosition },
    /// Replace the surface's inner markup
    Replace { html: String },
    Show,
    Hide,
    Highlight { row: usize, background: String },
}

/// Snapshot of the panel for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelState {
    pub visible: bool,
    pub position: Option<PanelPosition>,
    pub rows: Vec<RenderedRow>,
    pub hovered: Option<usize>,
}

/// The single floating suggestion surface, created once per widget and reused.
#[derive(Debug)]
pub struct SuggestionPanel {
    visible: bool,
    position: Option<PanelPosition>,
    rows: Vec<RenderedRow>,
    hovered: Option<usize>,
    patches: Vec<SurfacePatch>,
}

impl SuggestionPanel {
    /// Create the surface. Emits the one and only `Attach` patch.
    pub fn attach() -> Self {
        SuggestionPanel {
            visible: false,
            position: None,
            rows: Vec::new(),
            hovered: None,
            patches: vec![SurfacePatch::Attach {
                style: SURFACE_STYLE.to_string(),
            }],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn state(&self) -> PanelState {
        PanelState {
            visible: self.visible,
            position: self.position,
            rows: self.rows.clone(),
            hovered: self.hovered,
        }
    }

    /// Anchor the surface below `anchor`. Call before every open.
    pub fn position(&mut self, anchor: &ElementGeometry, scroll: &ScrollOffset) {
        let position = position_below(anchor, scroll);
        self.position = Some(position);
        self.patches.push(SurfacePatch::Move { position });
    }

    /// Replace the rows and show the surface.
    pub fn render(&mut self, rows: Vec<RenderedRow>) {
        self.rows = rows;
        self.hovered = None;
        self.patches.push(SurfacePatch::Replace {
            html: self.to_html(),
        });
        if !self.visible {
            self.visible = true;
            self.patches.push(SurfacePatch::Show);
        }
    }

    /// Hide the surface. Rows are kept until the next render.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.hovered = None;
        self.patches.push(SurfacePatch::Hide);
    }

    pub fn pointer_enter(&mut self, row: usize) {
        if !self.visible || row >= self.rows.len() {
            return;
        }
        if let Some(previous) = self.hovered.filter(|&h| h != row) {
            self.highlight(previous, IDLE_BACKGROUND);
        }
        self.hovered = Some(row);
        self.highlight(row, HOVER_BACKGROUND);
    }

    pub fn pointer_leave(&mut self, row: usize) {
        if self.hovered != Some(row) {
            return;
        }
        self.hovered = None;
        self.highlight(row, IDLE_BACKGROUND);
    }

    /// Index of the activated row, if it is currently on screen.
    pub fn activate(&self, row: usize) -> Option<usize> {
        (self.visible && row < self.rows.len()).then_some(row)
    }

    /// Drain the surface mutations produced since the last call.
    pub fn take_patches(&mut self) -> Vec<SurfacePatch> {
        std::mem::take(&mut self.patches)
    }

    /// Inner markup of the surface: one row per suggestion, text escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            let background = if self.hovered == Some(i) {
                HOVER_BACKGROUND
            } else {
                IDLE_BACKGROUND
            };
            out.push_str(&format!(
                "<div data-row=\"{}\" style=\"{} background-color:{};\"><strong>{}</strong><br><span style=\"color:#666\">{}</span></div>",
                i,
                ROW_STYLE,
                background,
                escape_html(&row.title),
                escape_html(&row.subtitle)
            ));
        }
        out
    }

    fn highlight(&mut self, row: usize, background: &str) {
        self.patches.push(SurfacePatch::Highlight {
            row,
            background: background.to_string(),
        });
    }
}
