use serde::{Deserialize, Serialize};

use crate::{
    panel::{
        geometry::{ElementGeometry, ScrollOffset},
        panel::SurfacePatch,
    },
    widget::{error::WidgetError, event::PointerTarget},
};

/// Event sent by the host page (one JSON line on stdin).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Must come first: ids of the form fields present on the page
    Init { fields: Vec<String> },
    Input {
        value: String,
        #[serde(default)]
        anchor: ElementGeometry,
        #[serde(default)]
        scroll: ScrollOffset,
    },
    Pointer { target: PointerTarget },
    Hover { row: usize, entered: bool },
    Quit,
}

/// Command sent back to the host page (one JSON line on stdout).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    Ready,
    Disabled { reason: String },
    Surface { patch: SurfacePatch },
    SetField { id: String, value: String },
}

pub fn parse_event(line: &str) -> Result<HostEvent, WidgetError> {
    serde_json::from_str(line.trim()).map_err(|source| WidgetError::Protocol {
        context: "host event".into(),
        source,
    })
}

pub fn encode_command(command: &HostCommand) -> Result<String, WidgetError> {
    serde_json::to_string(command).map_err(|source| WidgetError::Protocol {
        context: "host command".into(),
        source,
    })
}
