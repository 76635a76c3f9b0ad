use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::widget::controller::ControllerState;

/// One controller transition, written as a JSONL line.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub from: String,
    pub to: String,
    pub event: String,

    pub token: Option<u64>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, event: &str, from: &ControllerState) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            from: from.name().to_string(),
            to: from.name().to_string(),
            event: event.to_string(),
            token: None,
            detail: None,
        }
    }

    pub fn with_target(mut self, to: &ControllerState) -> Self {
        self.to = to.name().to_string();
        self
    }

    pub fn with_token(mut self, token: u64) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
