use log::{debug, info, warn};

use crate::{
    address::label_parser::parse_label,
    form::form_model::{FieldKey, FormBindings, HostForm},
    panel::{
        geometry::{ElementGeometry, ScrollOffset},
        panel::{RenderedRow, SuggestionPanel},
    },
    search::{
        client::SearchOutcome,
        formatter::{FormattedResult, format_result},
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
    widget::{
        error::WidgetError,
        event::{PointerTarget, QueryToken, SearchRequest, WidgetEvent},
    },
};

/// Shorter input closes the panel and issues no search.
pub const MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerState {
    Idle,
    /// Waiting for `token`. `displayed` is the batch still on screen from an
    /// earlier query (empty if the panel is hidden); its rows stay clickable.
    Querying {
        token: QueryToken,
        displayed: Vec<FormattedResult>,
    },
    Showing {
        token: QueryToken,
        rows: Vec<FormattedResult>,
    },
}

impl ControllerState {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerState::Idle => "Idle",
            ControllerState::Querying { .. } => "Querying",
            ControllerState::Showing { .. } => "Showing",
        }
    }

    pub fn token(&self) -> Option<QueryToken> {
        match self {
            ControllerState::Idle => None,
            ControllerState::Querying { token, .. } | ControllerState::Showing { token, .. } => {
                Some(*token)
            }
        }
    }

    /// The batch whose rows are currently clickable.
    fn live_rows(&self) -> &[FormattedResult] {
        match self {
            ControllerState::Idle => &[],
            ControllerState::Querying { displayed, .. } => displayed,
            ControllerState::Showing { rows, .. } => rows,
        }
    }
}

/// Drives one autocomplete widget bound to a host form.
///
/// All transitions go through the `on_*` methods (or `handle`), which are
/// meant to be called from a single event-loop thread.
pub struct AutocompleteController<F: HostForm> {
    form: F,
    bindings: FormBindings,
    panel: SuggestionPanel,
    state: ControllerState,
    next_token: u64,
    step: u64,
    tracer: Option<TraceLogger>,
}

impl<F: HostForm> AutocompleteController<F> {
    /// Bind to `form`. Fails when the street (anchor) field is missing.
    pub fn attach(form: F) -> Result<Self, WidgetError> {
        let Some(bindings) = FormBindings::resolve(&form) else {
            warn!("anchor field '{}' missing, autocomplete disabled", FieldKey::Street.as_str());
            return Err(WidgetError::NoAnchorField {
                field_id: FieldKey::Street.as_str().to_string(),
            });
        };

        debug!("autocomplete attached, bindings: {:?}", bindings);
        Ok(AutocompleteController {
            form,
            bindings,
            panel: SuggestionPanel::attach(),
            state: ControllerState::Idle,
            next_token: 0,
            step: 0,
            tracer: None,
        })
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn bindings(&self) -> FormBindings {
        self.bindings
    }

    pub fn panel(&self) -> &SuggestionPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SuggestionPanel {
        &mut self.panel
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn into_form(self) -> F {
        self.form
    }

    /// Dispatch any event. Returns the search to run, if one was issued.
    pub fn handle(&mut self, event: WidgetEvent) -> Option<SearchRequest> {
        match event {
            WidgetEvent::Input {
                value,
                anchor,
                scroll,
            } => self.on_input(&value, &anchor, &scroll),
            WidgetEvent::SearchResolved { token, outcome } => {
                self.on_search_resolved(token, outcome);
                None
            }
            WidgetEvent::Pointer { target } => {
                self.on_pointer(target);
                None
            }
            WidgetEvent::Hover { row, entered } => {
                self.on_hover(row, entered);
                None
            }
        }
    }

    pub fn on_input(
        &mut self,
        value: &str,
        anchor: &ElementGeometry,
        scroll: &ScrollOffset,
    ) -> Option<SearchRequest> {
        if value.chars().count() < MIN_QUERY_LEN {
            self.panel.close();
            self.transition("input", ControllerState::Idle, None, Some("below minimum length"));
            return None;
        }

        self.panel.position(anchor, scroll);
        self.next_token += 1;
        let token = QueryToken(self.next_token);

        let displayed = if self.panel.is_visible() {
            self.state.live_rows().to_vec()
        } else {
            Vec::new()
        };

        self.transition(
            "input",
            ControllerState::Querying { token, displayed },
            Some(token),
            Some(value),
        );

        Some(SearchRequest {
            token,
            query: value.to_string(),
        })
    }

    pub fn on_search_resolved(&mut self, token: QueryToken, outcome: SearchOutcome) {
        if !matches!(self.state, ControllerState::Querying { token: current, .. } if current == token)
        {
            debug!("discarding stale response for query {}", token.0);
            let current = self.state.clone();
            self.record("search_resolved", &current, Some(token), Some("stale"));
            return;
        }

        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                warn!("address search failed: {}", e);
                self.panel.close();
                self.transition(
                    "search_resolved",
                    ControllerState::Idle,
                    Some(token),
                    Some(format!("failure: {}", e)),
                );
                return;
            }
        };

        if results.is_empty() {
            debug!("no matches for query {}", token.0);
            self.panel.close();
            self.transition("search_resolved", ControllerState::Idle, Some(token), Some("empty"));
            return;
        }

        let rows: Vec<FormattedResult> = results.iter().map(format_result).collect();
        self.panel.render(
            rows.iter()
                .map(|r| RenderedRow {
                    title: r.title.clone(),
                    subtitle: r.subtitle.clone(),
                })
                .collect(),
        );

        let count = rows.len();
        self.transition(
            "search_resolved",
            ControllerState::Showing { token, rows },
            Some(token),
            Some(format!("{} rows", count)),
        );
    }

    pub fn on_pointer(&mut self, target: PointerTarget) {
        match target {
            PointerTarget::Row(row) => self.commit(row),
            PointerTarget::Anchor | PointerTarget::Panel => {}
            PointerTarget::Outside => {
                if matches!(self.state, ControllerState::Idle) && !self.panel.is_visible() {
                    return;
                }
                self.panel.close();
                self.transition("outside_click", ControllerState::Idle, None, None::<&str>);
            }
        }
    }

    pub fn on_hover(&mut self, row: usize, entered: bool) {
        if entered {
            self.panel.pointer_enter(row);
        } else {
            self.panel.pointer_leave(row);
        }
    }

    /// Write the selected row into the host form and close the panel.
    ///
    /// Ignored unless `row` is on screen.
    pub fn commit(&mut self, row: usize) {
        let Some(index) = self.panel.activate(row) else {
            return;
        };
        let Some(selected) = self.state.live_rows().get(index).cloned() else {
            return;
        };

        let parsed = parse_label(&selected.title);
        self.form.write(FieldKey::Street, &parsed.street);
        if parsed.is_structured() {
            self.write_if_bound(FieldKey::PostalCode, &parsed.postal_code);
            self.write_if_bound(FieldKey::Locality, &parsed.locality);
        }

        if let Some(building_id) = &selected.identifiers.building_id {
            self.write_if_bound(FieldKey::BuildingId, building_id);
        }
        let region = selected.identifiers.region_code.to_uppercase();
        if !region.is_empty() {
            self.write_if_bound(FieldKey::RegionCode, &region);
        }

        info!("selected '{}'", selected.title);
        self.panel.close();
        self.transition("commit", ControllerState::Idle, None, Some(&selected.title));
    }

    fn write_if_bound(&mut self, key: FieldKey, value: &str) {
        if self.bindings.is_bound(key) {
            self.form.write(key, value);
        }
    }

    fn transition(
        &mut self,
        event: &str,
        next: ControllerState,
        token: Option<QueryToken>,
        detail: Option<impl ToString>,
    ) {
        let previous = std::mem::replace(&mut self.state, next);
        debug!("{}: {} -> {}", event, previous.name(), self.state.name());
        self.record(event, &previous, token, detail);
    }

    fn record(
        &mut self,
        event: &str,
        previous: &ControllerState,
        token: Option<QueryToken>,
        detail: Option<impl ToString>,
    ) {
        if let Some(tracer) = &self.tracer {
            let mut trace = TraceEvent::now(self.step, event, previous).with_target(&self.state);
            if let Some(token) = token {
                trace = trace.with_token(token.0);
            }
            if let Some(detail) = detail {
                trace = trace.with_detail(detail);
            }
            tracer.log(&trace);
        }
        self.step += 1;
    }
}
