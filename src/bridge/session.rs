use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;

use log::{debug, warn};

use crate::{
    bridge::protocol::{HostCommand, HostEvent, encode_command, parse_event},
    form::form_model::{FieldIds, FieldKey, HostForm},
    search::client::SearchBackend,
    trace::logger::TraceLogger,
    widget::{
        controller::AutocompleteController,
        error::WidgetError,
        event::{SearchRequest, WidgetEvent},
    },
};

/// Host form seen through the bridge: presence comes from `init`, writes
/// are queued and sent to the host as `set_field` commands.
#[derive(Debug)]
pub struct BridgeForm {
    ids: FieldIds,
    present: HashSet<String>,
    pending: Vec<HostCommand>,
}

impl BridgeForm {
    pub fn new(ids: FieldIds, present: &[String]) -> Self {
        BridgeForm {
            ids,
            present: present.iter().cloned().collect(),
            pending: Vec::new(),
        }
    }

    pub fn take_writes(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.pending)
    }
}

impl HostForm for BridgeForm {
    fn has_field(&self, key: FieldKey) -> bool {
        self.present.contains(self.ids.id(key))
    }

    fn write(&mut self, key: FieldKey, value: &str) {
        self.pending.push(HostCommand::SetField {
            id: self.ids.id(key).to_string(),
            value: value.to_string(),
        });
    }
}

/// What the loop should do after a host event.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionStep {
    Continue(Option<SearchRequest>),
    Stop,
}

/// One widget instance driven by host events. Single-threaded.
pub struct BridgeSession<W: Write> {
    controller: Option<AutocompleteController<BridgeForm>>,
    field_ids: FieldIds,
    trace_path: Option<PathBuf>,
    out: W,
}

impl<W: Write> BridgeSession<W> {
    pub fn new(field_ids: FieldIds, out: W) -> Self {
        BridgeSession {
            controller: None,
            field_ids,
            trace_path: None,
            out,
        }
    }

    pub fn with_trace(mut self, path: Option<PathBuf>) -> Self {
        self.trace_path = path;
        self
    }

    pub fn is_attached(&self) -> bool {
        self.controller.is_some()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn handle_host_event(&mut self, event: HostEvent) -> Result<SessionStep, WidgetError> {
        let widget_event = match event {
            HostEvent::Init { fields } => return self.init(&fields),
            HostEvent::Quit => return Ok(SessionStep::Stop),
            HostEvent::Input {
                value,
                anchor,
                scroll,
            } => WidgetEvent::Input {
                value,
                anchor,
                scroll,
            },
            HostEvent::Pointer { target } => WidgetEvent::Pointer { target },
            HostEvent::Hover { row, entered } => WidgetEvent::Hover { row, entered },
        };

        let Some(controller) = self.controller.as_mut() else {
            warn!("host event before init ignored");
            return Ok(SessionStep::Continue(None));
        };

        let request = controller.handle(widget_event);
        self.flush()?;
        Ok(SessionStep::Continue(request))
    }

    /// Feed a finished search back into the controller.
    pub fn handle_resolved(&mut self, event: WidgetEvent) -> Result<(), WidgetError> {
        if let Some(controller) = self.controller.as_mut() {
            controller.handle(event);
            self.flush()?;
        }
        Ok(())
    }

    fn init(&mut self, fields: &[String]) -> Result<SessionStep, WidgetError> {
        if self.controller.is_some() {
            warn!("duplicate init ignored");
            return Ok(SessionStep::Continue(None));
        }

        let form = BridgeForm::new(self.field_ids.clone(), fields);
        match AutocompleteController::attach(form) {
            Ok(controller) => {
                let controller = match &self.trace_path {
                    Some(path) => controller.with_tracer(TraceLogger::new(path)),
                    None => controller,
                };
                self.controller = Some(controller);
                self.send(&HostCommand::Ready)?;
                self.flush()?;
                Ok(SessionStep::Continue(None))
            }
            Err(WidgetError::NoAnchorField { .. }) => {
                let error = WidgetError::NoAnchorField {
                    field_id: self.field_ids.street.clone(),
                };
                warn!("{}", error);
                self.send(&HostCommand::Disabled {
                    reason: error.to_string(),
                })?;
                Ok(SessionStep::Stop)
            }
            Err(e) => Err(e),
        }
    }

    fn flush(&mut self) -> Result<(), WidgetError> {
        let Some(controller) = self.controller.as_mut() else {
            return Ok(());
        };

        let mut commands = controller.form_mut().take_writes();
        commands.extend(
            controller
                .panel_mut()
                .take_patches()
                .into_iter()
                .map(|patch| HostCommand::Surface { patch }),
        );

        for command in &commands {
            self.send(command)?;
        }
        Ok(())
    }

    fn send(&mut self, command: &HostCommand) -> Result<(), WidgetError> {
        let line = encode_command(command)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

enum LoopMessage {
    Line(String),
    ReadError(std::io::Error),
    Eof,
    Resolved(WidgetEvent),
}

/// Run the bridge until `quit`, a disabled widget, or end of input.
///
/// Host lines are read on a helper thread and searches run on worker
/// threads; everything is funnelled into this thread, which alone touches
/// the controller. On EOF, outstanding searches are drained before returning.
pub fn run_bridge<R, W>(
    input: R,
    session: &mut BridgeSession<W>,
    backend: Arc<dyn SearchBackend + Send + Sync>,
) -> Result<(), WidgetError>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (tx, rx) = mpsc::channel::<LoopMessage>();

    let reader_tx = tx.clone();
    thread::spawn(move || {
        for line in input.lines() {
            let message = match line {
                Ok(line) => LoopMessage::Line(line),
                Err(e) => LoopMessage::ReadError(e),
            };
            let failed = matches!(message, LoopMessage::ReadError(_));
            if reader_tx.send(message).is_err() || failed {
                return;
            }
        }
        let _ = reader_tx.send(LoopMessage::Eof);
    });

    let mut outstanding = 0usize;
    let mut eof = false;

    while let Ok(message) = rx.recv() {
        match message {
            LoopMessage::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let event = match parse_event(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("skipping host line: {}", e);
                        continue;
                    }
                };
                match session.handle_host_event(event)? {
                    SessionStep::Continue(Some(request)) => {
                        outstanding += 1;
                        spawn_search(request, Arc::clone(&backend), tx.clone());
                    }
                    SessionStep::Continue(None) => {}
                    SessionStep::Stop => break,
                }
            }
            LoopMessage::Resolved(event) => {
                outstanding = outstanding.saturating_sub(1);
                session.handle_resolved(event)?;
            }
            LoopMessage::ReadError(e) => return Err(e.into()),
            LoopMessage::Eof => eof = true,
        }

        if eof && outstanding == 0 {
            break;
        }
    }

    debug!("bridge loop finished");
    Ok(())
}

fn spawn_search(
    request: SearchRequest,
    backend: Arc<dyn SearchBackend + Send + Sync>,
    tx: mpsc::Sender<LoopMessage>,
) {
    thread::spawn(move || {
        let event = request.run(backend.as_ref());
        // The loop may already be gone after quit.
        let _ = tx.send(LoopMessage::Resolved(event));
    });
}
