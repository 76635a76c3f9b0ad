use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::Mutex,
};

use log::warn;

use crate::trace::trace::TraceEvent;

/// Appends controller transitions to a JSONL file.
///
/// Never fails the widget: every I/O problem is logged and the event dropped.
#[derive(Debug)]
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                warn!("could not open trace file '{}': {}", path.display(), e);
                Self { file: None }
            }
        }
    }

    /// Write one event as a single JSON line.
    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };
        let Ok(mut file) = file.lock() else {
            warn!("trace file lock poisoned, step {} dropped", event.step);
            return;
        };

        let written = serde_json::to_writer(&mut *file, event)
            .map_err(io::Error::from)
            .and_then(|()| file.write_all(b"\n"));
        if let Err(e) = written {
            warn!("trace step {} not written: {}", event.step, e);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }
}
