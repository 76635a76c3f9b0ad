use std::io;

/// Errors that stop the widget or its host bridge.
///
/// Search problems are not here: they are `SearchFailure`s and never leave the controller.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// The anchor field is missing; the widget disables itself
    #[error("anchor field '{field_id}' not found, autocomplete disabled")]
    NoAnchorField { field_id: String },

    /// Reading host events or writing commands failed
    #[error("host bridge I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// A bridge message could not be encoded or decoded
    #[error("host bridge protocol error ({context}): {source}")]
    Protocol {
        context: String,
        source: serde_json::Error,
    },
}
