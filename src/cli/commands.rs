use std::io::{self, BufReader};
use std::sync::Arc;

use crate::bridge::session::{BridgeSession, run_bridge};
use crate::cli::config::{AppConfig, resolve_endpoint};
use crate::form::form_model::{FieldKey, MemoryForm};
use crate::panel::geometry::{ElementGeometry, ScrollOffset};
use crate::search::client::{GeoAdminClient, SearchBackend};
use crate::search::error::SearchFailure;
use crate::search::formatter::{FormattedResult, format_result};
use crate::trace::logger::TraceLogger;
use crate::widget::controller::{AutocompleteController, MIN_QUERY_LEN};
use crate::widget::error::WidgetError;

fn build_client(
    cli_endpoint: Option<&str>,
    config: &AppConfig,
) -> Result<GeoAdminClient, SearchFailure> {
    let endpoint = resolve_endpoint(cli_endpoint, config);
    GeoAdminClient::new(&endpoint, config.search.timeout())
}

// ============================================================================
// lookup subcommand
// ============================================================================

/// Search once and format every hit.
pub fn run_lookup(
    query: &str,
    backend: &dyn SearchBackend,
) -> Result<Vec<FormattedResult>, SearchFailure> {
    let results = backend.search(query)?;
    Ok(results.iter().map(format_result).collect())
}

/// Format rows for terminal output:
///
/// ```text
/// [0] Bahnhofstrasse 1 8001 Zürich
///     EGID: 700123 | Kt: ZH
/// ```
pub fn format_rows(rows: &[FormattedResult]) -> String {
    if rows.is_empty() {
        return "No suggestions.\n".to_string();
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n    {}\n", i, row.title, row.subtitle));
    }
    out
}

pub fn cmd_lookup(
    query: &str,
    cli_endpoint: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if query.is_empty() {
        return Err("query must not be empty".into());
    }
    let client = build_client(cli_endpoint, config)?;
    let rows = run_lookup(query, &client)?;
    print!("{}", format_rows(&rows));
    Ok(())
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Outcome of a simulated type-and-select session.
#[derive(Debug, PartialEq, Eq)]
pub enum FillOutcome {
    TooShort,
    NoSuggestions,
    NoSuchRow { available: usize },
    Filled(MemoryForm),
}

/// Type `query` into a complete in-memory form and select row `pick`.
pub fn run_fill(
    query: &str,
    pick: usize,
    backend: &dyn SearchBackend,
) -> Result<FillOutcome, WidgetError> {
    let mut controller = AutocompleteController::attach(MemoryForm::complete())?;
    Ok(run_fill_with(&mut controller, query, pick, backend))
}

fn run_fill_with(
    controller: &mut AutocompleteController<MemoryForm>,
    query: &str,
    pick: usize,
    backend: &dyn SearchBackend,
) -> FillOutcome {
    let Some(request) = controller.on_input(
        query,
        &ElementGeometry::default(),
        &ScrollOffset::default(),
    ) else {
        return FillOutcome::TooShort;
    };

    controller.handle(request.run(backend));
    if !controller.panel().is_visible() {
        return FillOutcome::NoSuggestions;
    }

    let available = controller.panel().rows().len();
    if pick >= available {
        return FillOutcome::NoSuchRow { available };
    }

    controller.commit(pick);
    FillOutcome::Filled(controller.form().clone())
}

pub fn format_form(form: &MemoryForm) -> String {
    let mut out = String::new();
    for key in FieldKey::ALL {
        out.push_str(&format!("{:<12} {}\n", format!("{}:", key.as_str()), form.value(key)));
    }
    out
}

pub fn cmd_fill(
    query: &str,
    pick: usize,
    cli_endpoint: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(cli_endpoint, config)?;
    let mut controller = AutocompleteController::attach(MemoryForm::complete())?;
    if let Some(path) = &config.trace.path {
        controller = controller.with_tracer(TraceLogger::new(path));
    }

    match run_fill_with(&mut controller, query, pick, &client) {
        FillOutcome::TooShort => {
            println!("Query must be at least {} characters.", MIN_QUERY_LEN)
        }
        FillOutcome::NoSuggestions => println!("No suggestions."),
        FillOutcome::NoSuchRow { available } => {
            println!("No row {} ({} suggestions).", pick, available)
        }
        FillOutcome::Filled(form) => print!("{}", format_form(&form)),
    }
    Ok(())
}

// ============================================================================
// egid subcommand
// ============================================================================

pub fn cmd_egid(
    street: &str,
    postal_code: &str,
    locality: &str,
    cli_endpoint: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(cli_endpoint, config)?;
    match client.resolve_building_id(street, postal_code, locality)? {
        Some(egid) => println!("{}", egid),
        None => println!("not found"),
    }
    Ok(())
}

// ============================================================================
// bridge subcommand
// ============================================================================

pub fn cmd_bridge(
    cli_endpoint: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(cli_endpoint, config)?;
    let mut session = BridgeSession::new(config.fields.clone(), io::stdout())
        .with_trace(config.trace.path.clone());

    run_bridge(BufReader::new(io::stdin()), &mut session, Arc::new(client))?;
    Ok(())
}
