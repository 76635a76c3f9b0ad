use std::time::Duration;

use log::debug;
use reqwest::Url;

use crate::search::{
    error::SearchFailure,
    search_model::{SearchResult, parse_search_response},
};

pub const DEFAULT_ENDPOINT: &str = "https://api3.geo.admin.ch/rest/services/api/SearchServer";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Fixed cap on suggestions per query.
pub const RESULT_LIMIT: usize = 10;

/// Result of one lookup. `Ok(vec![])` (no matches) stays distinct from `Err`.
pub type SearchOutcome = Result<Vec<SearchResult>, SearchFailure>;

/// Anything that can answer an address query.
///
/// Implementations must not panic; every problem becomes a `SearchFailure`.
pub trait SearchBackend {
    fn search(&self, query: &str) -> SearchOutcome;
}

/// Blocking client for the geo.admin.ch SearchServer.
pub struct GeoAdminClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl GeoAdminClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SearchFailure> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SearchFailure::ClientBuild { source })?;

        Ok(GeoAdminClient {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Client for the public endpoint with the default timeout.
    pub fn with_defaults() -> Result<Self, SearchFailure> {
        Self::new(DEFAULT_ENDPOINT, Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }

    /// Build the request URL: URL-encoded text, address locations only.
    pub fn search_url(&self, query: &str, limit: usize) -> Result<Url, SearchFailure> {
        if query.is_empty() {
            return Err(SearchFailure::invalid_query("query must not be empty"));
        }

        let limit = limit.to_string();
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("searchText", query),
                ("type", "locations"),
                ("origins", "address"),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| SearchFailure::invalid_query(format!("bad endpoint '{}': {}", self.endpoint, e)))
    }

    fn fetch(&self, query: &str, limit: usize) -> SearchOutcome {
        let url = self.search_url(query, limit)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchFailure::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let parsed = parse_search_response(&body)?;
        debug!("'{}' -> {} results", query, parsed.results.len());
        Ok(parsed.results)
    }

    /// Look up the building id (EGID) of a complete address.
    ///
    /// Queries `"<street> <postal code> <locality>"` with a limit of one and
    /// returns the first hit's `attrs.egid`, if any.
    pub fn resolve_building_id(
        &self,
        street: &str,
        postal_code: &str,
        locality: &str,
    ) -> Result<Option<String>, SearchFailure> {
        let query = format!("{} {} {}", street, postal_code, locality);
        let results = self.fetch(query.trim(), 1)?;
        Ok(results.into_iter().next().and_then(|item| item.attrs.egid))
    }
}

impl SearchBackend for GeoAdminClient {
    fn search(&self, query: &str) -> SearchOutcome {
        self.fetch(query, RESULT_LIMIT)
    }
}

/// Fixed-answer backend for tests and offline runs. Records every query.
#[derive(Debug, Default)]
pub struct StaticBackend {
    results: Vec<SearchResult>,
    fail: bool,
    queries: std::sync::Mutex<Vec<String>>,
}

impl StaticBackend {
    pub fn new(results: Vec<SearchResult>) -> Self {
        StaticBackend {
            results,
            ..StaticBackend::default()
        }
    }

    /// A backend whose every lookup fails with HTTP 503.
    pub fn failing() -> Self {
        StaticBackend {
            fail: true,
            ..StaticBackend::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        match self.queries.lock() {
            Ok(q) => q.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SearchBackend for StaticBackend {
    fn search(&self, query: &str) -> SearchOutcome {
        match self.queries.lock() {
            Ok(mut q) => q.push(query.to_string()),
            Err(poisoned) => poisoned.into_inner().push(query.to_string()),
        }

        if self.fail {
            return Err(SearchFailure::HttpStatus { status: 503 });
        }
        Ok(self.results.clone())
    }
}
