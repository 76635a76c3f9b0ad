use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level body returned by the SearchServer endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchResult>,
}

/// One raw result record. Lives only as long as its batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "featureId", default, deserialize_with = "loose_string")]
    pub feature_id: Option<String>,
    #[serde(default)]
    pub attrs: ResultAttrs,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResultAttrs {
    /// HTML-bearing display label, e.g. `Bahnhofstrasse 1 <b>8001 Zürich</b>`.
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub egid: Option<String>,
    #[serde(rename = "featureId", default, deserialize_with = "loose_string")]
    pub feature_id: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub kantone: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub kanton: Option<String>,
}

impl SearchResult {
    /// Convenience constructor used by fixtures and the CLI.
    pub fn with_label(label: &str) -> Self {
        SearchResult {
            feature_id: None,
            attrs: ResultAttrs {
                label: label.to_string(),
                ..ResultAttrs::default()
            },
        }
    }
}

/// Parse a SearchServer body. Absent or `null` results mean "no matches".
pub fn parse_search_response(body: &str) -> Result<SearchResponse, serde_json::Error> {
    serde_json::from_str(body)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SearchResult>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<SearchResult>>::deserialize(deserializer)?.unwrap_or_default())
}

// The service sends ids as strings or bare numbers; empty strings count as absent.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
