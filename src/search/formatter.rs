use crate::{address::markup::strip_markup, search::search_model::SearchResult};

/// Building and region identifiers pulled out of a result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedIdentifiers {
    pub building_id: Option<String>,
    /// Raw region code as sent by the service; empty when absent.
    pub region_code: String,
}

/// Display fields for one suggestion row, plus what the commit needs later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResult {
    /// Label with markup stripped. Also the text the label parser runs on.
    pub title: String,
    pub subtitle: String,
    pub identifiers: ExtractedIdentifiers,
}

/// Turn one raw result into its display form. Does not touch `item`.
pub fn format_result(item: &SearchResult) -> FormattedResult {
    let identifiers = extract_identifiers(item);
    let subtitle = format!(
        "EGID: {} | Kt: {}",
        identifiers.building_id.as_deref().unwrap_or("?"),
        identifiers.region_code
    );

    FormattedResult {
        title: strip_markup(&item.attrs.label),
        subtitle,
        identifiers,
    }
}

/// `attrs.egid`, else the id prefix of `attrs.featureId`, else of the item's own
/// `featureId`. A present `attrs.featureId` decides even when its prefix is
/// empty. Region: `attrs.kantone`, else `attrs.kanton`.
pub fn extract_identifiers(item: &SearchResult) -> ExtractedIdentifiers {
    let attrs = &item.attrs;

    let building_id = match (&attrs.egid, &attrs.feature_id, &item.feature_id) {
        (Some(egid), _, _) => Some(egid.clone()),
        (None, Some(feature_id), _) => feature_prefix(feature_id),
        (None, None, Some(feature_id)) => feature_prefix(feature_id),
        (None, None, None) => None,
    };

    let region_code = attrs
        .kantone
        .as_deref()
        .or(attrs.kanton.as_deref())
        .unwrap_or_default()
        .to_string();

    ExtractedIdentifiers {
        building_id,
        region_code,
    }
}

// "700123_0" -> "700123"; "_0" has no id
fn feature_prefix(feature_id: &str) -> Option<String> {
    feature_id
        .split('_')
        .next()
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_string)
}
