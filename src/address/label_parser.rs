use std::sync::LazyLock;

use regex::Regex;

// <street>[,| ] <4-digit postal code> <locality>
static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*[,\s]\s*(\d{4})\s+(.*)$").unwrap());

/// Address fragments split out of a plain-text result label.
///
/// Empty `postal_code` / `locality` mean the label did not follow the
/// `<street>, <postal code> <locality>` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street: String,
    pub postal_code: String,
    pub locality: String,
}

impl ParsedAddress {
    /// True when the label matched and postal code / locality were found.
    pub fn is_structured(&self) -> bool {
        !self.postal_code.is_empty()
    }
}

/// Split a plain-text label into street, postal code and locality.
///
/// Never fails. A label that does not match comes back whole as `street`.
pub fn parse_label(label: &str) -> ParsedAddress {
    let Some(caps) = LABEL.captures(label) else {
        return ParsedAddress {
            street: label.to_string(),
            ..ParsedAddress::default()
        };
    };

    let street = caps.get(1).map_or("", |m| m.as_str());
    let street = street.strip_suffix(',').unwrap_or(street).trim();

    ParsedAddress {
        street: street.to_string(),
        postal_code: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
        locality: caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
    }
}
