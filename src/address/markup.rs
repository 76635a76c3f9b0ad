use std::sync::LazyLock;

use regex::Regex;

// `>` is optional: an unterminated `<` swallows the rest of the label.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Remove every angle-bracket delimited span from a result label.
///
/// Stripping is idempotent: the output never contains a `<`, so a second
/// pass returns it unchanged.
pub fn strip_markup(label: &str) -> String {
    TAG.replace_all(label, "").into_owned()
}

/// Escape HTML special characters before text goes back into the surface.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
