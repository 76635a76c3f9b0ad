use geoadmin_autocomplete::search::search_model::{ResultAttrs, SearchResult};

/// A result carrying a label, an EGID and a `kanton`.
pub fn result(label: &str, egid: Option<&str>, kanton: Option<&str>) -> SearchResult {
    SearchResult {
        feature_id: None,
        attrs: ResultAttrs {
            label: label.to_string(),
            egid: egid.map(str::to_string),
            kanton: kanton.map(str::to_string),
            ..ResultAttrs::default()
        },
    }
}

pub fn bahnhofstrasse() -> SearchResult {
    result("Bahnhofstrasse 1, 8000 Zürich", Some("700123"), Some("ZH"))
}

pub fn seestrasse() -> SearchResult {
    result("Seestrasse 5 <b>8002 Zürich</b>", Some("190001"), Some("zh"))
}

/// A SearchServer body with one Bahnhofstrasse hit, as the live service shapes it.
pub const BAHNHOFSTRASSE_BODY: &str = r#"{
  "results": [
    {
      "id": 1,
      "weight": 100,
      "featureId": "700123_0",
      "attrs": {
        "label": "Bahnhofstrasse 1 <b>8000 Zürich</b>",
        "featureId": "700123_0",
        "egid": "700123",
        "kanton": "ZH"
      }
    }
  ]
}"#;
