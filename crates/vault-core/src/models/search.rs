use serde::{Deserialize, Serialize};

/// Filters for `/search`. Unset or empty fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SearchParams {
    pub filename: Option<String>,
    pub tags: Option<String>,
    pub mime_type: Option<String>,
    pub min_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl SearchParams {
    /// Defined, non-empty fields as key/value pairs in wire order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("filename", &self.filename),
            ("tags", &self.tags),
            ("mime_type", &self.mime_type),
        ];
        let dates = [("start_date", &self.start_date), ("end_date", &self.end_date)];

        let mut pairs = Vec::new();
        for (key, value) in text {
            push_text(&mut pairs, key, value);
        }
        if let Some(min) = self.min_size_bytes {
            pairs.push(("min_size_bytes", min.to_string()));
        }
        if let Some(max) = self.max_size_bytes {
            pairs.push(("max_size_bytes", max.to_string()));
        }
        for (key, value) in dates {
            push_text(&mut pairs, key, value);
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs
    }

    /// Percent-encoded query string without the leading `?`
    pub fn query_string(&self) -> String {
        self.to_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            pairs.push((key, value.clone()));
        }
    }
}
