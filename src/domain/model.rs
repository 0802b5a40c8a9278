use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One repository exactly as the API returned it. No field is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.get("full_name").and_then(Value::as_str)
    }
}

/// Typed view over the handful of fields callers usually want.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoSummary {
    pub full_name: String,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub fork: bool,
    pub stargazers_count: u64,
    pub created_at: Option<String>,
}

impl RepoSummary {
    /// Returns `None` when the record has no string `full_name`.
    pub fn from_record(record: &Record) -> Option<Self> {
        let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            full_name: record.full_name()?.to_string(),
            name: text("name"),
            html_url: text("html_url"),
            description: text("description"),
            language: text("language"),
            fork: record.get("fork").and_then(Value::as_bool).unwrap_or(false),
            stargazers_count: record
                .get("stargazers_count")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            created_at: text("created_at"),
        })
    }
}
