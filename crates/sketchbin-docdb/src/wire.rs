//! JSON request and response bodies, camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitRequest {
    #[serde(default)]
    pub writes: Vec<Write>,
}

/// One entry of `writes`. Only `update` writes are understood.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Write {
    #[serde(default)]
    pub update: Option<DocumentUpdate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    #[serde(default)]
    pub name: Option<String>,
    /// Stored verbatim; an explicit `null` stays `null`. Absent means `{}`.
    #[serde(default = "empty_object")]
    pub fields: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl Default for DocumentUpdate {
    fn default() -> Self {
        Self {
            name: None,
            fields: empty_object(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub write_results: Vec<WriteResult>,
    pub commit_time: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub update_time: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGetRequest {
    #[serde(default)]
    pub documents: Vec<String>,
}

/// One element of a batch-get response: exactly one of `found` / `missing`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<FoundDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<String>,
    pub read_time: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundDocument {
    pub name: String,
    pub fields: Value,
    pub create_time: String,
    pub update_time: String,
}
