//! Wire types for the gateway's HTTP surface.

use serde::{Deserialize, Serialize};

/// A person record as submitted by clients. Fields are projected leniently;
/// a missing field persists as SQL NULL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            dob: Some(dob.into()),
        }
    }
}

/// URL parameters accepted by `GET /query`.
#[derive(Debug, Deserialize)]
pub struct StatementParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub message: String,
    #[serde(rename = "insertedRows")]
    pub inserted_rows: u64,
}
