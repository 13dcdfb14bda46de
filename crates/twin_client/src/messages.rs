//! Wire types for the Digital Twin HTTP API. Client ↔ server JSON.

use serde::{Deserialize, Serialize};

/// Answer text used when the server response carries no answer field.
pub const NO_ANSWER_FALLBACK: &str = "No answer provided";
/// Status used when the server response carries no status field.
pub const DEFAULT_STATUS: &str = "success";

/// Client → server: query request body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
    pub source_type: &'a str,
}

impl<'a> QueryRequest<'a> {
    pub fn new(question: &'a str, source_type: &'a str) -> Self {
        Self {
            question,
            source_type,
        }
    }
}

/// Server → client: query response body. Either `final_answer` or `answer`
/// carries the text; absent and empty fields fall through alike.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponseBody {
    #[serde(default)]
    pub final_answer: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl QueryResponseBody {
    /// Answer text: `final_answer`, then `answer`, then [`NO_ANSWER_FALLBACK`].
    pub fn resolve_answer(&self) -> String {
        non_empty(self.final_answer.as_deref())
            .or_else(|| non_empty(self.answer.as_deref()))
            .unwrap_or(NO_ANSWER_FALLBACK)
            .to_string()
    }

    /// The `status` field, or [`DEFAULT_STATUS`] when absent or empty.
    pub fn resolve_status(&self) -> String {
        non_empty(self.status.as_deref())
            .unwrap_or(DEFAULT_STATUS)
            .to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

/// Server → client: error body carried by HTTP 500 responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
