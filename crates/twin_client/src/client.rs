//! HTTP client for the Digital Twin Q&A API: health probe and question query.

use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::messages::{ErrorBody, QueryRequest, QueryResponseBody};

/// Path of the health endpoint, relative to the base URL.
pub const HEALTH_PATH: &str = "/health";
/// Path of the query endpoint, relative to the base URL.
pub const QUERY_PATH: &str = "/api/twin/query";
/// Source type sent when the caller does not pick one.
pub const DEFAULT_SOURCE_TYPE: &str = "public";

/// Last-known reachability of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Unknown,
    Healthy,
    Error,
}

impl HealthStatus {
    /// True only for [`HealthStatus::Healthy`].
    pub fn is_healthy(self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected query input: the question was empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidQuestion;

impl std::fmt::Display for InvalidQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("question must be a non-empty string")
    }
}

impl std::error::Error for InvalidQuestion {}

/// Outcome of one query. `error` is present iff `success` is false; a failed
/// query still carries a user-facing `answer` describing the problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub success: bool,
    pub answer: String,
    pub status: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub error: Option<String>,
}

impl QueryOutcome {
    fn answered(question: &str, body: &QueryResponseBody) -> Self {
        Self {
            success: true,
            answer: body.resolve_answer(),
            status: body.resolve_status(),
            question: question.to_string(),
            error: None,
        }
    }

    fn failed(question: &str, message: String) -> Self {
        Self {
            success: false,
            answer: format!("Sorry, I encountered an error: {}", message),
            status: "error".to_string(),
            question: question.to_string(),
            error: Some(message),
        }
    }
}

/// Client for one Digital Twin deployment. Holds the resolved base URL and
/// the health status recorded by [`TwinClient::check_health`].
pub struct TwinClient {
    base_url: String,
    http: reqwest::Client,
    health: HealthStatus,
}

impl TwinClient {
    /// Build a client for `base_url`. Trailing slashes are trimmed so path
    /// concatenation stays clean. No request timeout is set; calls run until
    /// the server answers or the transport fails.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "digital twin client initialized");
        Self {
            base_url,
            http: reqwest::Client::new(),
            health: HealthStatus::Unknown,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Health recorded by the most recent [`TwinClient::check_health`].
    pub fn health(&self) -> HealthStatus {
        self.health
    }

    /// Probe `GET /health`. Any 2xx status means healthy; a non-2xx status
    /// or transport failure means error. Never fails; the result is recorded
    /// on the client and returned.
    pub async fn check_health(&mut self) -> HealthStatus {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        self.health = match self
            .http
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                debug!(status = %response.status(), "digital twin API is healthy");
                HealthStatus::Healthy
            }
            Ok(response) => {
                warn!(status = %response.status(), "digital twin API health check failed");
                HealthStatus::Error
            }
            Err(e) => {
                error!(error = %e, "digital twin API health check error");
                HealthStatus::Error
            }
        };
        self.health
    }

    /// Ask `question` as the [`DEFAULT_SOURCE_TYPE`] audience.
    pub async fn ask(&self, question: &str) -> Result<QueryOutcome, InvalidQuestion> {
        self.query(question, DEFAULT_SOURCE_TYPE).await
    }

    /// POST the question to `/api/twin/query`. Transport, HTTP, and decode
    /// failures are folded into the returned [`QueryOutcome`]; the only `Err`
    /// is [`InvalidQuestion`], raised before any network activity. The wire
    /// carries the trimmed question, the outcome echoes it verbatim.
    pub async fn query(
        &self,
        question: &str,
        source_type: &str,
    ) -> Result<QueryOutcome, InvalidQuestion> {
        let trimmed = question.trim();
        if trimmed.is_empty() {
            return Err(InvalidQuestion);
        }

        info!(question = trimmed, source_type, "asking the digital twin");
        let outcome = match self.send_query(trimmed, source_type).await {
            Ok(body) => {
                debug!(?body, "digital twin response");
                QueryOutcome::answered(question, &body)
            }
            Err(message) => {
                error!(error = %message, "query failed");
                QueryOutcome::failed(question, message)
            }
        };
        Ok(outcome)
    }

    /// One request/response cycle. `Err` carries the user-facing message for
    /// the failure, keyed off the HTTP status of the response.
    async fn send_query(
        &self,
        question: &str,
        source_type: &str,
    ) -> Result<QueryResponseBody, String> {
        let url = format!("{}{}", self.base_url, QUERY_PATH);
        let response = self
            .http
            .post(&url)
            .json(&QueryRequest::new(question, source_type))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                // Any parseable JSON falls through to the detail lookup; only
                // a non-JSON body yields the generic message.
                let detail = match response.json::<serde_json::Value>().await {
                    Ok(value) => {
                        let body: ErrorBody = serde_json::from_value(value).unwrap_or_default();
                        match body.detail {
                            Some(detail) if !detail.is_empty() => detail,
                            _ => "Unknown error".to_string(),
                        }
                    }
                    Err(_) => "Internal server error".to_string(),
                };
                return Err(format!("Server error: {}", detail));
            }
            return Err(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ));
        }

        response
            .json::<QueryResponseBody>()
            .await
            .map_err(|e| e.to_string())
    }
}
