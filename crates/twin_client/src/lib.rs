//! Shared Digital Twin Q&A client library (config resolution, HTTP API,
//! HTML rendering). Used by the twin-ask CLI and embedding applications.

pub mod client;
pub mod config;
pub mod messages;
pub mod render;

pub use client::{
    HealthStatus, InvalidQuestion, QueryOutcome, TwinClient, DEFAULT_SOURCE_TYPE, HEALTH_PATH,
    QUERY_PATH,
};
pub use config::{
    default_config_path, resolve_base_url, resolve_base_url_from_env, resolve_config_path,
    ApiSection, Config, ConfigError, DEFAULT_API_URL, ENV_API_URL, ENV_CONFIG_PATH,
};
pub use render::{MemoryPage, RenderTarget, ANSWER_TARGET_ID, HEALTH_TARGET_ID};
