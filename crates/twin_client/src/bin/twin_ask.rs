//! twin-ask: terminal client for the Digital Twin Q&A API.
//! Resolves the API base URL, probes /health, sends one question, and prints
//! the answer as plain text, rendered HTML, or JSON.

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process;

use twin_client::config;
use twin_client::render::{self, MemoryPage};
use twin_client::{HealthStatus, QueryOutcome, TwinClient, DEFAULT_SOURCE_TYPE};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain answer text.
    Text,
    /// HTML fragments (health indicator and answer).
    Html,
    /// The full query outcome as JSON.
    Json,
}

#[derive(Parser)]
#[command(
    name = "twin-ask",
    version,
    about = "Ask the Digital Twin Q&A service a question"
)]
struct Cli {
    /// Question to ask; read from stdin when omitted.
    question: Option<String>,

    /// API base URL, overriding TWIN_API_URL and the config file.
    #[arg(long)]
    api_url: Option<String>,

    /// Config file path (default: TWIN_CONFIG or ~/.twin/config.yaml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Audience the query runs as (e.g. public, investor, boardroom).
    #[arg(long)]
    source_type: Option<String>,

    /// Output format for the answer.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Probe the health endpoint and exit (0 healthy, 1 otherwise).
    #[arg(long)]
    check_health: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "twin_client=warn".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load the resolved config file. A missing or unreadable file is only an
/// error when the path was given explicitly.
fn load_config(explicit: bool, path: Option<&Path>) -> Result<Option<config::Config>, String> {
    let Some(path) = path else {
        return Ok(None);
    };
    if !path.exists() {
        if explicit {
            return Err(format!("config file {} not found", path.display()));
        }
        return Ok(None);
    }
    match config::load(path) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(e) if explicit => Err(format!(
            "failed to load config from {}: {}",
            path.display(),
            e
        )),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
            Ok(None)
        }
    }
}

/// Question from the positional argument, falling back to the first line of
/// stdin. Returns None when neither yields a non-blank question.
fn resolve_question(arg: Option<String>) -> Option<String> {
    if let Some(question) = arg {
        return Some(question);
    }
    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line).ok()?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn print_outcome(outcome: &QueryOutcome, health: HealthStatus, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", outcome.answer);
            if let Some(error) = &outcome.error {
                eprintln!("Error: {}", error);
            }
        }
        OutputFormat::Html => {
            let mut page =
                MemoryPage::with_slots([render::HEALTH_TARGET_ID, render::ANSWER_TARGET_ID]);
            render::update_health_indicator(&mut page, health);
            render::display_answer(&mut page, outcome, render::ANSWER_TARGET_ID);
            println!("{}", page.to_html());
        }
        OutputFormat::Json => match serde_json::to_string_pretty(outcome) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: failed to format JSON: {}", e),
        },
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config_path = config::resolve_config_path(cli.config.as_deref());
    let file_config = match load_config(cli.config.is_some(), config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    let base_url = config::resolve_base_url_from_env(cli.api_url.as_deref(), file_config.as_ref());
    let mut client = TwinClient::new(base_url);

    if cli.check_health {
        let health = client.check_health().await;
        println!("{}", health);
        process::exit(if health.is_healthy() { 0 } else { 1 });
    }

    let Some(question) = resolve_question(cli.question) else {
        eprintln!("Error: no question provided (pass one as an argument or on stdin)");
        process::exit(1);
    };

    let source_type = cli
        .source_type
        .or_else(|| {
            file_config
                .as_ref()
                .and_then(|cfg| cfg.api.source_type.clone())
        })
        .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_string());

    let health = client.check_health().await;
    let outcome = match client.query(&question, &source_type).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    print_outcome(&outcome, health, cli.format);
    if !outcome.success {
        process::exit(1);
    }
}
