//! Integration tests for the twin-ask binary: end-to-end runs against a mock
//! HTTP server, config file handling, output formats, and exit codes.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::io::Write;

/// Command for the binary with the twin environment scrubbed, so host
/// settings cannot leak into a test.
fn twin_ask() -> Command {
    let mut cmd = Command::cargo_bin("twin-ask").unwrap();
    cmd.env_remove("TWIN_API_URL")
        .env_remove("TWIN_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// URL of a port with no listener: bind to :0, note the port, drop the socket.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Mock server that reports healthy and answers every query with `answer`.
fn mock_answering_server(answer: &str) -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"status": "healthy"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/twin/query");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({
                "final_answer": answer,
                "status": "success"
            }));
    });
    server
}

#[test]
fn prints_answer_for_positional_question() {
    let server = mock_answering_server("Test answer.");
    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("What is the answer?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Test answer."));
}

#[test]
fn reads_question_from_stdin() {
    let server = mock_answering_server("Stdin answer.");
    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .write_stdin("What is the answer?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stdin answer."));
}

#[test]
fn uses_base_url_from_config_file() {
    let server = mock_answering_server("Config answer.");
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "api:\n  base_url: \"{}\"", server.base_url()).unwrap();

    twin_ask()
        .arg("--config")
        .arg(&config_path)
        .arg("Where does the URL come from?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config answer."));
}

#[test]
fn api_url_flag_overrides_environment() {
    let server = mock_answering_server("Flag answer.");
    twin_ask()
        .env("TWIN_API_URL", closed_port_url())
        .arg("--api-url")
        .arg(server.base_url())
        .arg("Which source wins?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Flag answer."));
}

#[test]
fn source_type_flag_reaches_the_wire() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200);
    });
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/twin/query")
            .json_body(serde_json::json!({
                "question": "Q?",
                "source_type": "boardroom"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"final_answer": "ok"}));
    });

    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("--source-type")
        .arg("boardroom")
        .arg("Q?")
        .assert()
        .success();
    mock.assert();
}

#[test]
fn source_type_from_config_file_is_used() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200);
    });
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/twin/query")
            .json_body(serde_json::json!({
                "question": "Q?",
                "source_type": "investor"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"final_answer": "ok"}));
    });

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        "api:\n  base_url: \"{}\"\n  source_type: \"investor\"",
        server.base_url()
    )
    .unwrap();

    twin_ask()
        .arg("--config")
        .arg(&config_path)
        .arg("Q?")
        .assert()
        .success();
    mock.assert();
}

#[test]
fn check_health_exits_zero_when_healthy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200);
    });

    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("--check-health")
        .assert()
        .success()
        .stdout(predicate::str::contains("healthy"));
}

#[test]
fn check_health_exits_nonzero_when_down() {
    twin_ask()
        .env("TWIN_API_URL", closed_port_url())
        .arg("--check-health")
        .assert()
        .failure()
        .stdout(predicate::str::contains("error"));
}

#[test]
fn empty_question_fails_before_any_request() {
    twin_ask()
        .env("TWIN_API_URL", closed_port_url())
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question"));
}

#[test]
fn html_format_renders_escaped_fragment() {
    let server = mock_answering_server("<script>alert(1)</script>");
    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("--format")
        .arg("html")
        .arg("Give me markup")
        .assert()
        .success()
        .stdout(predicate::str::contains("twin-response success"))
        .stdout(predicate::str::contains("health-indicator healthy"))
        .stdout(predicate::str::contains("&lt;script&gt;alert(1)&lt;/script&gt;"))
        .stdout(predicate::str::contains("<script>").not());
}

#[test]
fn json_format_prints_outcome_object() {
    let server = mock_answering_server("42");
    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("--format")
        .arg("json")
        .arg("What is X?")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("\"answer\": \"42\""))
        .stdout(predicate::str::contains("\"question\": \"What is X?\""));
}

#[test]
fn server_down_reports_error_and_fails() {
    twin_ask()
        .env("TWIN_API_URL", closed_port_url())
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sorry, I encountered an error"))
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn server_error_detail_reaches_the_user() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/twin/query");
        then.status(500)
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"detail": "index offline"}));
    });

    twin_ask()
        .env("TWIN_API_URL", server.base_url())
        .arg("Anything?")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Sorry, I encountered an error: Server error: index offline",
        ))
        .stderr(predicate::str::contains("Server error: index offline"));
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    twin_ask()
        .arg("--config")
        .arg("/nonexistent/twin-config.yaml")
        .arg("Anything?")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
