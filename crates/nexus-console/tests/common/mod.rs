/*
[INPUT]:  Wiremock server and tempdir fixtures
[OUTPUT]: Shared helpers for console integration tests
[POS]:    Test support module
[UPDATE]: When adding shared fixtures
*/

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nexus_console::{ArtifactExporter, Narrator, Orchestrator};
use nexus_console_adapter::{ClientConfig, NexusClient};

pub async fn mock_generate(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

pub fn success_body() -> Value {
    json!({
        "status": "SUCCESS",
        "logs": ["🚀 Architect: drafting plan", "Coder: writing module", "QA: all checks passed"],
        "final_code": "def main():\n    print('hello')\n"
    })
}

pub fn failure_body() -> Value {
    json!({
        "status": "FAILED",
        "logs": ["Architect: plan rejected", "❌ QA: 3 checks failed"],
        "final_code": null
    })
}

/// Base URL of a local port with nothing listening on it
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn orchestrator_for(server_uri: &str, export_dir: &TempDir) -> Orchestrator {
    let client = NexusClient::with_config(ClientConfig {
        base_url: server_uri.to_string(),
        ..ClientConfig::default()
    })
    .expect("client");
    Orchestrator::new(
        Arc::new(client),
        Narrator::silent(),
        ArtifactExporter::new(export_dir.path(), "nexus_solution.py"),
    )
}
