//! Mock `ListAlerts` backend built on wiremock.

#![allow(dead_code)]

use alertprobe::client::AlertClient;
use alertprobe::config::BackendConfig;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LIST_PATH: &str = "/api/v2/listAlerts";
pub const TOKEN: &str = "test-token";

/// Mock alert service wrapper with convenience methods
pub struct MockBackend {
    server: MockServer,
}

impl MockBackend {
    /// Start a new mock backend
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Access the underlying MockServer
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    pub fn config(&self) -> BackendConfig {
        BackendConfig::new(self.server.uri(), TOKEN)
    }

    pub fn client(&self) -> AlertClient {
        AlertClient::new(&self.config()).expect("client")
    }

    /// Answer every list call with `body`
    pub async fn respond(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer list calls whose request body contains `partial`
    pub async fn respond_matching(&self, partial: Value, body: Value, priority: u8) {
        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .and(body_partial_json(partial))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .with_priority(priority)
            .mount(&self.server)
            .await;
    }

    /// Answer every list call with an error status and raw body
    pub async fn fail(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of list calls received so far
    pub async fn calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == LIST_PATH)
            .count()
    }
}

/// Wire form of an alert whose client is internal in `zone`, or external
pub fn alert_json(id: &str, zone: Option<&str>) -> Value {
    let client = match zone {
        Some(zone) => json!({ "internal": { "zone": zone, "app": "app-1", "process": "nginx" } }),
        None => json!({ "external": { "dns_pattern": "api.example.com", "port": 443 } }),
    };
    json!({
        "alert_id": id,
        "client": client,
        "server": { "external": { "ip": "203.0.113.9", "port": 443 } },
        "direction": "perimeter_egress",
        "state": "open",
        "timestamp": "2023-03-01T12:00:00Z",
        "alert_type": "new_external_connection"
    })
}

/// `count` alerts in `zone`
pub fn alerts_json(prefix: &str, count: usize, zone: Option<&str>) -> Vec<Value> {
    (0..count)
        .map(|i| alert_json(&format!("{prefix}-{i}"), zone))
        .collect()
}

/// Successful response envelope
pub fn page_json(alerts: Vec<Value>, next_token: &str) -> Value {
    json!({
        "alerts": alerts,
        "paging_token": next_token,
        "response": { "code": "SUCCESS", "message": "" }
    })
}
