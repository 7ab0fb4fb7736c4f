// Mock FIWARE broker served by axum on an ephemeral port
#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use sensor_dashboard::infrastructure::config::{BrokerSettings, DeviceSettings};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub path: String,
    pub last_n: Option<String>,
    pub service: Option<String>,
    pub service_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub path: String,
    pub body: serde_json::Value,
    pub service: Option<String>,
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<HashMap<String, (u16, String)>>,
    queries: Arc<Mutex<Vec<RecordedQuery>>>,
    commands: Arc<Mutex<Vec<RecordedCommand>>>,
}

pub struct MockBroker {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockBroker {
    /// Serve `responses` keyed by attribute name; unknown attributes get a 404
    pub async fn start(responses: &[(&str, u16, String)]) -> Self {
        let state = MockState {
            responses: Arc::new(
                responses
                    .iter()
                    .map(|(attr, status, body)| (attr.to_string(), (*status, body.clone())))
                    .collect(),
            ),
            ..MockState::default()
        };

        let app = Router::new()
            .route("/STH/*rest", get(history))
            .route("/v2/*rest", patch(command))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn settings(&self) -> (BrokerSettings, DeviceSettings) {
        (
            BrokerSettings {
                history_url: self.url(),
                command_url: self.url(),
                service: "smart".to_string(),
                service_path: "/".to_string(),
                request_timeout_ms: Some(2000),
            },
            DeviceSettings {
                entity_type: "Hosp".to_string(),
                entity_id: "001".to_string(),
            },
        )
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.state.queries.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.state.commands.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

async fn history(
    State(state): State<MockState>,
    Path(rest): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.queries.lock().unwrap().push(RecordedQuery {
        path: format!("/STH/{}", rest.trim_start_matches('/')),
        last_n: query.get("lastN").cloned(),
        service: header(&headers, "fiware-service"),
        service_path: header(&headers, "fiware-servicepath"),
    });

    let attribute = rest.rsplit('/').next().unwrap_or_default();
    match state.responses.get(attribute) {
        Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn command(
    State(state): State<MockState>,
    Path(rest): Path<String>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    state.commands.lock().unwrap().push(RecordedCommand {
        path: format!("/v2/{}", rest.trim_start_matches('/')),
        body,
        service: header(&headers, "fiware-service"),
    });
    StatusCode::NO_CONTENT
}

/// STH-Comet style history envelope
pub fn envelope(attribute: &str, values: &[(&str, &str)]) -> String {
    let values: Vec<serde_json::Value> = values
        .iter()
        .map(|(time, value)| {
            serde_json::json!({
                "recvTime": time,
                "attrName": attribute,
                "attrType": "Number",
                "attrValue": value,
            })
        })
        .collect();

    serde_json::json!({
        "contextResponses": [{
            "contextElement": {
                "attributes": [{ "name": attribute, "values": values }],
                "id": "urn:ngsi-ld:Hosp:001",
                "isPattern": false,
                "type": "Hosp"
            },
            "statusCode": { "code": "200", "reasonPhrase": "OK" }
        }]
    })
    .to_string()
}
