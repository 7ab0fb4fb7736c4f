// FIWARE broker implementation (STH-Comet history + IoT Agent commands)
use crate::application::broker_client::{BrokerClient, BrokerError, RawEntry};
use crate::domain::channel::{Channel, CommandName};
use crate::infrastructure::config::{BrokerSettings, DeviceSettings};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::time::Duration;

const SERVICE_HEADER: &str = "fiware-service";
const SERVICE_PATH_HEADER: &str = "fiware-servicepath";

#[derive(Debug, Clone)]
pub struct FiwareBroker {
    client: reqwest::Client,
    attributes_url: String,
    command_url: String,
    service: String,
    service_path: String,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    #[serde(rename = "contextResponses")]
    context_responses: Vec<ContextResponse>,
}

#[derive(Debug, Deserialize)]
struct ContextResponse {
    #[serde(rename = "contextElement")]
    context_element: ContextElement,
}

#[derive(Debug, Deserialize)]
struct ContextElement {
    attributes: Vec<AttributeHistory>,
}

#[derive(Debug, Deserialize)]
struct AttributeHistory {
    values: Vec<RawEntry>,
}

impl FiwareBroker {
    pub fn new(broker: &BrokerSettings, device: &DeviceSettings) -> Result<Self, BrokerError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = broker.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let entity_type = urlencoding::encode(&device.entity_type);
        // only the configured parts are escaped; the urn separators stay literal
        let urn = format!(
            "urn:ngsi-ld:{}:{}",
            entity_type,
            urlencoding::encode(&device.entity_id)
        );

        Ok(Self {
            client: builder.build()?,
            attributes_url: format!(
                "{}/STH/v1/contextEntities/type/{}/id/{}/attributes",
                broker.history_url.trim_end_matches('/'),
                entity_type,
                urn
            ),
            command_url: format!("{}/v2/entities/{}/attrs", broker.command_url.trim_end_matches('/'), urn),
            service: broker.service.clone(),
            service_path: broker.service_path.clone(),
        })
    }

    pub fn history_url(&self, channel: Channel) -> String {
        format!("{}/{}", self.attributes_url, channel.attribute())
    }

    pub fn command_url(&self) -> &str {
        &self.command_url
    }

    fn with_tenant(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(SERVICE_HEADER, &self.service)
            .header(SERVICE_PATH_HEADER, &self.service_path)
    }

    fn parse_history(body: &str) -> Result<Vec<RawEntry>, BrokerError> {
        let envelope: HistoryEnvelope =
            serde_json::from_str(body).map_err(|e| BrokerError::Shape(e.to_string()))?;

        envelope
            .context_responses
            .into_iter()
            .next()
            .ok_or_else(|| BrokerError::Shape("empty contextResponses".to_string()))?
            .context_element
            .attributes
            .into_iter()
            .next()
            .map(|attribute| attribute.values)
            .ok_or_else(|| BrokerError::Shape("empty attributes".to_string()))
    }
}

/// `{"<command>": {"type": "command", "value": ""}}`
pub fn command_body(command: CommandName) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    body.insert(
        command.as_str().to_string(),
        serde_json::json!({ "type": "command", "value": "" }),
    );
    serde_json::Value::Object(body)
}

#[async_trait]
impl BrokerClient for FiwareBroker {
    async fn query_last_n(&self, channel: Channel, last_n: u32) -> Result<Vec<RawEntry>, BrokerError> {
        let url = self.history_url(channel);
        tracing::debug!("Querying {} with lastN={}", url, last_n);

        let response = self
            .with_tenant(self.client.get(&url).query(&[("lastN", last_n)]))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BrokerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_history(&body)
    }

    async fn send_command(&self, command: CommandName) -> Result<(), BrokerError> {
        let response = self
            .with_tenant(self.client.patch(&self.command_url))
            .json(&command_body(command))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BrokerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
