// Broker trait for history queries and device commands
use crate::domain::channel::{Channel, CommandName};
use async_trait::async_trait;
use serde::Deserialize;

/// One history entry as stored by the broker. Both fields are optional so a
/// single bad entry can be skipped without rejecting the whole response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEntry {
    #[serde(rename = "recvTime", default)]
    pub recv_time: Option<String>,
    #[serde(rename = "attrValue", default)]
    pub attr_value: Option<serde_json::Value>,
}

impl RawEntry {
    /// Numeric reading, 0.0 when absent or not a number
    pub fn value(&self) -> f64 {
        match &self.attr_value {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("broker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("broker responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected broker response shape: {0}")]
    Shape(String),
}

#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Fetch the last `last_n` history entries of a channel, oldest first
    async fn query_last_n(&self, channel: Channel, last_n: u32) -> Result<Vec<RawEntry>, BrokerError>;

    /// Deliver a command to the device's command attribute
    async fn send_command(&self, command: CommandName) -> Result<(), BrokerError>;
}
