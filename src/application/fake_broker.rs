// In-memory broker used by the application layer tests
use crate::application::broker_client::{BrokerClient, BrokerError, RawEntry};
use crate::domain::channel::{Channel, CommandName};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBroker {
    responses: Mutex<HashMap<Channel, VecDeque<Result<Vec<RawEntry>, BrokerError>>>>,
    queries: Mutex<Vec<(Channel, u32)>>,
    commands: Mutex<Vec<CommandName>>,
    reject_commands: bool,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_commands() -> Self {
        Self {
            reject_commands: true,
            ..Self::default()
        }
    }

    /// Queue the response for the next query of `channel`; unqueued queries return no entries
    pub fn push(&self, channel: Channel, response: Result<Vec<RawEntry>, BrokerError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(channel)
            .or_default()
            .push_back(response);
    }

    pub fn push_readings(&self, channel: Channel, readings: &[(&str, f64)]) {
        self.push(channel, Ok(entries(readings)));
    }

    pub fn queries(&self) -> Vec<(Channel, u32)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<CommandName> {
        self.commands.lock().unwrap().clone()
    }

    pub fn take_commands(&self) -> Vec<CommandName> {
        std::mem::take(&mut *self.commands.lock().unwrap())
    }
}

pub fn entries(readings: &[(&str, f64)]) -> Vec<RawEntry> {
    readings
        .iter()
        .map(|(time, value)| RawEntry {
            recv_time: Some(time.to_string()),
            attr_value: Some(serde_json::Value::String(value.to_string())),
        })
        .collect()
}

/// `count` readings five seconds apart starting at 2024-01-15T10:00:00Z
pub fn readings(count: usize, value: f64) -> Vec<(String, f64)> {
    (0..count)
        .map(|i| (format!("2024-01-15T10:{:02}:{:02}.000Z", (i * 5) / 60, (i * 5) % 60), value))
        .collect()
}

pub fn as_refs(readings: &[(String, f64)]) -> Vec<(&str, f64)> {
    readings.iter().map(|(t, v)| (t.as_str(), *v)).collect()
}

#[async_trait]
impl BrokerClient for FakeBroker {
    async fn query_last_n(&self, channel: Channel, last_n: u32) -> Result<Vec<RawEntry>, BrokerError> {
        self.queries.lock().unwrap().push((channel, last_n));
        self.responses
            .lock()
            .unwrap()
            .get_mut(&channel)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_command(&self, command: CommandName) -> Result<(), BrokerError> {
        self.commands.lock().unwrap().push(command);
        if self.reject_commands {
            return Err(BrokerError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}
