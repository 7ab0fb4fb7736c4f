// Data fetcher - Bounded history queries turned into observations
use crate::application::broker_client::{BrokerClient, BrokerError, RawEntry};
use crate::domain::channel::Channel;
use crate::domain::series::Observation;
use crate::domain::time::normalize;
use chrono_tz::Tz;
use std::sync::Arc;

#[derive(Clone)]
pub struct DataFetcher {
    broker: Arc<dyn BrokerClient>,
    timezone: Tz,
}

impl DataFetcher {
    pub fn new(broker: Arc<dyn BrokerClient>, timezone: Tz) -> Self {
        Self { broker, timezone }
    }

    /// Last `last_n` observations of `channel`, empty on any broker failure
    pub async fn fetch(&self, channel: Channel, last_n: u32) -> Vec<Observation> {
        match self.try_fetch(channel, last_n).await {
            Ok(observations) => observations,
            Err(e) => {
                tracing::warn!(%channel, last_n, error = %e, "Fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, channel: Channel, last_n: u32) -> Result<Vec<Observation>, BrokerError> {
        let last_n = last_n.max(1);
        let entries = self.broker.query_last_n(channel, last_n).await?;
        let observations = self.to_observations(channel, &entries);

        tracing::debug!(
            %channel,
            last_n,
            received = entries.len(),
            kept = observations.len(),
            "Fetched history"
        );
        Ok(observations)
    }

    fn to_observations(&self, channel: Channel, entries: &[RawEntry]) -> Vec<Observation> {
        entries
            .iter()
            .filter_map(|entry| {
                let Some(raw) = entry.recv_time.as_deref() else {
                    tracing::warn!(%channel, "Skipping entry without recvTime");
                    return None;
                };
                match normalize(raw, self.timezone) {
                    Ok(timestamp) => Some(Observation::new(timestamp, entry.value())),
                    Err(e) => {
                        tracing::warn!(%channel, error = %e, "Skipping entry");
                        None
                    }
                }
            })
            .collect()
    }
}
