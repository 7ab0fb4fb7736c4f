// Accumulator - Owns the running series and publishes versioned snapshots
use crate::domain::channel::Channel;
use crate::domain::series::{Observation, SeriesSnapshot, SeriesState};
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_SEED_LAST_N: u32 = 10;
pub const DEFAULT_INCREMENTAL_LAST_N: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Nothing accumulated yet; fetched data replaces the series
    Seed { last_n: u32 },
    /// Fetched data is appended to the series
    Incremental { last_n: u32 },
}

impl PollMode {
    pub fn last_n(&self) -> u32 {
        match self {
            PollMode::Seed { last_n } | PollMode::Incremental { last_n } => *last_n,
        }
    }
}

/// Observations gathered in one cycle, tagged with the mode they were fetched in
#[derive(Debug, Clone)]
pub struct FetchedBatch {
    pub mode: PollMode,
    pub luminosity: Vec<Observation>,
    pub temperature: Vec<Observation>,
    pub humidity: Vec<Observation>,
}

impl FetchedBatch {
    pub fn empty(mode: PollMode) -> Self {
        Self {
            mode,
            luminosity: Vec::new(),
            temperature: Vec::new(),
            humidity: Vec::new(),
        }
    }

    pub fn get(&self, channel: Channel) -> &[Observation] {
        match channel {
            Channel::Luminosity => &self.luminosity,
            Channel::Temperature => &self.temperature,
            Channel::Humidity => &self.humidity,
        }
    }

    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Unchanged,
    Updated(Arc<SeriesSnapshot>),
}

pub struct Accumulator {
    current: Arc<SeriesSnapshot>,
    publisher: watch::Sender<Arc<SeriesSnapshot>>,
    seed_last_n: u32,
    incremental_last_n: u32,
}

impl Accumulator {
    pub fn new(seed_last_n: u32, incremental_last_n: u32) -> Self {
        let current = Arc::new(SeriesSnapshot::default());
        let (publisher, _) = watch::channel(current.clone());
        Self {
            current,
            publisher,
            seed_last_n,
            incremental_last_n,
        }
    }

    pub fn poll_mode(&self) -> PollMode {
        if self.current.state.timestamps.is_empty() {
            PollMode::Seed { last_n: self.seed_last_n }
        } else {
            PollMode::Incremental { last_n: self.incremental_last_n }
        }
    }

    pub fn snapshot(&self) -> Arc<SeriesSnapshot> {
        self.current.clone()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<SeriesSnapshot>> {
        self.publisher.subscribe()
    }

    /// Merge a cycle's observations. Readers holding earlier snapshots keep
    /// seeing them unchanged; the merged state is published as a new version.
    pub fn ingest(&mut self, batch: FetchedBatch) -> IngestOutcome {
        if batch.is_empty() {
            tracing::debug!(version = self.current.version, "No observations this cycle");
            return IngestOutcome::Unchanged;
        }

        let mut state = self.current.state.clone();
        let replace = matches!(batch.mode, PollMode::Seed { .. });

        if !batch.luminosity.is_empty() {
            let timestamps = batch.luminosity.iter().map(|o| o.timestamp);
            if replace {
                state.timestamps = timestamps.collect();
            } else {
                state.timestamps.extend(timestamps);
            }
        }

        for channel in Channel::ALL {
            let observations = batch.get(channel);
            if observations.is_empty() {
                continue;
            }
            let values = state.values_mut(channel);
            if replace {
                values.clear();
            }
            values.extend(observations.iter().map(|o| o.value));
        }

        let misaligned = state.misaligned_channels();
        if !misaligned.is_empty() {
            tracing::warn!(
                ?misaligned,
                timestamps = state.timestamps.len(),
                "Channel values no longer line up with the luminosity timestamp axis"
            );
        }

        let snapshot = Arc::new(SeriesSnapshot {
            version: self.current.version + 1,
            state,
        });
        self.current = snapshot.clone();
        self.publisher.send_replace(snapshot.clone());

        tracing::debug!(
            version = snapshot.version,
            mode = ?batch.mode,
            timestamps = snapshot.state.timestamps.len(),
            "Series updated"
        );
        IngestOutcome::Updated(snapshot)
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_LAST_N, DEFAULT_INCREMENTAL_LAST_N)
    }
}
