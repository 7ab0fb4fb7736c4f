// Polling service - Periodic fetch -> merge -> trigger pipeline
use crate::application::accumulator::{Accumulator, FetchedBatch, IngestOutcome, PollMode};
use crate::application::broker_client::BrokerClient;
use crate::application::command_sender::CommandSender;
use crate::application::data_fetcher::DataFetcher;
use crate::application::trigger_evaluator::TriggerEvaluator;
use crate::domain::channel::{Channel, CommandName};
use crate::domain::series::SeriesSnapshot;
use crate::domain::trigger::Thresholds;
use chrono_tz::Tz;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy)]
pub struct PollingOptions {
    pub interval: Duration,
    pub seed_last_n: u32,
    pub incremental_last_n: u32,
    pub timezone: Tz,
}

/// What happened during one tick
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub mode: PollMode,
    pub outcome: IngestOutcome,
    pub commands: Vec<CommandName>,
}

pub struct PollingService {
    fetcher: DataFetcher,
    accumulator: Accumulator,
    evaluator: TriggerEvaluator,
    interval: Duration,
}

impl PollingService {
    pub fn new(broker: Arc<dyn BrokerClient>, thresholds: Thresholds, options: PollingOptions) -> Self {
        Self {
            fetcher: DataFetcher::new(broker.clone(), options.timezone),
            accumulator: Accumulator::new(options.seed_last_n, options.incremental_last_n),
            evaluator: TriggerEvaluator::new(thresholds, CommandSender::new(broker)),
            interval: options.interval,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SeriesSnapshot>> {
        self.accumulator.subscribe()
    }

    pub fn snapshot(&self) -> Arc<SeriesSnapshot> {
        self.accumulator.snapshot()
    }

    /// Run a single cycle to completion
    pub async fn run_cycle(&mut self) -> CycleReport {
        let mode = self.accumulator.poll_mode();
        let last_n = mode.last_n();

        let (luminosity, temperature, humidity) = tokio::join!(
            self.fetcher.fetch(Channel::Luminosity, last_n),
            self.fetcher.fetch(Channel::Temperature, last_n),
            self.fetcher.fetch(Channel::Humidity, last_n),
        );
        let batch = FetchedBatch {
            mode,
            luminosity,
            temperature,
            humidity,
        };

        let outcome = self.accumulator.ingest(batch);
        let commands = match &outcome {
            IngestOutcome::Updated(snapshot) => self.evaluator.run(&snapshot.state).await,
            IngestOutcome::Unchanged => Vec::new(),
        };

        CycleReport {
            mode,
            outcome,
            commands,
        }
    }

    /// Tick until `shutdown` resolves. A slow cycle delays the next tick
    /// instead of overlapping with it.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Polling started");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Polling stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let report = self.run_cycle().await;
                    if let IngestOutcome::Updated(snapshot) = &report.outcome {
                        tracing::info!(
                            version = snapshot.version,
                            points = snapshot.state.timestamps.len(),
                            commands = report.commands.len(),
                            "Cycle complete"
                        );
                    }
                }
            }
        }
    }
}
