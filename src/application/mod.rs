// Application layer - Polling pipeline and use cases
pub mod accumulator;
pub mod broker_client;
pub mod chart_service;
pub mod command_sender;
pub mod data_fetcher;
pub mod polling_service;
pub mod trigger_evaluator;

#[cfg(test)]
pub(crate) mod fake_broker;
