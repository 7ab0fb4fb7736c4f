// Sensor dashboard - polls broker history, evaluates triggers, serves chart data
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
