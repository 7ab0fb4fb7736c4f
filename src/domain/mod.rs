// Domain layer - Sensor channels, observations and accumulated series
pub mod channel;
pub mod chart;
pub mod series;
pub mod time;
pub mod trigger;
