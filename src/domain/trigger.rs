// Trigger bounds domain models
use super::channel::Channel;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` range considered normal for a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerBounds {
    pub min: f64,
    pub max: f64,
}

impl TriggerBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Strictly below `min` or above `max`. NaN is never outside.
    pub fn is_outside(&self, value: f64) -> bool {
        value < self.min || value > self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub luminosity: TriggerBounds,
    pub temperature: TriggerBounds,
    pub humidity: TriggerBounds,
}

impl Thresholds {
    pub fn for_channel(&self, channel: Channel) -> TriggerBounds {
        match channel {
            Channel::Luminosity => self.luminosity,
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            luminosity: TriggerBounds::new(30.0, 50.0),
            temperature: TriggerBounds::new(10.0, 20.0),
            humidity: TriggerBounds::new(40.0, 60.0),
        }
    }
}
