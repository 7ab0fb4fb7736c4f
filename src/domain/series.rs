// Accumulated sensor series domain models
use super::channel::Channel;
use super::time::ZonedInstant;

/// A single reading as returned by the broker history API
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: ZonedInstant,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: ZonedInstant, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Running series for the three channels.
///
/// `timestamps` is the shared x-axis and only ever comes from the luminosity
/// channel. Temperature and humidity values are appended positionally, so
/// their lengths can drift from the axis when channels return different
/// numbers of observations (see [`SeriesState::misaligned_channels`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesState {
    pub timestamps: Vec<ZonedInstant>,
    pub luminosity_values: Vec<f64>,
    pub temperature_values: Vec<f64>,
    pub humidity_values: Vec<f64>,
}

impl SeriesState {
    pub fn values(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Luminosity => &self.luminosity_values,
            Channel::Temperature => &self.temperature_values,
            Channel::Humidity => &self.humidity_values,
        }
    }

    pub(crate) fn values_mut(&mut self, channel: Channel) -> &mut Vec<f64> {
        match channel {
            Channel::Luminosity => &mut self.luminosity_values,
            Channel::Temperature => &mut self.temperature_values,
            Channel::Humidity => &mut self.humidity_values,
        }
    }

    pub fn latest(&self, channel: Channel) -> Option<f64> {
        self.values(channel).last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
            && Channel::ALL.iter().all(|c| self.values(*c).is_empty())
    }

    /// Channels holding values whose count no longer matches the timestamp axis
    pub fn misaligned_channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| {
                let len = self.values(*c).len();
                len != 0 && len != self.timestamps.len()
            })
            .collect()
    }
}

/// Immutable view of the series published after every state change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    pub version: u64,
    pub state: SeriesState,
}
