// Sensor channel and command domain models
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three sensor attributes published by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Luminosity,
    Temperature,
    Humidity,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Luminosity, Channel::Temperature, Channel::Humidity];

    /// Attribute name as known by the broker
    pub fn attribute(&self) -> &'static str {
        match self {
            Channel::Luminosity => "luminosity",
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLevel {
    Alert,
    Normal,
}

/// Command sent to the device when a channel is evaluated against its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandName {
    pub channel: Channel,
    pub level: CommandLevel,
}

impl CommandName {
    pub fn alert(channel: Channel) -> Self {
        Self { channel, level: CommandLevel::Alert }
    }

    pub fn normal(channel: Channel) -> Self {
        Self { channel, level: CommandLevel::Normal }
    }

    pub fn as_str(&self) -> &'static str {
        match (self.level, self.channel) {
            (CommandLevel::Alert, Channel::Luminosity) => "on_alert_luminosity",
            (CommandLevel::Normal, Channel::Luminosity) => "on_normal_luminosity",
            (CommandLevel::Alert, Channel::Temperature) => "on_alert_temperature",
            (CommandLevel::Normal, Channel::Temperature) => "on_normal_temperature",
            (CommandLevel::Alert, Channel::Humidity) => "on_alert_humidity",
            (CommandLevel::Normal, Channel::Humidity) => "on_normal_humidity",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_command_tokens() {
        assert_eq!(CommandName::alert(Channel::Luminosity).as_str(), "on_alert_luminosity");
        assert_eq!(CommandName::normal(Channel::Temperature).to_string(), "on_normal_temperature");
        assert_eq!(CommandName::alert(Channel::Humidity).as_str(), "on_alert_humidity");
    }

    #[test]
    fn test_command_tokens_are_distinct() {
        let tokens: HashSet<&str> = Channel::ALL
            .iter()
            .flat_map(|c| [CommandName::alert(*c).as_str(), CommandName::normal(*c).as_str()])
            .collect();
        assert_eq!(tokens.len(), 6);
    }
}
