use crate::application::polling_service::PollingOptions;
use crate::domain::channel::Channel;
use crate::domain::trigger::Thresholds;
use anyhow::{Context, bail};
use chrono_tz::Tz;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub broker: BrokerSettings,
    pub device: DeviceSettings,
    pub polling: PollingSettings,
    pub thresholds: Thresholds,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    /// STH-Comet base URL (historical queries)
    pub history_url: String,
    /// IoT Agent / Orion base URL (commands)
    pub command_url: String,
    pub service: String,
    pub service_path: String,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceSettings {
    pub entity_type: String,
    pub entity_id: String,
}

impl DeviceSettings {
    pub fn entity_urn(&self) -> String {
        format!("urn:ngsi-ld:{}:{}", self.entity_type, self.entity_id)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub seed_last_n: u32,
    pub incremental_last_n: u32,
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    /// `host` may be an IP literal or a name such as `localhost`
    pub async fn resolve_addr(&self) -> anyhow::Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Cannot resolve server address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address found for {}:{}", self.host, self.port))
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for channel in Channel::ALL {
            let bounds = self.thresholds.for_channel(channel);
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                bail!("Invalid {} thresholds: min {} max {}", channel, bounds.min, bounds.max);
            }
        }
        if self.polling.interval_ms == 0 {
            bail!("polling.interval_ms must be positive");
        }
        if self.polling.seed_last_n == 0 || self.polling.incremental_last_n == 0 {
            bail!("polling.seed_last_n and polling.incremental_last_n must be at least 1");
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.polling
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", self.polling.timezone, e))
    }

    pub fn polling_options(&self) -> anyhow::Result<PollingOptions> {
        Ok(PollingOptions {
            interval: Duration::from_millis(self.polling.interval_ms),
            seed_last_n: self.polling.seed_last_n,
            incremental_last_n: self.polling.incremental_last_n,
            timezone: self.timezone()?,
        })
    }
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("broker.history_url", "http://localhost:8666")?
        .set_default("broker.command_url", "http://localhost:1026")?
        .set_default("broker.service", "smart")?
        .set_default("broker.service_path", "/")?
        .set_default("device.entity_type", "Hosp")?
        .set_default("device.entity_id", "001")?
        .set_default("polling.interval_ms", 5000_i64)?
        .set_default("polling.seed_last_n", 10_i64)?
        .set_default("polling.incremental_last_n", 5_i64)?
        .set_default("polling.timezone", "Europe/Lisbon")?
        .set_default("thresholds.luminosity.min", 30.0)?
        .set_default("thresholds.luminosity.max", 50.0)?
        .set_default("thresholds.temperature.min", 10.0)?
        .set_default("thresholds.temperature.max", 20.0)?
        .set_default("thresholds.humidity.min", 40.0)?
        .set_default("thresholds.humidity.max", 60.0)?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5000_i64)?)
}

/// Defaults, then `config/dashboard.toml` if present, then `DASHBOARD__*` env vars
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

pub fn load_config_from_str(toml: &str) -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}
