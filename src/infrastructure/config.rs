use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

const CONFIG_PATH: &str = "config/console";

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    pub server: ServerSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: SocketAddr,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    pub tick_interval_ms: u64,
    /// Optional cap on the unit count; unset accepts any positive count
    #[serde(default)]
    pub max_units: Option<usize>,
    pub stream_compression: bool,
}

impl TelemetrySettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            max_units: None,
            stream_compression: true,
        }
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("server.bind_address", "0.0.0.0:8080")?
        .set_default("telemetry.tick_interval_ms", 1000)?
        .set_default("telemetry.stream_compression", true)?)
}

fn finish(settings: config::Config) -> anyhow::Result<ConsoleConfig> {
    let config: ConsoleConfig = settings.try_deserialize()?;

    if config.telemetry.tick_interval_ms == 0 {
        anyhow::bail!("telemetry.tick_interval_ms must be greater than 0");
    }
    if config.telemetry.max_units == Some(0) {
        anyhow::bail!("telemetry.max_units must be greater than 0");
    }

    Ok(config)
}

/// Loads `config/console.toml` over the built-in defaults; the file is optional.
pub fn load_console_config() -> anyhow::Result<ConsoleConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name(CONFIG_PATH).required(false))
        .build()?;

    finish(settings)
}
