//! Configuration management

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub signaling: SignalingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    /// Seconds a call may sit unanswered before the background sweeper ends
    /// it. Disabled when unset; the core contract never expires calls on
    /// its own.
    pub unanswered_timeout_secs: Option<u64>,
    /// How often the sweeper runs, when enabled
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            signaling: SignalingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            unanswered_timeout_secs: None,
            sweep_interval_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from `parley.toml` (optional) with `PARLEY_*`
    /// environment overrides, on top of the defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("parley").required(false))
            .add_source(
                config::Environment::with_prefix("PARLEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
