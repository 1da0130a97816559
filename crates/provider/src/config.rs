use datastore::MAX_LATENCY_SCALE;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_DATA_PROVIDER: &str = "DATA_PROVIDER";
pub const ENV_LATENCY_SCALE: &str = "MOCK_LATENCY_SCALE";
pub const ENV_FAILURE_RATE: &str = "MOCK_FAILURE_RATE";
pub const ENV_SIGNED_IN: &str = "MOCK_SIGNED_IN";
pub const ENV_SEED: &str = "MOCK_SEED";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Which backend serves provider calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Mock,
    Remote,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "api" | "remote" => Ok(BackendKind::Remote),
            _ => Err(ConfigError::Invalid {
                key: ENV_DATA_PROVIDER,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Mock => f.write_str("mock"),
            BackendKind::Remote => f.write_str("api"),
        }
    }
}

/// Provider settings, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub backend: BackendKind,
    /// Multiplier applied to the mock backend's nominal latencies
    pub latency_scale: f64,
    /// Probability that a simulated request fails
    pub failure_rate: f64,
    /// Whether the mock account starts signed in
    pub signed_in: bool,
    /// Seed for the generated part of the mock catalog
    pub seed: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            latency_scale: 1.0,
            failure_rate: 0.0,
            signed_in: true,
            seed: None,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

impl ProviderConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_DATA_PROVIDER) {
            config.backend = value.parse()?;
        }
        if let Some(value) = lookup(ENV_LATENCY_SCALE) {
            let scale: f64 = parse(ENV_LATENCY_SCALE, &value)?;
            if !(0.0..=MAX_LATENCY_SCALE).contains(&scale) {
                return Err(ConfigError::Invalid {
                    key: ENV_LATENCY_SCALE,
                    value,
                });
            }
            config.latency_scale = scale;
        }
        if let Some(value) = lookup(ENV_FAILURE_RATE) {
            let rate: f64 = parse(ENV_FAILURE_RATE, &value)?;
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Invalid {
                    key: ENV_FAILURE_RATE,
                    value,
                });
            }
            config.failure_rate = rate;
        }
        if let Some(value) = lookup(ENV_SIGNED_IN) {
            config.signed_in = parse_flag(ENV_SIGNED_IN, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            config.seed = Some(parse(ENV_SEED, &value)?);
        }
        Ok(config)
    }
}
