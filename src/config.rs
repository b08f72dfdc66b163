use crate::services::progress::ProgressSimulator;
use crate::services::upload_session::SessionTiming;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/analyze";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub request_timeout: Duration,
    pub settle_delay: Duration,
    pub rust_log: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),

    #[error("Invalid endpoint {0}: {1}")]
    InvalidEndpoint(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, "DEEPSCAN_TIMEOUT_SECS", 120)?;
        let settle_ms: u64 = parse_or(&lookup, "DEEPSCAN_SETTLE_MS", 500)?;

        Ok(Self {
            endpoint: lookup("DEEPSCAN_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            settle_delay: Duration::from_millis(settle_ms),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(self.endpoint.clone(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint(
                self.endpoint.clone(),
                "scheme must be http or https".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "DEEPSCAN_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming {
            simulator: ProgressSimulator::default(),
            settle_delay: self.settle_delay,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.rust_log, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DEEPSCAN_ENDPOINT", "https://scan.example.com/analyze"),
            ("DEEPSCAN_TIMEOUT_SECS", "15"),
            ("DEEPSCAN_SETTLE_MS", " 250 "),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "https://scan.example.com/analyze");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.session_timing().settle_delay, Duration::from_millis(250));
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = Config::from_lookup(lookup(&[("DEEPSCAN_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("DEEPSCAN_TIMEOUT_SECS"));
    }

    #[test]
    fn validation_rejects_bad_endpoint_and_zero_timeout() {
        let mut config = Config::from_lookup(lookup(&[("DEEPSCAN_ENDPOINT", "ftp://host/analyze")])).unwrap();
        assert!(config.validate().is_err());

        config.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.endpoint = DEFAULT_ENDPOINT.to_string();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
