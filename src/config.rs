use crate::core::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment switch that turns on accounts, simulation and ICE scoring.
pub const EXTENDED_ENV: &str = "EVALUATOR_EXTENDED";
pub const DEFAULT_DAYS_ENV: &str = "EVALUATOR_DEFAULT_SIMULATION_DAYS";
pub const MAX_DAYS_ENV: &str = "EVALUATOR_MAX_SIMULATION_DAYS";

/// Capability sets that can be switched on independently of the core
/// composite ranking, which is always available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub accounts: bool,
    #[serde(default)]
    pub simulation: bool,
    #[serde(default)]
    pub ice_scoring: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self {
            accounts: true,
            simulation: true,
            ice_scoring: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Service configuration, built once at startup and injected into
/// [`EvaluatorService`](crate::service::EvaluatorService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Span used when a simulation request omits its end date.
    #[serde(default = "default_simulation_days")]
    pub default_simulation_days: u32,
    /// Longest span a simulation request may cover.
    #[serde(default = "max_simulation_days")]
    pub max_simulation_days: u32,
}

fn default_simulation_days() -> u32 {
    90
}

fn max_simulation_days() -> u32 {
    365
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::none(),
            default_simulation_days: default_simulation_days(),
            max_simulation_days: max_simulation_days(),
        }
    }
}

impl Config {
    /// Configuration with every capability enabled.
    pub fn extended() -> Self {
        Self {
            capabilities: Capabilities::all(),
            ..Self::default()
        }
    }

    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(flag) = lookup(EXTENDED_ENV) {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes") {
                config.capabilities = Capabilities::all();
            }
        }
        if let Some(days) = lookup(DEFAULT_DAYS_ENV) {
            config.default_simulation_days = parse_days(DEFAULT_DAYS_ENV, &days)?;
        }
        if let Some(days) = lookup(MAX_DAYS_ENV) {
            config.max_simulation_days = parse_days(MAX_DAYS_ENV, &days)?;
        }

        if config.default_simulation_days > config.max_simulation_days {
            return Err(ValidationError::InvalidSetting {
                key: DEFAULT_DAYS_ENV.to_string(),
                value: format!(
                    "{} exceeds maximum {}",
                    config.default_simulation_days, config.max_simulation_days
                ),
            });
        }
        Ok(config)
    }
}

fn parse_days(key: &str, value: &str) -> Result<u32, ValidationError> {
    match value.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ValidationError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        }),
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
    fn test_defaults_disable_capabilities() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.capabilities.simulation);
        assert_eq!(config.default_simulation_days, 90);
        assert_eq!(config.max_simulation_days, 365);
    }

    #[test]
    fn test_extended_flag_enables_everything() {
        let config = Config::from_lookup(lookup(&[(EXTENDED_ENV, "TRUE")])).unwrap();
        assert_eq!(config.capabilities, Capabilities::all());
        let off = Config::from_lookup(lookup(&[(EXTENDED_ENV, "false")])).unwrap();
        assert_eq!(off.capabilities, Capabilities::none());
    }

    #[test]
    fn test_day_overrides() {
        let config =
            Config::from_lookup(lookup(&[(DEFAULT_DAYS_ENV, "30"), (MAX_DAYS_ENV, "120")])).unwrap();
        assert_eq!(config.default_simulation_days, 30);
        assert_eq!(config.max_simulation_days, 120);
    }

    #[test]
    fn test_malformed_days_rejected() {
        assert!(Config::from_lookup(lookup(&[(MAX_DAYS_ENV, "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[(MAX_DAYS_ENV, "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[(DEFAULT_DAYS_ENV, "400")])).is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config =
            serde_json::from_str(r#"{"capabilities": {"simulation": true}}"#).unwrap();
        assert!(config.capabilities.simulation);
        assert!(!config.capabilities.ice_scoring);
        assert_eq!(config.max_simulation_days, 365);
    }
}
