//! Named calibration configurations.

use std::collections::HashMap;
use std::sync::RwLock;

use log::info;

use crate::calibration::CalibrationConfig;
use crate::error::{ConfigError, ConfigResult, Validate};

/// Thread-safe registry of calibration configurations, keyed by name.
///
/// A new registry holds the standard configurations, all read-only:
///
/// - `SIMPLEX`: Nelder-Mead simplex with default termination
/// - `STEEPEST_DESCENT`: steepest descent with default termination
/// - `SIMPLEX.HIGH_PRECISION`: small simplex, tight tolerances
///
/// # Example
///
/// ```rust
/// use quill_config::{CalibrationConfig, ConfigRegistry, OptimizerConfig};
///
/// let registry = ConfigRegistry::new();
/// assert!(registry.get("SIMPLEX").is_ok());
///
/// let custom = CalibrationConfig::new("MY.SIMPLEX")
///     .with_optimizer(OptimizerConfig::simplex(0.02));
/// registry.register(custom).unwrap();
/// assert_eq!(
///     registry.get("MY.SIMPLEX").unwrap().optimizer,
///     OptimizerConfig::simplex(0.02)
/// );
/// ```
pub struct ConfigRegistry {
    configs: RwLock<HashMap<String, CalibrationConfig>>,
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigRegistry {
    /// Creates a registry holding the standard configurations.
    pub fn new() -> Self {
        let configs = [
            CalibrationConfig::simplex(),
            CalibrationConfig::steepest_descent(),
            CalibrationConfig::high_precision(),
        ]
        .into_iter()
        .map(|config| (config.name.clone(), config))
        .collect();

        Self {
            configs: RwLock::new(configs),
        }
    }

    /// Creates a registry with no configurations.
    pub fn empty() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    /// Validates and registers a configuration, replacing any writable one
    /// of the same name.
    pub fn register(&self, config: CalibrationConfig) -> ConfigResult<()> {
        config.validate_or_error()?;

        let mut configs = self
            .configs
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {e}")))?;

        if let Some(existing) = configs.get(&config.name) {
            if existing.read_only {
                return Err(ConfigError::ReadOnly {
                    key: config.name.clone(),
                });
            }
        }

        info!("registered calibration config {}", config.name);
        configs.insert(config.name.clone(), config);
        Ok(())
    }

    /// Gets a configuration by name.
    pub fn get(&self, name: &str) -> ConfigResult<CalibrationConfig> {
        let configs = self
            .configs
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {e}")))?;

        configs.get(name).cloned().ok_or_else(|| ConfigError::NotFound {
            key: name.to_string(),
        })
    }

    /// Lists all configuration names, sorted.
    pub fn list(&self) -> ConfigResult<Vec<String>> {
        let configs = self
            .configs
            .read()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {e}")))?;

        let mut names: Vec<String> = configs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Deletes a configuration. Returns whether it existed.
    pub fn delete(&self, name: &str) -> ConfigResult<bool> {
        let mut configs = self
            .configs
            .write()
            .map_err(|e| ConfigError::Conflict(format!("Lock error: {e}")))?;

        if let Some(config) = configs.get(name) {
            if config.read_only {
                return Err(ConfigError::ReadOnly {
                    key: name.to_string(),
                });
            }
        }

        Ok(configs.remove(name).is_some())
    }

    /// Parses a JSON configuration and registers it.
    pub fn load_json(&self, json: &str) -> ConfigResult<String> {
        let config = CalibrationConfig::from_json_str(json)?;
        let name = config.name.clone();
        self.register(config)?;
        Ok(name)
    }

    /// Parses a TOML configuration and registers it.
    pub fn load_toml(&self, toml: &str) -> ConfigResult<String> {
        let config = CalibrationConfig::from_toml_str(toml)?;
        let name = config.name.clone();
        self.register(config)?;
        Ok(name)
    }
}
