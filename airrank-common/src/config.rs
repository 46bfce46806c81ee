//! Configuration loading and config file resolution

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::FlightType;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AIRRANK_CONFIG";

/// Default auto-refresh interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Default simulated latency of the demo data source
pub const DEFAULT_MOCK_LATENCY_MS: u64 = 1000;

/// Initial filter values, also restored by an explicit reset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    pub flight_type: FlightType,
    pub date_range_days: u32,
    pub min_flights: u32,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            flight_type: FlightType::All,
            date_range_days: 30,
            min_flights: 10,
        }
    }
}

/// TOML configuration file contents
///
/// Every field is optional in the file; missing fields take compiled defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Rankings endpoint, e.g. `http://localhost:5000/api/rankings`
    pub endpoint: String,
    /// Destination reference data endpoint
    pub destinations_endpoint: String,
    /// Airline drill-down base; flights are read from `<base>/<code>/flights`
    pub airlines_endpoint: String,
    /// Auto-refresh interval in seconds
    pub refresh_interval_secs: u64,
    /// Serve generated demo data instead of calling the backend
    pub mock_data: bool,
    /// Simulated latency of the demo data source in milliseconds
    pub mock_latency_ms: u64,
    /// Apply flight type / minimum flights filtering locally (single-tier deployments)
    pub client_side_filtering: bool,
    /// HTTP listen address for the view API
    pub bind_address: String,
    /// Default tracing level when RUST_LOG is not set
    pub log_level: String,
    /// Initial filter values
    pub filters: FilterDefaults,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/api/rankings".to_string(),
            destinations_endpoint: "http://127.0.0.1:5000/api/destinations".to_string(),
            airlines_endpoint: "http://127.0.0.1:5000/api/airlines".to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            mock_data: false,
            mock_latency_ms: DEFAULT_MOCK_LATENCY_MS,
            client_side_filtering: false,
            bind_address: "127.0.0.1:5740".to_string(),
            log_level: "info".to_string(),
            filters: FilterDefaults::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Malformed config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.filters.date_range_days == 0 {
            return Err(Error::Config(
                "filters.date_range_days must be at least 1".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if !self.mock_data {
            for (name, value) in [
                ("endpoint", &self.endpoint),
                ("destinations_endpoint", &self.destinations_endpoint),
                ("airlines_endpoint", &self.airlines_endpoint),
            ] {
                if value.trim().is_empty() {
                    return Err(Error::Config(format!("{} must not be empty", name)));
                }
            }
        }
        Ok(())
    }

    /// Demo data ignores filters, so it is always filtered locally
    pub fn effective_client_side_filtering(&self) -> bool {
        self.client_side_filtering || self.mock_data
    }
}

/// Config file resolution following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Platform config directory (`<config_dir>/airrank/config.toml`)
///
/// Returns `None` when no candidate applies; callers fall back to compiled defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("airrank").join("config.toml"))
}

/// Resolve and load configuration with graceful degradation
///
/// A missing file logs a warning and yields compiled defaults.
/// A file that exists but fails to parse or validate is an error.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let config = TomlConfig::load(&path)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.refresh_interval_secs, 300);
        assert_eq!(config.filters.date_range_days, 30);
        assert_eq!(config.filters.min_flights, 10);
        assert_eq!(config.filters.flight_type, FlightType::All);
        assert!(!config.mock_data);
        assert_eq!(config.airlines_endpoint, "http://127.0.0.1:5000/api/airlines");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            mock_data = true

            [filters]
            min_flights = 50
            "#,
        )
        .unwrap();

        assert!(config.mock_data);
        assert_eq!(config.filters.min_flights, 50);
        assert_eq!(config.filters.date_range_days, 30);
        assert_eq!(config.bind_address, "127.0.0.1:5740");
    }

    #[test]
    fn test_mock_forces_client_side_filtering() {
        let mut config = TomlConfig::default();
        assert!(!config.effective_client_side_filtering());
        config.mock_data = true;
        assert!(config.effective_client_side_filtering());
    }

    #[test]
    fn test_zero_days_rejected() {
        let result = TomlConfig::from_toml_str("[filters]\ndate_range_days = 0\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_drill_down_endpoint_rejected_unless_mock() {
        let config = TomlConfig {
            airlines_endpoint: " ".to_string(),
            ..TomlConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mock = TomlConfig {
            mock_data: true,
            ..config
        };
        assert!(mock.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = TomlConfig::from_toml_str("refresh_interval_secs = \"soon\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_cli_arg_has_priority() {
        let path = PathBuf::from("/tmp/airrank-cli.toml");
        assert_eq!(resolve_config_path(Some(&path)), Some(path));
    }
}
