//! Configuration management for the `tripcast` application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::TripcastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `tripcast` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripcastConfig {
    /// Weather and geocoding service locations
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Values offered when the user just presses Enter
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Where artifacts are read from and written to
    #[serde(default)]
    pub output: OutputConfig,
}

/// Base URLs of the services the pipeline talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log output destination (console, file, both)
    #[serde(default = "default_log_output")]
    pub output: String,
    /// Directory receiving the timestamped log file
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_street")]
    pub street: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    #[serde(default = "default_history_years")]
    pub history_years: u32,
    /// Timezone used for daily aggregates of the detailed forecast
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Artifact paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_trip_file")]
    pub trip_file: String,
    #[serde(default = "default_map_file")]
    pub map_file: String,
    #[serde(default = "default_chart_file")]
    pub chart_file: String,
    #[serde(default = "default_enriched_file")]
    pub enriched_file: String,
}

// Default value functions
fn default_geocode_url() -> String {
    "https://geocode.maps.co".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_output() -> String {
    "both".to_string()
}

fn default_log_directory() -> String {
    ".".to_string()
}

fn default_city() -> String {
    "Wroclaw".to_string()
}

fn default_street() -> String {
    "Fabryczna".to_string()
}

fn default_forecast_days() -> u32 {
    5
}

fn default_history_years() -> u32 {
    4
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_trip_file() -> String {
    "route_data.csv".to_string()
}

fn default_map_file() -> String {
    "map.html".to_string()
}

fn default_chart_file() -> String {
    "forecast_chart.svg".to_string()
}

fn default_enriched_file() -> String {
    "route_data_enriched.csv".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            forecast_url: default_forecast_url(),
            archive_url: default_archive_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            output: default_log_output(),
            directory: default_log_directory(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            street: default_street(),
            forecast_days: default_forecast_days(),
            history_years: default_history_years(),
            timezone: default_timezone(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            trip_file: default_trip_file(),
            map_file: default_map_file(),
            chart_file: default_chart_file(),
            enriched_file: default_enriched_file(),
        }
    }
}

impl TripcastConfig {
    /// Load configuration from `config_path`, or the default location, then
    /// apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRIPCAST__DEFAULTS__CITY=Berlin overrides defaults.city
        builder = builder.add_source(
            Environment::with_prefix("TRIPCAST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripcastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripcast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.endpoints.geocode_url.is_empty() {
            self.endpoints.geocode_url = default_geocode_url();
        }
        if self.endpoints.forecast_url.is_empty() {
            self.endpoints.forecast_url = default_forecast_url();
        }
        if self.endpoints.archive_url.is_empty() {
            self.endpoints.archive_url = default_archive_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.output.is_empty() {
            self.logging.output = default_log_output();
        }
        if self.logging.directory.is_empty() {
            self.logging.directory = default_log_directory();
        }
        if self.defaults.city.is_empty() {
            self.defaults.city = default_city();
        }
        if self.defaults.street.is_empty() {
            self.defaults.street = default_street();
        }
        if self.defaults.timezone.is_empty() {
            self.defaults.timezone = default_timezone();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_endpoints()?;
        self.validate_defaults()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_endpoints(&self) -> Result<()> {
        for (name, url) in [
            ("geocode_url", &self.endpoints.geocode_url),
            ("forecast_url", &self.endpoints.forecast_url),
            ("archive_url", &self.endpoints.archive_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripcastError::config(format!(
                    "Endpoint {name} must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// The defaults are offered at prompts, so they must pass the same checks as user input
    fn validate_defaults(&self) -> Result<()> {
        if !(1..=16).contains(&self.defaults.forecast_days) {
            return Err(TripcastError::config(
                "Default forecast days must be between 1 and 16",
            )
            .into());
        }

        if self.defaults.history_years == 0 {
            return Err(TripcastError::config("Default history years must be at least 1").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripcastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripcastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_log_outputs = ["console", "file", "both"];
        if !valid_log_outputs.contains(&self.logging.output.as_str()) {
            return Err(TripcastError::config(format!(
                "Invalid log output '{}'. Must be one of: {}",
                self.logging.output,
                valid_log_outputs.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
