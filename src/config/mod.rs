//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KCALL` prefix and nested values use double underscores as separators.
//! The conventional `PORT` variable, when set, overrides the listening port.
//!
//! # Example
//!
//! ```no_run
//! use kcall_signaling::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.address());
//! ```

mod error;
mod server;

pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging)
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `KCALL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Applies `PORT` on top, if set
    ///
    /// # Environment Variable Format
    ///
    /// - `KCALL__SERVER__HOST=127.0.0.1` -> `server.host = 127.0.0.1`
    /// - `KCALL__SERVER__LOG_FORMAT=json` -> `server.log_format = json`
    /// - `PORT=8080` -> `server.port = 8080`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types,
    /// e.g. a non-numeric `PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("KCALL")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("PORT");
        env::remove_var("KCALL__SERVER__HOST");
        env::remove_var("KCALL__SERVER__PORT");
        env::remove_var("KCALL__SERVER__LOG_LEVEL");
        env::remove_var("KCALL__SERVER__LOG_FORMAT");
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_port_variable() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PORT", "8081");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 8081);
    }

    #[test]
    fn test_port_variable_overrides_prefixed_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("KCALL__SERVER__PORT", "9000");
        env::set_var("PORT", "9001");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 9001);
    }

    #[test]
    fn test_prefixed_server_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("KCALL__SERVER__HOST", "127.0.0.1");
        env::set_var("KCALL__SERVER__PORT", "4000");
        env::set_var("KCALL__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_non_numeric_port_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PORT", "not-a-port");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_zero_port_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("PORT", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidPort)));
    }
}
