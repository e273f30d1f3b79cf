//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Exchange rate lookup configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
    /// Email notification configuration.
    #[serde(default)]
    pub email: EmailConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Exchange rate lookup configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Quote endpoint; `{currency}` is replaced with the target code.
    #[serde(default = "default_rate_url")]
    pub api_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_rate_timeout")]
    pub timeout_secs: u64,
}

fn default_rate_url() -> String {
    "https://economia.awesomeapi.com.br/json/last/USD-{currency}".to_string()
}

fn default_rate_timeout() -> u64 {
    5
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_rate_url(),
            timeout_secs: default_rate_timeout(),
        }
    }
}

/// Email notification configuration.
///
/// Disabled by default; with `enabled = false` the engine falls back to a
/// log-only notifier so a database-only setup still works.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether SMTP delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Kudos Rewards".to_string()
}

fn default_from_email() -> String {
    "rewards@kudos.local".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_name: default_from_name(),
            from_email: default_from_email(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KUDOS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_defaults() {
        let exchange = ExchangeConfig::default();
        assert!(exchange.api_base_url.contains("{currency}"));
        assert_eq!(exchange.timeout_secs, 5);
    }

    #[test]
    fn test_email_disabled_by_default() {
        let email = EmailConfig::default();
        assert!(!email.enabled);
        assert_eq!(email.smtp_port, 587);
    }
}
