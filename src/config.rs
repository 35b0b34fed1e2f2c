use std::time::Duration;

use anyhow::Result;
use clap_serde_derive::ClapSerde;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "CropPriceRunner.toml";

#[derive(ClapSerde, Deserialize, Debug, Clone)]
pub struct Config {
    /// The address the listener binds to
    #[default("0.0.0.0".to_string())]
    #[arg(short, long, env)]
    pub address: String,

    /// The port the listener binds to
    #[default(5000)]
    #[arg(short, long, env)]
    pub port: u16,

    /// API key for the Gemini generative language API
    #[default(String::new())]
    #[arg(long, env, hide_env_values = true)]
    pub gemini_api_key: String,

    /// Base URL of the Gemini generative language API
    #[default("https://generativelanguage.googleapis.com".to_string())]
    #[arg(long, env)]
    pub gemini_base_url: String,

    /// Timeout in seconds for each outbound model call
    #[default(10)]
    #[arg(long, env)]
    pub request_timeout_secs: u64,

    /// Origins allowed to call the API from a browser
    #[default(vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ])]
    #[arg(long, env, value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Deployment environment name reported by the health endpoint
    #[default("development".to_string())]
    #[arg(long, env)]
    pub environment: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[default(false)]
    #[arg(long, env, value_parser = clap::builder::BoolishValueParser::new())]
    pub debug: bool,

    /// OTLP collector endpoint, telemetry export is disabled when empty
    #[default(String::new())]
    #[arg(long, env)]
    pub otlp_endpoint: String,

    /// Also log to the console when exporting telemetry
    #[default(true)]
    #[arg(long, env, value_parser = clap::builder::BoolishValueParser::new())]
    pub console: bool,
}

impl Config {
    pub fn from_toml(path: &str) -> Result<<Config as ClapSerde>::Opt> {
        let str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&str)?;
        Ok(config)
    }

    /// Reads `path` and layers `cli` on top of it. A missing or unreadable
    /// default file falls back to built-in defaults; any other file must load.
    pub fn load(path: &str, cli: <Config as ClapSerde>::Opt) -> Result<Self> {
        match Self::from_toml(path) {
            Ok(file) => Ok(Config::from(file).merge(cli)),
            Err(err) if path == DEFAULT_CONFIG_FILE => {
                tracing::debug!("Using default configuration: {}", err);
                Ok(Config::default().merge(cli))
            }
            Err(err) => Err(err.context(format!("Failed to read configuration file {path}"))),
        }
    }

    pub fn otlp_endpoint(&self) -> Option<String> {
        Some(self.otlp_endpoint.trim())
            .filter(|endpoint| !endpoint.is_empty())
            .map(String::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.cors_origins.len(), 3);
        assert!(!config.debug);
        assert!(config.otlp_endpoint().is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let opt: <Config as ClapSerde>::Opt = toml::from_str(
            r#"
            port = 8080
            environment = "production"
            cors_origins = ["https://market.example.com"]
            otlp_endpoint = "http://collector:4317"
            "#,
        )
        .unwrap();
        let config = Config::from(opt);

        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");
        assert_eq!(config.cors_origins, vec!["https://market.example.com"]);
        assert_eq!(config.otlp_endpoint().as_deref(), Some("http://collector:4317"));
        assert_eq!(config.gemini_base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn full_toml_deserializes_into_config() {
        let config: Config = toml::from_str(
            r#"
            address = "127.0.0.1"
            port = 8000
            gemini_api_key = "key"
            gemini_base_url = "http://localhost:9000"
            request_timeout_secs = 3
            cors_origins = []
            environment = "test"
            debug = true
            otlp_endpoint = ""
            console = false
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert!(format!("{config:?}").contains("port: 8000"));
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let opt: <Config as ClapSerde>::Opt = toml::from_str("").unwrap();
        assert!(Config::load("/nonexistent/prices.toml", opt).is_err());
    }
}
