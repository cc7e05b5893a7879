mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, io::ErrorKind};
use tracing::debug;
use url::Url;

/// Environment variable that overrides `backend.base_url` at deploy time.
pub const API_URL_ENV: &str = "PORTFOLIO_API_URL";

/// Loads configuration for the binary. Explicit arguments win over
/// `CONFIG_PATH` and `PORTFOLIO_API_URL`.
pub async fn load(config_path: Option<String>, api_url: Option<String>) -> Result<Config> {
    let config_path = config_path
        .or_else(|| env::var("CONFIG_PATH").ok())
        .unwrap_or_else(|| "config.yaml".to_string());
    let api_url = api_url.or_else(|| env::var(API_URL_ENV).ok());
    load_from(&config_path, api_url).await
}

/// Reads `config_path` (defaults when the file does not exist) and applies the
/// base URL override, if any.
pub async fn load_from(config_path: &str, api_url_override: Option<String>) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let mut config: Config = match tokio::fs::read_to_string(config_path).await {
        Ok(config_str) => serde_yaml::from_str(&config_str)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No configuration file at {}, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(url) = api_url_override.filter(|url| !url.trim().is_empty()) {
        debug!("{} overrides backend base URL", API_URL_ENV);
        config.backend.base_url = url.trim().to_string();
    }

    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.backend.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "backend.base_url must be http or https, got '{}'",
                self.backend.base_url
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::config("backend.timeout_secs must be greater than zero"));
        }
        Ok(())
    }
}
