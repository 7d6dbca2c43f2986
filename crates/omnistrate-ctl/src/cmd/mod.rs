pub mod amenities;
pub mod apply;
pub mod auth;
pub mod deployment_cell;
pub mod template;

use anyhow::Context as _;
use omnistrate_core::auth::{resolve_token, TOKEN_ENV};
use omnistrate_core::config::{Config, WarnLevel};
use omnistrate_core::http::HttpPlatform;
use omnistrate_core::paths;
use std::path::PathBuf;
use tracing::{error, warn};

/// Per-invocation state shared by every command.
pub struct Context {
    pub config_dir: PathBuf,
    pub config: Config,
    pub api_url: String,
    env_token: Option<String>,
}

impl Context {
    /// Read the config file and apply the command-line overrides.
    pub fn load(api_url: Option<&str>) -> anyhow::Result<Self> {
        let config_dir = paths::config_dir()?;
        let config = Config::load(&config_dir)
            .with_context(|| format!("failed to read config in {}", config_dir.display()))?;

        for w in config.validate() {
            match w.level {
                WarnLevel::Error => error!("config: {}", w.message),
                WarnLevel::Warning => warn!("config: {}", w.message),
            }
        }

        let api_url = api_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| config.api_url.clone());

        Ok(Self {
            config_dir,
            config,
            api_url,
            env_token: std::env::var(TOKEN_ENV).ok(),
        })
    }

    pub fn platform(&self) -> anyhow::Result<HttpPlatform> {
        HttpPlatform::new(&self.api_url)
            .with_context(|| format!("cannot use API URL '{}'", self.api_url))
    }

    pub fn token(&self) -> anyhow::Result<String> {
        Ok(resolve_token(&self.config, self.env_token.as_deref())?)
    }
}
