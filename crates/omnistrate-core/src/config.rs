use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://api.omnistrate.cloud";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AuthEntry
// ---------------------------------------------------------------------------

/// Credentials cached by `login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthEntry {
    pub email: String,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthEntry>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth: None,
        }
    }
}

impl Config {
    /// Load the config from `dir`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = paths::config_path(dir);
        match crate::io::read_if_exists(&path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Config::default()),
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = paths::config_path(dir);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn cached_token(&self) -> Option<&str> {
        self.auth
            .as_ref()
            .map(|a| a.token.as_str())
            .filter(|t| !t.is_empty())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("api_url '{}' is not an http(s) URL", self.api_url),
            });
        } else if self.api_url.starts_with("http://") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "api_url '{}' is not TLS; the bearer token is sent in clear text",
                    self.api_url
                ),
            });
        }

        if let Some(auth) = &self.auth {
            if auth.token.is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("cached login for '{}' has an empty token", auth.email),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.auth.is_none());
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn save_load_keeps_auth() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            api_url: "https://api.example.test".into(),
            auth: Some(AuthEntry {
                email: "ops@example.com".into(),
                token: "tok-123".into(),
            }),
        };
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.api_url, "https://api.example.test");
        assert_eq!(loaded.cached_token(), Some("tok-123"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            paths::config_path(dir.path()),
            "auth:\n  email: a@b.c\n  token: t\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.cached_token(), Some("t"));
    }

    #[test]
    fn validate_flags_bad_url() {
        let cfg = Config {
            api_url: "ftp://nope".into(),
            auth: None,
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn validate_warns_on_plain_http_and_empty_token() {
        let cfg = Config {
            api_url: "http://localhost:8080".into(),
            auth: Some(AuthEntry {
                email: "a@b.c".into(),
                token: String::new(),
            }),
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.level == WarnLevel::Warning));
        assert!(cfg.cached_token().is_none());
    }
}
