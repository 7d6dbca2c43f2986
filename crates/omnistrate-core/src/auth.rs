use crate::api::PlatformApi;
use crate::config::{AuthEntry, Config};
use crate::error::{CtlError, Result};
use std::path::Path;
use tracing::info;

/// Environment variable that bypasses the cached login.
pub const TOKEN_ENV: &str = "OMNISTRATE_TOKEN";

/// Resolve the bearer token for this invocation.
///
/// Priority:
/// 1. `env_token` (the `OMNISTRATE_TOKEN` value, passed in by the caller)
/// 2. the token cached by `login`
pub fn resolve_token(config: &Config, env_token: Option<&str>) -> Result<String> {
    if let Some(token) = env_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    config.cached_token().map(str::to_string).ok_or_else(|| {
        CtlError::Authentication("not logged in: run 'omnistrate-ctl login' or set OMNISTRATE_TOKEN".into())
    })
}

/// Sign in and cache the token in the config under `dir`.
pub fn login(
    api: &dyn PlatformApi,
    dir: &Path,
    config: &mut Config,
    email: &str,
    password: &str,
) -> Result<()> {
    if email.trim().is_empty() {
        return Err(CtlError::invalid("email must not be empty"));
    }
    if password.is_empty() {
        return Err(CtlError::invalid("password must not be empty"));
    }
    let token = api.sign_in(email.trim(), password)?;
    config.auth = Some(AuthEntry {
        email: email.trim().to_string(),
        token,
    });
    config.save(dir)?;
    info!(email = email.trim(), "login cached");
    Ok(())
}

/// Drop the cached token. Returns the email that was logged in, if any.
pub fn logout(dir: &Path, config: &mut Config) -> Result<Option<String>> {
    let previous = config.auth.take().map(|a| a.email);
    if previous.is_some() {
        config.save(dir)?;
    }
    Ok(previous)
}
