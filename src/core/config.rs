use anyhow::{Context, Result};
use url::Url;

use super::errors::CoreError;
use super::models::{BuildMode, PersistedSettings};

pub const DEFAULT_DEV_API_URL: &str = "http://localhost:8000";
pub const DEV_ANALYZE_PATH: &str = "/analyze";
pub const PROD_ANALYZE_PATH: &str = "/api/analyze";

pub const ENV_MODE: &str = "RESUME_MATCH_ENV";
pub const ENV_API_URL: &str = "RESUME_MATCH_API_URL";
pub const ENV_ORIGIN: &str = "RESUME_MATCH_ORIGIN";

/// Endpoint selection, resolved once at startup and passed to every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub mode: BuildMode,
    /// API host used in development.
    pub api_url: Url,
    /// Application origin; production requests use a path relative to it.
    pub origin: Option<Url>,
}

impl ApiConfig {
    pub fn development(api_url: Url) -> Self {
        Self {
            mode: BuildMode::Development,
            api_url,
            origin: None,
        }
    }

    pub fn production(origin: Url) -> Self {
        Self {
            mode: BuildMode::Production,
            api_url: default_api_url(),
            origin: Some(origin),
        }
    }

    /// Loads `.env`, then reads the process environment over the persisted settings.
    pub fn from_env(persisted: PersistedSettings) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::resolve(|key| std::env::var(key).ok(), persisted)
    }

    pub fn resolve<F>(lookup: F, persisted: PersistedSettings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match lookup(ENV_MODE) {
            Some(value) => BuildMode::parse(&value).ok_or_else(|| {
                CoreError::Configuration(format!(
                    "{ENV_MODE} must be 'development' or 'production', got '{value}'"
                ))
            })?,
            None => BuildMode::from_build(),
        };

        let api_url = match lookup(ENV_API_URL).or(persisted.api_url) {
            Some(raw) => parse_url(&raw).with_context(|| format!("invalid API URL '{raw}'"))?,
            None => default_api_url(),
        };

        let origin = lookup(ENV_ORIGIN)
            .or(persisted.origin)
            .map(|raw| parse_url(&raw).with_context(|| format!("invalid origin '{raw}'")))
            .transpose()?;

        if mode == BuildMode::Production && origin.is_none() {
            return Err(CoreError::Configuration(format!(
                "{ENV_ORIGIN} is required in production mode"
            ))
            .into());
        }

        Ok(Self {
            mode,
            api_url,
            origin,
        })
    }

    /// Computes the analyze endpoint for the configured mode.
    pub fn endpoint(&self) -> Result<Url, CoreError> {
        let (base, path) = match self.mode {
            BuildMode::Development => (&self.api_url, DEV_ANALYZE_PATH),
            BuildMode::Production => {
                let origin = self.origin.as_ref().ok_or_else(|| {
                    CoreError::Configuration("production mode requires an origin".to_string())
                })?;
                (origin, PROD_ANALYZE_PATH)
            }
        };

        let joined = format!("{}{path}", base.as_str().trim_end_matches('/'));
        Url::parse(&joined).map_err(|err| CoreError::Configuration(format!("{joined}: {err}")))
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("unsupported scheme '{}'", url.scheme());
    }
    Ok(url)
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_DEV_API_URL).expect("default API URL is valid")
}
