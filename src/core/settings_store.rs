use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::config::parse_url;
use super::models::PersistedSettings;

const APP_DIR: &str = "resume-match";
const SETTINGS_FILE: &str = "settings.json";

/// Persisted endpoint overrides. Every URL in the file is checked on load and before a
/// write, so a bad value is reported against the file instead of at request time.
pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::at(default_settings_path())
    }

    pub fn at(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub async fn load(&self) -> anyhow::Result<PersistedSettings> {
        let content = match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(PersistedSettings::default())
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read settings file {}", self.file_path.display())
                })
            }
        };

        let settings = serde_json::from_str::<PersistedSettings>(&content)
            .with_context(|| {
                format!("invalid JSON in settings file {}", self.file_path.display())
            })?
            .sanitized();

        check_urls(&settings)
            .with_context(|| format!("invalid settings file {}", self.file_path.display()))?;
        Ok(settings)
    }

    /// Applies `change` to the stored settings and writes them back through a temporary
    /// file, leaving the previous file untouched if the result does not validate.
    pub async fn update<F>(&self, change: F) -> anyhow::Result<PersistedSettings>
    where
        F: FnOnce(&mut PersistedSettings),
    {
        let mut settings = self.load().await?;
        change(&mut settings);
        let settings = settings.sanitized();
        check_urls(&settings)?;

        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let staging = self.file_path.with_extension("json.tmp");
        tokio::fs::write(&staging, serde_json::to_string_pretty(&settings)?).await?;
        tokio::fs::rename(&staging, &self.file_path)
            .await
            .with_context(|| format!("failed to replace {}", self.file_path.display()))?;

        Ok(settings)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_urls(settings: &PersistedSettings) -> anyhow::Result<()> {
    for (key, value) in [("apiUrl", &settings.api_url), ("origin", &settings.origin)] {
        if let Some(raw) = value {
            parse_url(raw).with_context(|| format!("{key} '{raw}' is not a valid http(s) URL"))?;
        }
    }

    Ok(())
}

/// `settings.json` under the per-user config directory, or the working directory when the
/// platform has none.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}
