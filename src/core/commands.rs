use std::path::Path;
use std::sync::Arc;

use chrono::Local;

use super::config::ApiConfig;
use super::models::{BuildMode, UploadCandidate};
use super::report::render_session;
use super::service::{CoreService, SessionView};
use super::session::AttemptState;
use super::settings_store::SettingsStore;
use super::validation::{format_file_size, validate_upload};

pub struct AppState {
    pub core: Arc<CoreService>,
}

/// Output of a front-end command: the text to print and whether the attempt succeeded.
pub struct CommandOutput {
    pub text: String,
    pub ok: bool,
}

pub async fn analyze_resume(
    state: &AppState,
    resume_path: &Path,
    job_description: String,
) -> Result<CommandOutput, String> {
    let candidate = UploadCandidate::from_path(resume_path)
        .await
        .map_err(|err| format!("cannot read {}: {err}", resume_path.display()))?;

    if state.core.select_file(candidate).await.is_ok() {
        state.core.set_job_description(job_description).await;
        state.core.analyze().await;
    }

    let view = state.core.snapshot().await;
    Ok(CommandOutput {
        ok: succeeded(&view),
        text: render_session(&view, Local::now()),
    })
}

pub async fn check_resume(resume_path: &Path) -> Result<CommandOutput, String> {
    let candidate = UploadCandidate::from_path(resume_path)
        .await
        .map_err(|err| format!("cannot read {}: {err}", resume_path.display()))?;
    let size = candidate.size_bytes;

    Ok(match validate_upload(candidate) {
        Ok(upload) => CommandOutput {
            text: format!(
                "{} ({}) is ready for analysis\n",
                upload.file_name(),
                format_file_size(size)
            ),
            ok: true,
        },
        Err(err) => CommandOutput {
            text: format!("Error: {err}\n"),
            ok: false,
        },
    })
}

pub fn show_config(config: &ApiConfig, store: &SettingsStore) -> Result<CommandOutput, String> {
    let endpoint = config.endpoint().map_err(|err| err.to_string())?;
    let mode = match config.mode {
        BuildMode::Development => "development",
        BuildMode::Production => "production",
    };

    let mut text = format!("mode: {mode}\nendpoint: {endpoint}\napi url: {}\n", config.api_url);
    if let Some(origin) = &config.origin {
        text.push_str(&format!("origin: {origin}\n"));
    }
    text.push_str(&format!("settings file: {}\n", store.path().display()));

    Ok(CommandOutput { text, ok: true })
}

pub enum SettingKey {
    ApiUrl,
    Origin,
}

pub async fn save_setting(
    store: &SettingsStore,
    key: SettingKey,
    value: &str,
) -> Result<CommandOutput, String> {
    let value = value.to_string();
    store
        .update(|settings| match key {
            SettingKey::ApiUrl => settings.api_url = Some(value),
            SettingKey::Origin => settings.origin = Some(value),
        })
        .await
        .map_err(|err| format!("{err:#}"))?;

    Ok(CommandOutput {
        text: format!("saved to {}\n", store.path().display()),
        ok: true,
    })
}

fn succeeded(view: &SessionView) -> bool {
    view.state == AttemptState::Succeeded && view.error.is_none()
}
