pub mod cli;
pub mod core;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Command};
use crate::core::commands::{
    analyze_resume, check_resume, save_setting, show_config, AppState, CommandOutput, SettingKey,
};
use crate::core::config::ApiConfig;
use crate::core::service::CoreService;
use crate::core::settings_store::SettingsStore;

pub async fn run(args: Vec<String>) -> ExitCode {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.exit_code() == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            };
        }
    };

    init_tracing(cli.verbose);

    let store = match cli.settings {
        Some(path) => SettingsStore::at(path),
        None => SettingsStore::new(),
    };

    let output = match cli.command {
        Command::Analyze {
            resume,
            job_description,
        } => analyze(&store, &resume, &job_description).await,
        Command::Check { resume } => check_resume(&resume).await,
        Command::Config => load_config(&store)
            .await
            .and_then(|config| show_config(&config, &store)),
        Command::SetApiUrl { url } => save_setting(&store, SettingKey::ApiUrl, &url).await,
        Command::SetOrigin { url } => save_setting(&store, SettingKey::Origin, &url).await,
    };

    match output {
        Ok(CommandOutput { text, ok }) => {
            print!("{text}");
            if ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}

async fn analyze(
    store: &SettingsStore,
    resume: &Path,
    job_description_source: &str,
) -> Result<CommandOutput, String> {
    let config = load_config(store).await?;
    let job_description = read_job_description(job_description_source).await?;

    let endpoint = config.endpoint().map_err(|err| err.to_string())?;
    info!(%endpoint, "analysis service configured");

    let core = CoreService::new(config).map_err(|err| format!("{err:#}"))?;

    analyze_resume(&AppState { core }, resume, job_description).await
}

async fn load_config(store: &SettingsStore) -> Result<ApiConfig, String> {
    let persisted = store.load().await.map_err(|err| format!("{err:#}"))?;
    ApiConfig::from_env(persisted).map_err(|err| format!("{err:#}"))
}

async fn read_job_description(source: &str) -> Result<String, String> {
    if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|err| format!("failed to read job description from stdin: {err}"))?;
        return Ok(text);
    }

    tokio::fs::read_to_string(source)
        .await
        .map_err(|err| format!("failed to read job description {source}: {err}"))
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME")))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
