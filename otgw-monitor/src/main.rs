use std::process::ExitCode;
use std::sync::Arc;

use otgw_monitor::configs::Settings;
use otgw_monitor::errors::{MonitorError, SettingsError};
use otgw_monitor::run;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = Arc::new(Settings::new().expect("Failed to load settings."));

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let app_name = env!("CARGO_PKG_NAME").replace('-', "_");
            let level = settings.logger.level.as_str();

            format!("{app_name}={level},otgw_api={level}").into()
        }))
        .init();

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(MonitorError::SettingsError(SettingsError::ConfigurationMissing(keys))) => {
            eprintln!("CONFIGURATION INVALID: set {}", keys.join(", "));
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Monitor failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
