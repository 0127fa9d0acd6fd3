use anyhow::Error;
use chrono::Utc;

use planty::config::Settings;
use planty::reminder::run_once;
use planty::repository;
use planty::telemetry;

/// Send today's watering reminders. Meant to be run once a day by cron.
#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::new()?;
    telemetry::init_tracer(&settings.telemetry)?;

    let result = sweep(&settings).await;

    // Ensure all spans have been reported.
    telemetry::shutdown();

    result
}

async fn sweep(settings: &Settings) -> Result<(), Error> {
    let repo = repository::implementation(&settings.database_url).await?;
    let summary = run_once(settings, repo, Utc::now()).await?;

    if summary.failed > 0 {
        tracing::warn!(
            target = module_path!(),
            failed = summary.failed,
            "Some reminders could not be sent"
        );
    }

    Ok(())
}
