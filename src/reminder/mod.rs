pub mod job;
pub mod schedule;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::ReminderError;
use crate::repository::Repo;
use crate::sms::{twilio::TwilioClient, Notifier};

pub use job::{Outcome, ReminderJob, RunSummary};
pub use schedule::ScheduleEvaluator;

/// Wires the Twilio transport and the configured timezone into a job and runs
/// a single sweep at `now`.
pub async fn run_once(
    settings: &Settings,
    repo: Repo,
    now: DateTime<Utc>,
) -> Result<RunSummary, ReminderError> {
    let transport = TwilioClient::new(&settings.sms)?;
    let notifier = Notifier::new(Box::new(transport), settings.sms.from_number.clone());
    let evaluator = ScheduleEvaluator::new(settings.reminder.timezone);

    ReminderJob::new(repo, notifier, evaluator).run(now).await
}
