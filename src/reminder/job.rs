use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ReminderError;
use crate::reminder::schedule::ScheduleEvaluator;
use crate::repository::{models::plant_user::WateringAssociation, Repo};
use crate::sms::Notifier;

/// Counts for one sweep. `due` is always `sent + failed + already_sent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub already_sent: usize,
}

/// What happened to a single association during a sweep.
#[derive(Debug)]
pub enum Outcome {
    Skipped,
    AlreadySent,
    Sent,
    Failed(ReminderError),
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::AlreadySent => {
                self.due += 1;
                self.already_sent += 1;
            }
            Outcome::Sent => {
                self.due += 1;
                self.sent += 1;
            }
            Outcome::Failed(_) => {
                self.due += 1;
                self.failed += 1;
            }
        }
    }
}

pub struct ReminderJob {
    repo: Repo,
    notifier: Notifier,
    evaluator: ScheduleEvaluator,
}

impl ReminderJob {
    pub fn new(repo: Repo, notifier: Notifier, evaluator: ScheduleEvaluator) -> Self {
        Self {
            repo,
            notifier,
            evaluator,
        }
    }

    /// Visits every association once. Only a failure to list the associations
    /// aborts the sweep; every other failure is counted against its association.
    #[tracing::instrument(name = "Reminder sweep", skip(self))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunSummary, ReminderError> {
        let associations = self
            .repo
            .plant_users()
            .await
            .map_err(ReminderError::StoreUnavailable)?;

        let today = self.evaluator.today(now);
        tracing::info!(
            target = module_path!(),
            associations = associations.len(),
            today = %today,
            timezone = %self.evaluator.timezone(),
            "Starting reminder sweep"
        );

        let mut summary = RunSummary::default();
        for association in &associations {
            let outcome = self.process(association, now, today).await;
            summary.record(&outcome);
        }

        tracing::info!(
            target = module_path!(),
            due = summary.due,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            already_sent = summary.already_sent,
            "Finished reminder sweep"
        );

        Ok(summary)
    }

    async fn process(
        &self,
        association: &WateringAssociation,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Outcome {
        if association.plant_missing() {
            let e = ReminderError::NotFound {
                entity: "Plant",
                id: association.plant_id,
            };
            tracing::error!(
                target = module_path!(),
                plant_user_id = association.id,
                error = e.to_string(),
                "Could not send watering reminder"
            );

            return Outcome::Failed(e);
        }

        // No lookups for plants that are never watered on a schedule.
        if association.watering_days().is_empty() {
            return Outcome::Skipped;
        }

        if !self.evaluator.is_due(association, now) {
            return Outcome::Skipped;
        }

        match self.repo.reminder_sent(association.id, today).await {
            Ok(true) => {
                tracing::info!(
                    target = module_path!(),
                    plant_user_id = association.id,
                    "Reminder already sent today"
                );
                return Outcome::AlreadySent;
            }
            Ok(false) => (),
            Err(e) => tracing::warn!(
                target = module_path!(),
                plant_user_id = association.id,
                error = e.to_string(),
                "Could not check reminder history; sending anyway"
            ),
        }

        match self.dispatch(association).await {
            Ok(message_id) => {
                match self
                    .repo
                    .record_reminder(association.id, today, message_id.clone())
                    .await
                {
                    Ok(delivery) => tracing::debug!(
                        target = module_path!(),
                        plant_user_id = association.id,
                        delivery_id = delivery.id,
                        "Recorded sent reminder"
                    ),
                    Err(e) => tracing::error!(
                        target = module_path!(),
                        plant_user_id = association.id,
                        message_id = %message_id,
                        error = e.to_string(),
                        "Could not record sent reminder"
                    ),
                }

                Outcome::Sent
            }
            Err(e) => {
                tracing::error!(
                    target = module_path!(),
                    plant_user_id = association.id,
                    error = e.to_string(),
                    "Could not send watering reminder"
                );

                Outcome::Failed(e)
            }
        }
    }

    #[tracing::instrument(
        name = "Dispatch reminder",
        skip(self, association),
        fields(plant_user_id = association.id)
    )]
    async fn dispatch(&self, association: &WateringAssociation) -> Result<String, ReminderError> {
        let user = self
            .repo
            .user_by_id(association.user_id)
            .await
            .map_err(ReminderError::StoreUnavailable)?
            .ok_or(ReminderError::NotFound {
                entity: "User",
                id: association.user_id,
            })?;

        let plant = self
            .repo
            .plant_by_id(association.plant_id)
            .await
            .map_err(ReminderError::StoreUnavailable)?
            .ok_or(ReminderError::NotFound {
                entity: "Plant",
                id: association.plant_id,
            })?;

        let message_id = self.notifier.notify(&user.phone, &plant.name).await?;
        tracing::info!(
            target = module_path!(),
            message_id = %message_id,
            "Sent watering reminder"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;

    use super::*;
    use crate::repository::models::care::WaterClass;
    use crate::repository::MockRepository;
    use crate::sms::{MockSmsTransport, SmsError};
    use crate::test_fixtures::association::association;
    use crate::test_fixtures::delivery::delivery;
    use crate::test_fixtures::plant::plant;
    use crate::test_fixtures::user::user;
    use crate::test_fixtures::{instant, reference_timezone};

    const FROM_NUMBER: &str = "+16505550100";
    const FERN_REMINDER: &str = "It's time to water your Fern! - Planty🌱";

    // Monday noon in Los Angeles.
    const MONDAY_NOON: &str = "2024-01-01T20:00:00Z";

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn build_job(repo: MockRepository, transport: MockSmsTransport) -> ReminderJob {
        let repo: Repo = Box::leak(Box::new(repo));
        let notifier = Notifier::new(Box::new(transport), FROM_NUMBER.into());

        ReminderJob::new(repo, notifier, ScheduleEvaluator::new(reference_timezone()))
    }

    fn expect_lookups(repo: &mut MockRepository) {
        repo.expect_user_by_id()
            .returning(|id| Ok(Some(user(id, format!("555000000{}", id)))));
        repo.expect_plant_by_id()
            .returning(|id| Ok(Some(plant(id, "Fern".into(), WaterClass::Daily))));
    }

    #[tokio::test]
    async fn test_due_and_not_due() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users().times(1).returning(|| {
            Ok(vec![
                association(1, 1, 1, Some(WaterClass::Daily)),
                association(2, 2, 2, Some(WaterClass::TwiceWeekly)),
            ])
        });
        repo.expect_reminder_sent()
            .with(eq(1), eq(monday()))
            .times(1)
            .returning(|_, _| Ok(false));
        repo.expect_user_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(Some(user(id, "5551234567".into()))));
        repo.expect_plant_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(Some(plant(id, "Fern".into(), WaterClass::Daily))));
        repo.expect_record_reminder()
            .with(eq(1), eq(monday()), eq("SM1".to_string()))
            .times(1)
            .returning(|id, sent_on, message_id| Ok(delivery(id, sent_on, message_id)));

        let mut transport = MockSmsTransport::new();
        transport
            .expect_send()
            .with(
                eq("+15551234567"),
                eq(FROM_NUMBER),
                eq(FERN_REMINDER),
            )
            .times(1)
            .returning(|_, _, _| Ok("SM1".to_string()));

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                due: 1,
                sent: 1,
                failed: 0,
                skipped: 1,
                already_sent: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_user_does_not_abort() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users()
            .returning(|| Ok(vec![association(1, 42, 1, Some(WaterClass::Daily))]));
        repo.expect_reminder_sent().returning(|_, _| Ok(false));
        repo.expect_user_by_id()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_plant_by_id().times(0);
        repo.expect_record_reminder().times(0);

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                due: 1,
                sent: 0,
                failed: 1,
                skipped: 0,
                already_sent: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_missing_plant_is_a_failure() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users()
            .returning(|| Ok(vec![association(1, 1, 7, Some(WaterClass::Daily))]));
        repo.expect_reminder_sent().returning(|_, _| Ok(false));
        repo.expect_user_by_id()
            .returning(|id| Ok(Some(user(id, "5551234567".into()))));
        repo.expect_plant_by_id()
            .with(eq(7))
            .times(1)
            .returning(|_| Ok(None));

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.sent, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_continues_sweep() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users().returning(|| {
            Ok(vec![
                association(1, 1, 1, Some(WaterClass::Daily)),
                association(2, 2, 2, Some(WaterClass::Daily)),
            ])
        });
        repo.expect_reminder_sent().returning(|_, _| Ok(false));
        expect_lookups(&mut repo);
        repo.expect_record_reminder()
            .with(eq(2), eq(monday()), eq("SM2".to_string()))
            .times(1)
            .returning(|id, sent_on, message_id| Ok(delivery(id, sent_on, message_id)));

        let mut transport = MockSmsTransport::new();
        transport
            .expect_send()
            .with(eq("+15550000001"), eq(FROM_NUMBER), eq(FERN_REMINDER))
            .times(1)
            .returning(|_, _, _| {
                Err(SmsError::Rejected {
                    status: 400,
                    code: Some(21211),
                    message: "Invalid 'To' Phone Number".into(),
                })
            });
        transport
            .expect_send()
            .with(eq("+15550000002"), eq(FROM_NUMBER), eq(FERN_REMINDER))
            .times(1)
            .returning(|_, _, _| Ok("SM2".to_string()));

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                due: 2,
                sent: 1,
                failed: 1,
                skipped: 0,
                already_sent: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_already_sent_today() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users()
            .returning(|| Ok(vec![association(1, 1, 1, Some(WaterClass::Daily))]));
        repo.expect_reminder_sent()
            .with(eq(1), eq(monday()))
            .returning(|_, _| Ok(true));
        repo.expect_user_by_id().times(0);
        repo.expect_record_reminder().times(0);

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(summary.due, 1);
        assert_eq!(summary.already_sent, 1);
        assert_eq!(summary.sent, 0);
    }

    #[tokio::test]
    async fn test_empty_watering_days_skip_lookups() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users().returning(|| {
            Ok(vec![
                association(1, 1, 1, Some(WaterClass::WhenDry)),
                association(2, 2, 2, Some(WaterClass::WhenDry)),
            ])
        });
        repo.expect_reminder_sent().times(0);
        repo.expect_user_by_id().times(0);
        repo.expect_plant_by_id().times(0);

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                skipped: 2,
                ..RunSummary::default()
            }
        );
    }

    #[tokio::test]
    async fn test_dangling_plant_is_a_failure() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users().returning(|| {
            Ok(vec![
                association(1, 1, 999, None),
                association(2, 2, 2, Some(WaterClass::WhenDry)),
            ])
        });
        repo.expect_reminder_sent().times(0);
        repo.expect_user_by_id().times(0);
        repo.expect_plant_by_id().times(0);

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let job = build_job(repo, transport);
        let outcome = job
            .process(
                &association(1, 1, 999, None),
                instant(MONDAY_NOON),
                monday(),
            )
            .await;
        let summary = job.run(instant(MONDAY_NOON)).await.unwrap();

        assert!(matches!(
            outcome,
            Outcome::Failed(ReminderError::NotFound {
                entity: "Plant",
                id: 999
            })
        ));
        assert_eq!(
            summary,
            RunSummary {
                due: 1,
                failed: 1,
                skipped: 1,
                ..RunSummary::default()
            }
        );
    }

    #[tokio::test]
    async fn test_history_errors_still_send() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users()
            .returning(|| Ok(vec![association(1, 1, 1, Some(WaterClass::Daily))]));
        repo.expect_reminder_sent()
            .returning(|_, _| Err(anyhow!("database is locked")));
        expect_lookups(&mut repo);
        repo.expect_record_reminder()
            .times(1)
            .returning(|_, _, _| Err(anyhow!("database is locked")));

        let mut transport = MockSmsTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_, _, _| Ok("SM1".to_string()));

        let summary = build_job(repo, transport)
            .run(instant(MONDAY_NOON))
            .await
            .unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_store_unavailable_aborts() {
        let mut repo = MockRepository::new();
        repo.expect_plant_users()
            .returning(|| Err(anyhow!("unable to open database file")));

        let mut transport = MockSmsTransport::new();
        transport.expect_send().times(0);

        let result = build_job(repo, transport).run(instant(MONDAY_NOON)).await;

        assert!(matches!(result, Err(ReminderError::StoreUnavailable(_))));
    }

    #[test]
    fn test_summary_record() {
        let outcomes = vec![
            Outcome::Skipped,
            Outcome::Sent,
            Outcome::AlreadySent,
            Outcome::Failed(ReminderError::NotFound {
                entity: "User",
                id: 3,
            }),
        ];

        let summary = outcomes.iter().fold(RunSummary::default(), |mut summary, outcome| {
            summary.record(outcome);
            summary
        });

        assert_eq!(summary.due, summary.sent + summary.failed + summary.already_sent);
        assert_eq!(summary.skipped, 1);
    }
}
