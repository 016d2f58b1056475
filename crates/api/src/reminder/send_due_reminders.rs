use crate::shared::usecase::UseCase;
use remindu_domain::{date, ReminderStatus};
use remindu_infra::{ReminderNotification, ReminduContext};
use std::collections::HashSet;
use tracing::{info, warn};

/// One sweep of the send reminders job: select every pending reminder
/// whose instant has passed, submit the whole batch to the gateway in a
/// single call and apply the per-reminder delivery results.
///
/// Skipped reminders (unparsable date or timezone, missing user or
/// WhatsApp number) stay pending and are picked up again on the next
/// sweep. A reminder the gateway never answers for also stays pending,
/// which can mean a duplicate WhatsApp message on the following sweep.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

/// What happened during one sweep
#[derive(Debug, Default, PartialEq)]
pub struct SweepReport {
    /// Number of reminders submitted to the gateway
    pub dispatched: usize,
    pub completed: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// The batched gateway call failed as a whole. No reminder in the
    /// batch changed status.
    GatewayUnavailable(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = SweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let pending = ctx.repos.reminders.find_by_status(ReminderStatus::Pending).await;

        let mut batch = Vec::new();
        for reminder in pending {
            let instant = match date::to_utc_instant(&reminder.date_time, &reminder.timezone) {
                Ok(instant) => instant,
                Err(e) => {
                    warn!("Skipping reminder {} this sweep: {}", reminder.id, e);
                    continue;
                }
            };
            if instant.timestamp_millis() > now {
                continue;
            }

            let user = match ctx.repos.users.find(&reminder.user_id).await {
                Some(user) => user,
                None => {
                    warn!(
                        "Skipping reminder {} this sweep: owning user {} was not found",
                        reminder.id, reminder.user_id
                    );
                    continue;
                }
            };
            let whatsapp_number = match user.delivery_number() {
                Some(number) => number.to_string(),
                // No delivery address yet, stays pending until the user
                // registers a number
                None => continue,
            };

            batch.push(ReminderNotification {
                reminder_id: reminder.id.clone(),
                whatsapp_number,
                title: reminder.title.clone(),
                description: reminder.description.clone().unwrap_or_default(),
            });
        }

        if batch.is_empty() {
            return Ok(SweepReport::default());
        }

        let results = ctx
            .notification_gateway
            .send_reminders(&batch)
            .await
            .map_err(|e| UseCaseError::GatewayUnavailable(e.to_string()))?;

        let submitted = batch
            .iter()
            .map(|notification| notification.reminder_id.clone())
            .collect::<HashSet<_>>();

        let mut report = SweepReport {
            dispatched: batch.len(),
            ..Default::default()
        };
        for result in results {
            // Results are matched on reminder id, the gateway makes no
            // ordering promises
            if !submitted.contains(&result.reminder_id) {
                warn!(
                    "Gateway reported a result for unknown reminder {}, ignoring it",
                    result.reminder_id
                );
                continue;
            }
            let status = if result.success {
                ReminderStatus::Completed
            } else {
                info!(
                    "Gateway could not deliver reminder {}: {}",
                    result.reminder_id, result.message
                );
                ReminderStatus::Failed
            };
            if let Err(e) = ctx
                .repos
                .reminders
                .update_status(&result.reminder_id, status, now)
                .await
            {
                warn!(
                    "Unable to update status of reminder {}: {:?}",
                    result.reminder_id, e
                );
                continue;
            }
            match status {
                ReminderStatus::Completed => report.completed += 1,
                ReminderStatus::Failed => report.failed += 1,
                ReminderStatus::Pending => {}
            }
        }

        info!(
            "Send reminders sweep done: dispatched: {}, completed: {}, failed: {}",
            report.dispatched, report.completed, report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use remindu_domain::{Reminder, User, ID};
    use remindu_infra::{ISys, InMemoryNotificationGateway, NotificationResult};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    struct TestContext {
        ctx: ReminduContext,
        gateway: Arc<InMemoryNotificationGateway>,
    }

    fn utc_millis(date_time: &str) -> i64 {
        date::to_utc_instant(date_time, "UTC")
            .expect("Valid UTC date-time")
            .timestamp_millis()
    }

    /// Context with inmemory repos and gateway, frozen at the given UTC
    /// wall-clock time
    fn setup(now: &str) -> TestContext {
        let mut ctx = ReminduContext::create_inmemory();
        let gateway = Arc::new(InMemoryNotificationGateway::new());
        ctx.notification_gateway = gateway.clone();
        ctx.sys = Arc::new(StaticTimeSys(utc_millis(now)));
        TestContext { ctx, gateway }
    }

    async fn user_with_number(ctx: &ReminduContext, number: &str) -> User {
        let mut user = User::new("Jay", &format!("{}@example.com", ID::new()));
        user.whatsapp_number = Some(number.into());
        user.whatsapp_verified = true;
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    fn reminder_factory(user_id: &ID, date_time: &str, timezone: &str) -> Reminder {
        Reminder {
            id: Default::default(),
            user_id: user_id.clone(),
            title: "Pay rent".into(),
            description: Some("Before noon!".into()),
            timezone: timezone.into(),
            date_time: date_time.into(),
            status: ReminderStatus::Pending,
            created: 0,
            updated: 0,
        }
    }

    async fn status_of(ctx: &ReminduContext, reminder_id: &ID) -> ReminderStatus {
        ctx.repos.reminders.find(reminder_id).await.unwrap().status
    }

    #[actix_web::test]
    async fn dispatches_a_due_reminder_exactly_once_per_sweep() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                dispatched: 1,
                completed: 1,
                failed: 0
            }
        );
        let batches = gateway.sent_batches.lock().unwrap().clone();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 1);
        assert_eq!(batches[0][0].reminder_id, reminder.id);
        assert_eq!(batches[0][0].whatsapp_number, "+4712345678");
        assert_eq!(batches[0][0].title, "Pay rent");
        assert_eq!(batches[0][0].description, "Before noon!");
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn a_reminder_due_exactly_now_fires_this_sweep() {
        let TestContext { ctx, gateway } = setup("2024-06-01T09:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(gateway.sent_batches.lock().unwrap().len(), 1);
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn does_not_dispatch_future_reminders() {
        let TestContext { ctx, gateway } = setup("2024-06-01T08:59:59");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, SweepReport::default());
        assert!(gateway.sent_batches.lock().unwrap().is_empty());
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Pending);
    }

    #[actix_web::test]
    async fn kolkata_morning_reminder_fires_at_half_past_three_utc() {
        // 09:00 IST is 03:30 UTC
        let TestContext { mut ctx, .. } = setup("2024-06-01T03:29:59");
        let user = user_with_number(&ctx, "+911234567890").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "Asia/Kolkata");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Pending);

        ctx.sys = Arc::new(StaticTimeSys(utc_millis("2024-06-01T03:30:01")));
        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn never_touches_terminal_reminders() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;

        let mut completed = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        completed.status = ReminderStatus::Completed;
        let mut failed = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        failed.status = ReminderStatus::Failed;
        ctx.repos.reminders.insert(&completed).await.unwrap();
        ctx.repos.reminders.insert(&failed).await.unwrap();

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, SweepReport::default());
        assert!(gateway.sent_batches.lock().unwrap().is_empty());
        assert_eq!(status_of(&ctx, &completed.id).await, ReminderStatus::Completed);
        assert_eq!(status_of(&ctx, &failed.id).await, ReminderStatus::Failed);
    }

    #[actix_web::test]
    async fn applies_mixed_gateway_results_per_reminder() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user_a = user_with_number(&ctx, "+4711111111").await;
        let user_b = user_with_number(&ctx, "+4722222222").await;
        let reminder_a = reminder_factory(&user_a.id, "2024-06-01T09:00:00", "UTC");
        let reminder_b = reminder_factory(&user_b.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder_a).await.unwrap();
        ctx.repos.reminders.insert(&reminder_b).await.unwrap();

        gateway
            .rejected_numbers
            .lock()
            .unwrap()
            .push("+4722222222".into());

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                dispatched: 2,
                completed: 1,
                failed: 1
            }
        );
        assert_eq!(status_of(&ctx, &reminder_a.id).await, ReminderStatus::Completed);
        assert_eq!(status_of(&ctx, &reminder_b.id).await, ReminderStatus::Failed);
    }

    #[actix_web::test]
    async fn ignores_gateway_results_for_unknown_reminders() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        // The gateway answers for a reminder that was never submitted
        gateway.extra_results.lock().unwrap().push(NotificationResult {
            success: false,
            message: "Unable to deliver reminder".into(),
            reminder_id: ID::new(),
        });

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        // The stray entry counts for nothing, the real one still applies
        assert_eq!(
            report,
            SweepReport {
                dispatched: 1,
                completed: 1,
                failed: 0
            }
        );
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn leaves_whole_batch_pending_when_the_gateway_is_down() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        gateway.broken.store(true, Ordering::SeqCst);
        assert!(execute(SendDueRemindersUseCase, &ctx).await.is_err());
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Pending);

        // The next sweep picks the reminder up again
        gateway.broken.store(false, Ordering::SeqCst);
        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn completed_reminders_are_not_sent_again_on_the_next_sweep() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(report, SweepReport::default());
        assert_eq!(gateway.sent_batches.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn reminders_without_a_whatsapp_number_wait_for_one() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let mut user = User::new("Jay", "jay@example.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let reminder = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert!(gateway.sent_batches.lock().unwrap().is_empty());
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Pending);

        user.whatsapp_number = Some("+4712345678".into());
        ctx.repos.users.save(&user).await.unwrap();

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(status_of(&ctx, &reminder.id).await, ReminderStatus::Completed);
    }

    #[actix_web::test]
    async fn one_bad_reminder_does_not_abort_the_sweep() {
        let TestContext { ctx, gateway } = setup("2024-06-01T10:00:00");
        let user = user_with_number(&ctx, "+4712345678").await;

        let bad_zone = reminder_factory(&user.id, "2024-06-01T09:00:00", "Asia/Atlantis");
        let bad_date = reminder_factory(&user.id, "yesterday", "UTC");
        let orphan = reminder_factory(&ID::new(), "2024-06-01T09:00:00", "UTC");
        let good = reminder_factory(&user.id, "2024-06-01T09:00:00", "UTC");
        for reminder in [&bad_zone, &bad_date, &orphan, &good] {
            ctx.repos.reminders.insert(reminder).await.unwrap();
        }

        let report = execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                dispatched: 1,
                completed: 1,
                failed: 0
            }
        );
        let batches = gateway.sent_batches.lock().unwrap().clone();
        assert_eq!(batches[0][0].reminder_id, good.id);
        for skipped in [&bad_zone, &bad_date, &orphan] {
            assert_eq!(status_of(&ctx, &skipped.id).await, ReminderStatus::Pending);
        }
    }
}
