use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::update_reminder::*;
use remindu_domain::{date, Reminder, ID};
use remindu_infra::ReminduContext;

pub async fn update_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let body = body.0;
    let usecase = UpdateReminderUseCase {
        reminder_id: path_params.into_inner().reminder_id,
        title: body.title,
        description: body.description,
        timezone: body.timezone,
        date_time: body.date_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub date_time: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    ReminderAlreadyResolved(ID),
    EmptyTitle,
    InvalidTimezone(String),
    InvalidDateTime(String),
    StorageError,
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::ReminderAlreadyResolved(reminder_id) => Self::Conflict(format!(
                "The reminder with id: {}, has already been delivered or has failed.",
                reminder_id
            )),
            UseCaseError::EmptyTitle => Self::BadClientData("Title cannot be empty".into()),
            UseCaseError::InvalidTimezone(tz) => Self::BadClientData(format!(
                "Timezone: {} is not a valid IANA zone name",
                tz
            )),
            UseCaseError::InvalidDateTime(dt) => Self::BadClientData(format!(
                "Date-time: {} is not on an accepted format",
                dt
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };
        // Terminal reminders are immutable
        if !reminder.is_pending() {
            return Err(UseCaseError::ReminderAlreadyResolved(reminder.id));
        }

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            reminder.title = title.clone();
        }
        if let Some(description) = &self.description {
            reminder.description = Some(description.clone());
        }
        if let Some(timezone) = &self.timezone {
            if date::parse_timezone(timezone).is_err() {
                return Err(UseCaseError::InvalidTimezone(timezone.clone()));
            }
            reminder.timezone = timezone.clone();
        }
        if let Some(date_time) = &self.date_time {
            if date::parse_wall_clock(date_time).is_err() {
                return Err(UseCaseError::InvalidDateTime(date_time.clone()));
            }
            reminder.date_time = date_time.clone();
        }
        reminder.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindu_domain::{ReminderStatus, User};

    async fn setup_reminder(ctx: &ReminduContext, status: ReminderStatus) -> Reminder {
        let user = User::new("Jay", "jay@example.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let reminder = Reminder {
            id: Default::default(),
            user_id: user.id,
            title: "Pay rent".into(),
            description: None,
            timezone: "UTC".into(),
            date_time: "2024-06-01T09:00:00".into(),
            status,
            created: 0,
            updated: 0,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    #[actix_web::test]
    async fn updates_a_pending_reminder() {
        let ctx = ReminduContext::create_inmemory();
        let reminder = setup_reminder(&ctx, ReminderStatus::Pending).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            title: Some("Pay rent!!".into()),
            description: Some("Second floor mailbox".into()),
            timezone: Some("Europe/Oslo".into()),
            date_time: Some("2024-07-01T09:00:00".into()),
        };
        let updated = execute(usecase, &ctx).await.unwrap();

        assert_eq!(updated.title, "Pay rent!!");
        assert_eq!(updated.timezone, "Europe/Oslo");
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap(),
            updated
        );
    }

    #[actix_web::test]
    async fn rejects_updates_of_resolved_reminders() {
        let ctx = ReminduContext::create_inmemory();
        let reminder = setup_reminder(&ctx, ReminderStatus::Completed).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            title: Some("Too late".into()),
            description: None,
            timezone: None,
            date_time: None,
        };

        assert_eq!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::ReminderAlreadyResolved(reminder.id)
        );
    }
}
