use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::create_reminder::*;
use remindu_domain::{date, Reminder, ReminderStatus, ID};
use remindu_infra::ReminduContext;

pub async fn create_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id: path_params.into_inner().user_id,
        title: body.title,
        description: body.description,
        timezone: body.timezone,
        date_time: body.date_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub timezone: String,
    pub date_time: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    InvalidTimezone(String),
    InvalidDateTime(String),
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::BadClientData("Title cannot be empty".into()),
            UseCaseError::InvalidTimezone(tz) => Self::BadClientData(format!(
                "Timezone: {} is not a valid IANA zone name",
                tz
            )),
            UseCaseError::InvalidDateTime(dt) => Self::BadClientData(format!(
                "Date-time: {} is not on an accepted format",
                dt
            )),
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if date::parse_timezone(&self.timezone).is_err() {
            return Err(UseCaseError::InvalidTimezone(self.timezone.clone()));
        }
        if date::parse_wall_clock(&self.date_time).is_err() {
            return Err(UseCaseError::InvalidDateTime(self.date_time.clone()));
        }
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let reminder = Reminder {
            id: Default::default(),
            user_id: self.user_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            timezone: self.timezone.clone(),
            date_time: self.date_time.clone(),
            status: ReminderStatus::Pending,
            created: now,
            updated: now,
        };
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
