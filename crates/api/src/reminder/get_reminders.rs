use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::get_reminders::*;
use remindu_domain::{Reminder, ID};
use remindu_infra::ReminduContext;

pub async fn get_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let usecase = GetRemindersUseCase {
        user_id: path_params.into_inner().user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }

        Ok(ctx.repos.reminders.find_by_user(&self.user_id).await)
    }
}
