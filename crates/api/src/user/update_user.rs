use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::update_user::*;
use remindu_domain::{date, User, ID};
use remindu_infra::ReminduContext;

pub async fn update_user_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let body = body.0;
    let usecase = UpdateUserUseCase {
        user_id: path_params.into_inner().user_id,
        name: body.name,
        whatsapp_number: body.whatsapp_number,
        prefered_timezone: body.prefered_timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct UpdateUserUseCase {
    pub user_id: ID,
    pub name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub prefered_timezone: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTimezone(String),
    StorageError,
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::InvalidTimezone(tz) => Self::BadClientData(format!(
                "Timezone: {} is not a valid IANA zone name",
                tz
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateUser";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        let mut user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::NotFound(self.user_id.clone())),
        };

        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(timezone) = &self.prefered_timezone {
            if date::parse_timezone(timezone).is_err() {
                return Err(UseCaseError::InvalidTimezone(timezone.clone()));
            }
            user.prefered_timezone = Some(timezone.clone());
        }
        if let Some(whatsapp_number) = &self.whatsapp_number {
            // A new number has to be verified again
            if user.whatsapp_number.as_ref() != Some(whatsapp_number) {
                user.whatsapp_verified = false;
            }
            user.whatsapp_number = Some(whatsapp_number.clone());
        }
        user.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn changing_the_whatsapp_number_resets_verification() {
        let ctx = ReminduContext::create_inmemory();
        let mut user = User::new("Jay", "jay@example.com");
        user.whatsapp_number = Some("+4711111111".into());
        user.whatsapp_verified = true;
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = UpdateUserUseCase {
            user_id: user.id.clone(),
            name: None,
            whatsapp_number: Some("+4722222222".into()),
            prefered_timezone: None,
        };
        let updated = execute(usecase, &ctx).await.unwrap();

        assert_eq!(updated.whatsapp_number.as_deref(), Some("+4722222222"));
        assert!(!updated.whatsapp_verified);
        assert!(updated.updated > user.updated);

        // Re-submitting the same number keeps the verification
        let usecase = UpdateUserUseCase {
            user_id: user.id.clone(),
            name: Some("Jay B".into()),
            whatsapp_number: Some("+4722222222".into()),
            prefered_timezone: None,
        };
        let updated = execute(usecase, &ctx).await.unwrap();
        assert!(!updated.whatsapp_verified);
        assert_eq!(updated.name, "Jay B");
    }
}
