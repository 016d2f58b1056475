use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::create_user::*;
use remindu_domain::User;
use remindu_infra::ReminduContext;

pub async fn create_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let body = body.0;
    let usecase = CreateUserUseCase {
        name: body.name,
        email: body.email,
        whatsapp_number: body.whatsapp_number,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub name: String,
    pub email: String,
    pub whatsapp_number: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyName,
    EmptyEmail,
    UserAlreadyExists(String),
    StorageError,
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyName => Self::BadClientData("Name cannot be empty".into()),
            UseCaseError::EmptyEmail => Self::BadClientData("Email cannot be empty".into()),
            UseCaseError::UserAlreadyExists(email) => Self::Conflict(format!(
                "A user with email: {}, already exists.",
                email
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        if self.name.trim().is_empty() {
            return Err(UseCaseError::EmptyName);
        }
        if self.email.trim().is_empty() {
            return Err(UseCaseError::EmptyEmail);
        }
        if ctx.repos.users.find_by_email(&self.email).await.is_some() {
            return Err(UseCaseError::UserAlreadyExists(self.email.clone()));
        }

        let now = ctx.sys.get_timestamp_millis();
        let mut user = User::new(&self.name, &self.email);
        user.whatsapp_number = self.whatsapp_number.clone();
        user.created = now;
        user.updated = now;
        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindu_infra::ISys;
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    #[actix_web::test]
    async fn stamps_created_and_updated() {
        let mut ctx = ReminduContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(1717200000000));

        let usecase = CreateUserUseCase {
            name: "Jay".into(),
            email: "jay@example.com".into(),
            whatsapp_number: None,
        };
        let user = execute(usecase, &ctx).await.unwrap();

        assert_eq!(user.created, 1717200000000);
        assert_eq!(user.updated, 1717200000000);
    }

    #[actix_web::test]
    async fn rejects_duplicate_emails() {
        let ctx = ReminduContext::create_inmemory();

        let usecase = CreateUserUseCase {
            name: "Jay".into(),
            email: "jay@example.com".into(),
            whatsapp_number: None,
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = CreateUserUseCase {
            name: "Jay again".into(),
            email: "jay@example.com".into(),
            whatsapp_number: None,
        };
        assert_eq!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::UserAlreadyExists("jay@example.com".into())
        );
    }
}
