use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::receive_verification_poll::*;
use remindu_domain::User;
use remindu_infra::ReminduContext;

/// Public callback the gateway invokes once a user has answered the
/// verification poll on WhatsApp
pub async fn receive_verification_poll_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let usecase = ReceiveVerificationPollUseCase {
        user_phone_number: body.0.user_phone_number,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct ReceiveVerificationPollUseCase {
    pub user_phone_number: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UnknownNumber(String),
    StorageError,
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UnknownNumber(number) => Self::NotFound(format!(
                "No user with WhatsApp number: {}, was found.",
                number
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReceiveVerificationPollUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "ReceiveVerificationPoll";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        let mut user = match ctx
            .repos
            .users
            .find_by_whatsapp_number(&self.user_phone_number)
            .await
        {
            Some(user) => user,
            None => {
                return Err(UseCaseError::UnknownNumber(self.user_phone_number.clone()))
            }
        };
        // Receiving the callback twice is fine
        if user.whatsapp_verified {
            return Ok(user);
        }

        user.whatsapp_verified = true;
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
    async fn verifies_the_matching_user_idempotently() {
        let ctx = ReminduContext::create_inmemory();
        let mut user = User::new("Jay", "jay@example.com");
        user.whatsapp_number = Some("+4712345678".into());
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = ReceiveVerificationPollUseCase {
            user_phone_number: "+4712345678".into(),
        };
        let verified = execute(usecase, &ctx).await.unwrap();
        assert!(verified.whatsapp_verified);

        // Duplicate callback does not error
        let usecase = ReceiveVerificationPollUseCase {
            user_phone_number: "+4712345678".into(),
        };
        let verified = execute(usecase, &ctx).await.unwrap();
        assert!(verified.whatsapp_verified);
    }

    #[actix_web::test]
    async fn rejects_unknown_numbers() {
        let ctx = ReminduContext::create_inmemory();

        let usecase = ReceiveVerificationPollUseCase {
            user_phone_number: "+4700000000".into(),
        };
        assert_eq!(
            execute(usecase, &ctx).await.unwrap_err(),
            UseCaseError::UnknownNumber("+4700000000".into())
        );
    }
}
