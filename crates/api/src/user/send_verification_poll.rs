use crate::error::ReminduError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindu_api_structs::send_verification_poll::*;
use remindu_domain::ID;
use remindu_infra::ReminduContext;

pub async fn send_verification_poll_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ReminduContext>,
) -> Result<HttpResponse, ReminduError> {
    let usecase = SendVerificationPollUseCase {
        user_id: path_params.into_inner().user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| {
            HttpResponse::Ok().json(APIResponse {
                message: "Verification poll sent to the user's WhatsApp number".into(),
            })
        })
        .map_err(ReminduError::from)
}

#[derive(Debug)]
pub struct SendVerificationPollUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
    NoWhatsappNumber,
    AlreadyVerified,
    PollRejected,
    GatewayUnavailable(String),
}

impl From<UseCaseError> for ReminduError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::NoWhatsappNumber => {
                Self::BadClientData("The user has no WhatsApp number to verify".into())
            }
            UseCaseError::AlreadyVerified => {
                Self::Conflict("The user's WhatsApp number is already verified".into())
            }
            UseCaseError::PollRejected => Self::BadClientData(
                "Verification poll failed to send, please try again".into(),
            ),
            UseCaseError::GatewayUnavailable(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendVerificationPollUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SendVerificationPoll";

    async fn execute(&mut self, ctx: &ReminduContext) -> Result<Self::Response, Self::Error> {
        let user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
        };
        if user.whatsapp_verified {
            return Err(UseCaseError::AlreadyVerified);
        }
        let whatsapp_number = match user.delivery_number() {
            Some(number) => number.to_string(),
            None => return Err(UseCaseError::NoWhatsappNumber),
        };

        let accepted = ctx
            .notification_gateway
            .send_verification_poll(&whatsapp_number)
            .await
            .map_err(|e| UseCaseError::GatewayUnavailable(e.to_string()))?;
        if !accepted {
            return Err(UseCaseError::PollRejected);
        }

        Ok(())
    }
}
