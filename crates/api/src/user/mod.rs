mod create_user;
mod receive_verification_poll;
mod send_verification_poll;
mod update_user;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Register a new user
    cfg.route("/user", web::post().to(create_user::create_user_controller));
    // Update a user's profile
    cfg.route(
        "/user/{user_id}",
        web::put().to(update_user::update_user_controller),
    );
    // Ask the gateway to send a WhatsApp verification poll
    cfg.route(
        "/user/{user_id}/verification",
        web::post().to(send_verification_poll::send_verification_poll_controller),
    );
    // Public callback from the gateway when a poll was answered
    cfg.route(
        "/whatsapp/verification",
        web::post().to(receive_verification_poll::receive_verification_poll_controller),
    );
}
