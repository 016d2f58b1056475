mod create_reminder;
mod delete_reminder;
mod get_reminders;
mod send_due_reminders;
mod update_reminder;

use actix_web::web;
pub use send_due_reminders::SendDueRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Create a reminder for a user
    cfg.route(
        "/user/{user_id}/reminder",
        web::post().to(create_reminder::create_reminder_controller),
    );
    // List all reminders of a user
    cfg.route(
        "/user/{user_id}/reminder",
        web::get().to(get_reminders::get_reminders_controller),
    );
    // Update a reminder
    cfg.route(
        "/reminder/{reminder_id}",
        web::put().to(update_reminder::update_reminder_controller),
    );
    // Delete a reminder
    cfg.route(
        "/reminder/{reminder_id}",
        web::delete().to(delete_reminder::delete_reminder_controller),
    );
}
