pub mod date;
mod reminder;
mod shared;
mod user;

pub use reminder::{Reminder, ReminderStatus};
pub use shared::entity::{Entity, ID};
pub use user::User;
