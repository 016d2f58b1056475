use remindu_domain::{Reminder, ReminderStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: ID,
    pub title: String,
    pub description: Option<String>,
    pub timezone: String,
    pub date_time: String,
    pub status: ReminderStatus,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            title: reminder.title,
            description: reminder.description,
            timezone: reminder.timezone,
            date_time: reminder.date_time,
            status: reminder.status,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}
