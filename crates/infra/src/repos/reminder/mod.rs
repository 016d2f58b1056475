mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remindu_domain::{Reminder, ReminderStatus, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder>;
    async fn find_by_status(&self, status: ReminderStatus) -> Vec<Reminder>;
    /// Moves a reminder out of `Pending`. A reminder that already has a
    /// terminal status is left untouched.
    async fn update_status(
        &self,
        reminder_id: &ID,
        status: ReminderStatus,
        updated: i64,
    ) -> anyhow::Result<()>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
