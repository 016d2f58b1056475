use super::IReminderRepo;
use remindu_domain::{Reminder, ReminderStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    title: String,
    description: Option<String>,
    timezone: String,
    date_time: String,
    status: String,
    created: i64,
    updated: i64,
}

impl From<ReminderRaw> for Reminder {
    fn from(e: ReminderRaw) -> Self {
        Self {
            id: e.reminder_uid.into(),
            user_id: e.user_uid.into(),
            title: e.title,
            description: e.description,
            timezone: e.timezone,
            date_time: e.date_time,
            status: e.status.parse().unwrap_or_default(),
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, user_uid, title, description, timezone, date_time, status, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.user_id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(&reminder.timezone)
        .bind(&reminder.date_time)
        .bind(reminder.status.as_str())
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET title = $2,
                description = $3,
                timezone = $4,
                date_time = $5,
                status = $6,
                updated = $7
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.description)
        .bind(&reminder.timezone)
        .bind(&reminder.date_time)
        .bind(reminder.status.as_str())
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to fetch reminder: {:?}", e);
            None
        })
        .map(|reminder| reminder.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE user_uid = $1
            ORDER BY created
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        {
            Ok(reminders) => reminders.into_iter().map(|r| r.into()).collect(),
            Err(e) => {
                error!("Unable to fetch reminders for user: {:?}", e);
                vec![]
            }
        }
    }

    async fn find_by_status(&self, status: ReminderStatus) -> Vec<Reminder> {
        match sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE status = $1
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        {
            Ok(reminders) => reminders.into_iter().map(|r| r.into()).collect(),
            Err(e) => {
                error!("Unable to fetch reminders with status {}: {:?}", status, e);
                vec![]
            }
        }
    }

    async fn update_status(
        &self,
        reminder_id: &ID,
        status: ReminderStatus,
        updated: i64,
    ) -> anyhow::Result<()> {
        // The status guard keeps terminal statuses terminal
        sqlx::query(
            r#"
            UPDATE reminders
            SET status = $2,
                updated = $3
            WHERE reminder_uid = $1 AND status = 'pending'
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(status.as_str())
        .bind(updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to delete reminder: {:?}", e);
            None
        })
        .map(|reminder| reminder.into())
    }
}
