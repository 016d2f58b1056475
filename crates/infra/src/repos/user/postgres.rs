use super::IUserRepo;
use remindu_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    email: String,
    whatsapp_number: Option<String>,
    whatsapp_verified: bool,
    prefered_timezone: Option<String>,
    created: i64,
    updated: i64,
}

impl From<UserRaw> for User {
    fn from(e: UserRaw) -> Self {
        Self {
            id: e.user_uid.into(),
            name: e.name,
            email: e.email,
            whatsapp_number: e.whatsapp_number,
            whatsapp_verified: e.whatsapp_verified,
            prefered_timezone: e.prefered_timezone,
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (user_uid, name, email, whatsapp_number, whatsapp_verified, prefered_timezone, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.whatsapp_number)
        .bind(user.whatsapp_verified)
        .bind(&user.prefered_timezone)
        .bind(user.created)
        .bind(user.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                whatsapp_number = $4,
                whatsapp_verified = $5,
                prefered_timezone = $6,
                updated = $7
            WHERE user_uid = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.whatsapp_number)
        .bind(user.whatsapp_verified)
        .bind(&user.prefered_timezone)
        .bind(user.updated)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to fetch user: {:?}", e);
            None
        })
        .map(|user| user.into())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to fetch user by email: {:?}", e);
            None
        })
        .map(|user| user.into())
    }

    async fn find_by_whatsapp_number(&self, whatsapp_number: &str) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE whatsapp_number = $1
            "#,
        )
        .bind(whatsapp_number)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to fetch user by whatsapp number: {:?}", e);
            None
        })
        .map(|user| user.into())
    }
}
