//! User repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::UserStore;
use crate::database;
use crate::error::DatabaseResult;
use crate::models::{NewUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        bio: row.try_get("bio")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<Uuid> {
        info!("Creating new user: {}", new_user.username);

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, bio, avatar_url, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, bio, avatar_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update(&self, user: &User) -> DatabaseResult<bool> {
        info!("Updating user: {}", user.id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, bio = $2, avatar_url = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(&user.username)
        .bind(&user.bio)
        .bind(&user.avatar_url)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        database::health_check(&self.pool).await
    }
}
