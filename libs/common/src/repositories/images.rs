//! Image repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::ImageStore;
use crate::error::DatabaseResult;
use crate::models::{Image, NewImage, Post};

/// Image repository
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    /// Create a new image repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn image_from_row(row: &PgRow) -> Result<Image, sqlx::Error> {
    Ok(Image {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        likes: row.try_get("likes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        image: image_from_row(row)?,
        username: row.try_get("username")?,
        avatar_url: row.try_get("avatar_url")?,
    })
}

#[async_trait]
impl ImageStore for ImageRepository {
    async fn create(&self, new_image: &NewImage) -> DatabaseResult<Uuid> {
        info!("Creating image for user: {}", new_image.user_id);

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO images (user_id, title, author, description, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(new_image.user_id)
        .bind(&new_image.title)
        .bind(&new_image.author)
        .bind(&new_image.description)
        .bind(&new_image.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Image>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, author, description, url, likes, created_at, updated_at
            FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(image_from_row).transpose()?)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DatabaseResult<Vec<Image>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, author, description, url, likes, created_at, updated_at
            FROM images
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let images = rows
            .iter()
            .map(image_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(images)
    }

    async fn find_page(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<Post>> {
        // Ascending by likes; created_at and id keep pages stable across ties.
        let rows = sqlx::query(
            r#"
            SELECT images.id, images.user_id, images.title, images.author,
                   images.description, images.url, images.likes,
                   images.created_at, images.updated_at,
                   users.username, users.avatar_url
            FROM images
            JOIN users ON images.user_id = users.id
            ORDER BY images.likes ASC, images.created_at ASC, images.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let posts = rows
            .iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>> {
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE images
            SET likes = GREATEST(likes + $2, 0)
            WHERE id = $1
            RETURNING likes
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(likes)
    }
}
