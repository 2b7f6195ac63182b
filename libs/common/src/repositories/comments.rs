//! Comment repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use super::CommentStore;
use crate::error::DatabaseResult;
use crate::models::{Comment, CommentView, NewComment};

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn comment_from_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        image_id: row.try_get("image_id")?,
        content: row.try_get("content")?,
        likes: row.try_get("likes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Uuid> {
        info!(
            "Creating comment by user {} on image {}",
            new_comment.user_id, new_comment.image_id
        );

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO comments (user_id, image_id, content)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_comment.user_id)
        .bind(new_comment.image_id)
        .bind(&new_comment.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, image_id, content, likes, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(comment_from_row).transpose()?)
    }

    async fn find_by_image_id(&self, image_id: Uuid) -> DatabaseResult<Vec<CommentView>> {
        let rows = sqlx::query(
            r#"
            SELECT comments.id, comments.user_id, comments.image_id, comments.content,
                   comments.likes, comments.created_at, comments.updated_at,
                   users.username, users.avatar_url
            FROM comments
            JOIN users ON comments.user_id = users.id
            WHERE comments.image_id = $1
            ORDER BY comments.created_at ASC, comments.id ASC
            "#,
        )
        .bind(image_id)
        .fetch_all(&self.pool)
        .await?;

        let comments = rows
            .iter()
            .map(|row| {
                Ok(CommentView {
                    comment: comment_from_row(row)?,
                    username: row.try_get("username")?,
                    avatar_url: row.try_get("avatar_url")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(comments)
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>> {
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE comments
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
