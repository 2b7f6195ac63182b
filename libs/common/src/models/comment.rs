//! Comment model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_id: Uuid,
    pub content: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New comment creation payload
#[derive(Debug, Clone)]
pub struct NewComment {
    pub user_id: Uuid,
    pub image_id: Uuid,
    pub content: String,
}

/// A comment joined with the commenter's display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
    pub avatar_url: Option<String>,
}
