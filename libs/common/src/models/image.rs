//! Image model and the feed read-model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Image entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New image creation payload
#[derive(Debug, Clone)]
pub struct NewImage {
    pub user_id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

/// An image joined with its owner's display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub image: Image,
    pub username: String,
    pub avatar_url: Option<String>,
}
