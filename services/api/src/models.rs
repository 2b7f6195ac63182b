//! API models for request and response payloads

use auth::Claims;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Request for publishing an image
#[derive(Debug, Clone, Deserialize)]
pub struct NewImageRequest {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

/// Request for commenting on an image
#[derive(Debug, Clone, Deserialize)]
pub struct NewCommentRequest {
    pub content: String,
}

/// Feed pagination query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u32,
}

/// Response for registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
}

/// Response for login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub claims: Claims,
}

/// Response for image creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreatedResponse {
    pub image_id: Uuid,
}

/// Response for comment creation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreatedResponse {
    pub comment_id: Uuid,
}

/// Response for like and unlike
#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: i64,
}
