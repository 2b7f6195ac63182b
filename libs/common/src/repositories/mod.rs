//! Store contracts and their PostgreSQL implementations
//!
//! Services depend on the traits only, so the same service code runs against
//! PostgreSQL in production and the in-memory store in tests.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseResult;
use crate::models::{Comment, CommentView, Image, NewComment, NewImage, NewUser, Post, User};

pub mod comments;
pub mod images;
pub mod users;

pub use comments::CommentRepository;
pub use images::ImageRepository;
pub use users::UserRepository;

/// Constraint names declared by the schema migrations
pub mod constraints {
    pub const USERS_EMAIL_KEY: &str = "users_email_key";
    pub const IMAGES_USER_ID_FKEY: &str = "images_user_id_fkey";
    pub const COMMENTS_USER_ID_FKEY: &str = "comments_user_id_fkey";
    pub const COMMENTS_IMAGE_ID_FKEY: &str = "comments_image_id_fkey";
}

/// Persists user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return its identifier.
    /// Fails with `UniqueViolation` when the email is taken.
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<Uuid>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    /// Overwrite username, bio and avatar URL. Returns `false` if no row matched.
    async fn update(&self, user: &User) -> DatabaseResult<bool>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> DatabaseResult<bool>;
}

/// Persists images and serves the feed
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Insert an image and return its identifier.
    /// Fails with `ForeignKeyViolation` when the owner does not exist.
    async fn create(&self, new_image: &NewImage) -> DatabaseResult<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Image>>;

    /// All images owned by a user, newest first
    async fn find_by_user_id(&self, user_id: Uuid) -> DatabaseResult<Vec<Image>>;

    /// One page of posts ordered by ascending like count
    async fn find_page(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<Post>>;

    /// Add `delta` to the like counter, clamped at zero.
    /// Returns the new count, or `None` if the image does not exist.
    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>>;
}

/// Persists comments
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Insert a comment and return its identifier.
    /// Fails with `ForeignKeyViolation` naming the missing user or image.
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Uuid>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>>;

    /// Comments on an image, oldest first, with commenter display fields
    async fn find_by_image_id(&self, image_id: Uuid) -> DatabaseResult<Vec<CommentView>>;

    /// Same semantics as [`ImageStore::adjust_likes`]
    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>>;
}

/// The three stores, shared by every service
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub images: Arc<dyn ImageStore>,
    pub comments: Arc<dyn CommentStore>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            images: Arc::new(ImageRepository::new(pool.clone())),
            comments: Arc::new(CommentRepository::new(pool)),
        }
    }
}
