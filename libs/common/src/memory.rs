//! In-memory store for tests
//!
//! Implements the same contracts as the PostgreSQL repositories, including
//! the unique and foreign key constraints (reported under the schema's
//! constraint names), so services behave identically against either backend.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Comment, CommentView, Image, NewComment, NewImage, NewUser, Post, User};
use crate::repositories::{
    CommentStore, ImageStore, Repositories, UserStore, constraints,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    images: Vec<Image>,
    comments: Vec<Comment>,
    unavailable: bool,
}

impl Inner {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

/// Shared in-memory backing for all three stores
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositories backed by this store
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.clone()),
            images: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
        }
    }

    /// Make every subsequent call fail as if the database were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock_unchecked().unavailable = unavailable;
    }

    pub fn user_count(&self) -> usize {
        self.lock_unchecked().users.len()
    }

    pub fn image_count(&self) -> usize {
        self.lock_unchecked().images.len()
    }

    pub fn comment_count(&self) -> usize {
        self.lock_unchecked().comments.len()
    }

    fn lock_unchecked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> DatabaseResult<MutexGuard<'_, Inner>> {
        let guard = self.lock_unchecked();
        if guard.unavailable {
            return Err(DatabaseError::Connection(sqlx::Error::PoolTimedOut));
        }
        Ok(guard)
    }
}

fn foreign_key(constraint: &str) -> DatabaseError {
    DatabaseError::ForeignKeyViolation {
        constraint: Some(constraint.to_string()),
    }
}

fn adjust(likes: &mut i64, delta: i64) -> i64 {
    *likes = (*likes + delta).max(0);
    *likes
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<Uuid> {
        let mut inner = self.lock()?;
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation {
                constraint: Some(constraints::USERS_EMAIL_KEY.to_string()),
            });
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        inner.users.push(User {
            id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            bio: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let inner = self.lock()?;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let inner = self.lock()?;
        Ok(inner.user(id).cloned())
    }

    async fn update(&self, user: &User) -> DatabaseResult<bool> {
        let mut inner = self.lock()?;
        match inner.users.iter_mut().find(|u| u.id == user.id) {
            Some(stored) => {
                stored.username = user.username.clone();
                stored.bio = user.bio.clone();
                stored.avatar_url = user.avatar_url.clone();
                stored.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(!self.lock_unchecked().unavailable)
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn create(&self, new_image: &NewImage) -> DatabaseResult<Uuid> {
        let mut inner = self.lock()?;
        if inner.user(new_image.user_id).is_none() {
            return Err(foreign_key(constraints::IMAGES_USER_ID_FKEY));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        inner.images.push(Image {
            id,
            user_id: new_image.user_id,
            title: new_image.title.clone(),
            author: new_image.author.clone(),
            description: new_image.description.clone(),
            url: new_image.url.clone(),
            likes: 0,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Image>> {
        let inner = self.lock()?;
        Ok(inner.images.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> DatabaseResult<Vec<Image>> {
        let inner = self.lock()?;
        Ok(inner
            .images
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_page(&self, limit: i64, offset: i64) -> DatabaseResult<Vec<Post>> {
        let inner = self.lock()?;
        // Stable sort: ties keep insertion order.
        let mut images: Vec<&Image> = inner.images.iter().collect();
        images.sort_by_key(|i| i.likes);

        let posts = images
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|image| {
                inner.user(image.user_id).map(|owner| Post {
                    image: image.clone(),
                    username: owner.username.clone(),
                    avatar_url: owner.avatar_url.clone(),
                })
            })
            .collect();
        Ok(posts)
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>> {
        let mut inner = self.lock()?;
        Ok(inner
            .images
            .iter_mut()
            .find(|i| i.id == id)
            .map(|image| adjust(&mut image.likes, delta)))
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, new_comment: &NewComment) -> DatabaseResult<Uuid> {
        let mut inner = self.lock()?;
        if inner.user(new_comment.user_id).is_none() {
            return Err(foreign_key(constraints::COMMENTS_USER_ID_FKEY));
        }
        if !inner.images.iter().any(|i| i.id == new_comment.image_id) {
            return Err(foreign_key(constraints::COMMENTS_IMAGE_ID_FKEY));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        inner.comments.push(Comment {
            id,
            user_id: new_comment.user_id,
            image_id: new_comment.image_id,
            content: new_comment.content.clone(),
            likes: 0,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Comment>> {
        let inner = self.lock()?;
        Ok(inner.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_image_id(&self, image_id: Uuid) -> DatabaseResult<Vec<CommentView>> {
        let inner = self.lock()?;
        Ok(inner
            .comments
            .iter()
            .filter(|c| c.image_id == image_id)
            .filter_map(|comment| {
                inner.user(comment.user_id).map(|author| CommentView {
                    comment: comment.clone(),
                    username: author.username.clone(),
                    avatar_url: author.avatar_url.clone(),
                })
            })
            .collect())
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> DatabaseResult<Option<i64>> {
        let mut inner = self.lock()?;
        Ok(inner
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .map(|comment| adjust(&mut comment.likes, delta)))
    }
}
