//! Galleria service: publishing, the feed, comments and likes

use std::sync::Arc;

use common::error::{DatabaseError, Resource, ServiceError, ServiceResult};
use common::models::{Comment, CommentView, Image, NewComment, NewImage, Post};
use common::repositories::{CommentStore, ImageStore, UserStore, constraints};
use common::validation::{Validate, ValidationErrors, validate_http_url, validate_length};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewCommentRequest, NewImageRequest};

/// Number of posts per feed page
pub const PAGE_SIZE: i64 = 20;

impl Validate for NewImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("title", validate_length(&self.title, 1, 255, "Title"));
        if let Some(author) = &self.author {
            errors.check("author", validate_length(author, 0, 50, "Author"));
        }
        if let Some(description) = &self.description {
            errors.check(
                "description",
                validate_length(description, 0, 500, "Description"),
            );
        }
        errors.check("url", validate_http_url(&self.url));
        errors.into_result()
    }
}

impl Validate for NewCommentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("content", validate_length(&self.content, 0, 500, "Content"));
        errors.into_result()
    }
}

#[derive(Clone)]
pub struct GalleriaService {
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageStore>,
    comments: Arc<dyn CommentStore>,
}

impl GalleriaService {
    pub fn new(
        users: Arc<dyn UserStore>,
        images: Arc<dyn ImageStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            users,
            images,
            comments,
        }
    }

    /// Publish an image owned by `user_id`
    pub async fn send_image(&self, user_id: Uuid, request: &NewImageRequest) -> ServiceResult<Uuid> {
        request.validate()?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(Resource::User));
        }

        let new_image = NewImage {
            user_id,
            title: request.title.clone(),
            author: request.author.clone(),
            description: request.description.clone(),
            url: request.url.clone(),
        };

        match self.images.create(&new_image).await {
            Ok(image_id) => {
                info!(%image_id, %user_id, "Image published");
                Ok(image_id)
            }
            // owner deleted after the check
            Err(DatabaseError::ForeignKeyViolation { .. }) => {
                Err(ServiceError::NotFound(Resource::User))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// One feed page, ordered by ascending like count
    ///
    /// Pages are 1-based; page 0 is treated as page 1.
    pub async fn display(&self, page: u32) -> ServiceResult<Vec<Post>> {
        let page = i64::from(page.max(1));
        let offset = (page - 1) * PAGE_SIZE;
        Ok(self.images.find_page(PAGE_SIZE, offset).await?)
    }

    pub async fn get_image(&self, image_id: Uuid) -> ServiceResult<Image> {
        self.images
            .find_by_id(image_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Image))
    }

    /// Comment on an image
    ///
    /// The image is checked before the user, so a request where both are
    /// missing reports the image.
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        image_id: Uuid,
        request: &NewCommentRequest,
    ) -> ServiceResult<Uuid> {
        request.validate()?;

        if self.images.find_by_id(image_id).await?.is_none() {
            return Err(ServiceError::NotFound(Resource::Image));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(Resource::User));
        }

        let new_comment = NewComment {
            user_id,
            image_id,
            content: request.content.clone(),
        };

        match self.comments.create(&new_comment).await {
            Ok(comment_id) => {
                info!(%comment_id, %image_id, %user_id, "Comment added");
                Ok(comment_id)
            }
            Err(e @ DatabaseError::ForeignKeyViolation { .. }) => {
                if e.constraint() == Some(constraints::COMMENTS_IMAGE_ID_FKEY) {
                    Err(ServiceError::NotFound(Resource::Image))
                } else {
                    Err(ServiceError::NotFound(Resource::User))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Comments on an existing image; an image without comments yields an
    /// empty list
    pub async fn get_comments(&self, image_id: Uuid) -> ServiceResult<Vec<CommentView>> {
        if self.images.find_by_id(image_id).await?.is_none() {
            return Err(ServiceError::NotFound(Resource::Image));
        }
        Ok(self.comments.find_by_image_id(image_id).await?)
    }

    pub async fn get_comment(&self, comment_id: Uuid) -> ServiceResult<Comment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Comment))
    }

    pub async fn like_image(&self, image_id: Uuid) -> ServiceResult<i64> {
        self.adjust_image_likes(image_id, 1).await
    }

    pub async fn unlike_image(&self, image_id: Uuid) -> ServiceResult<i64> {
        self.adjust_image_likes(image_id, -1).await
    }

    pub async fn like_comment(&self, comment_id: Uuid) -> ServiceResult<i64> {
        self.adjust_comment_likes(comment_id, 1).await
    }

    pub async fn unlike_comment(&self, comment_id: Uuid) -> ServiceResult<i64> {
        self.adjust_comment_likes(comment_id, -1).await
    }

    async fn adjust_image_likes(&self, image_id: Uuid, delta: i64) -> ServiceResult<i64> {
        self.images
            .adjust_likes(image_id, delta)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Image))
    }

    async fn adjust_comment_likes(&self, comment_id: Uuid, delta: i64) -> ServiceResult<i64> {
        self.comments
            .adjust_likes(comment_id, delta)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Comment))
    }
}
