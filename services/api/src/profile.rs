//! Profile service: read and patch the caller's own account

use std::sync::Arc;

use common::error::{ServiceError, ServiceResult};
use common::models::{Image, Profile};
use common::repositories::{ImageStore, UserStore};
use common::validation::{Validate, ValidationErrors, validate_http_url, validate_length};
use tracing::info;
use uuid::Uuid;

use crate::models::UpdateProfileRequest;

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(username) = &self.username {
            errors.check("username", validate_length(username, 3, 32, "Username"));
        }
        if let Some(bio) = &self.bio {
            errors.check("bio", validate_length(bio, 0, 500, "Bio"));
        }
        if let Some(avatar_url) = &self.avatar_url {
            errors.check("avatarUrl", validate_http_url(avatar_url));
        }
        errors.into_result()
    }
}

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
    images: Arc<dyn ImageStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>, images: Arc<dyn ImageStore>) -> Self {
        Self { users, images }
    }

    /// The caller's profile. An identifier that no longer resolves is
    /// reported as `InvalidCredentials`.
    pub async fn get_profile(&self, user_id: Uuid) -> ServiceResult<Profile> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(Profile::from)
            .ok_or(ServiceError::InvalidCredentials)
    }

    pub async fn get_profile_images(&self, user_id: Uuid) -> ServiceResult<Vec<Image>> {
        Ok(self.images.find_by_user_id(user_id).await?)
    }

    /// Overwrite only the fields present in `request`
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: &UpdateProfileRequest,
    ) -> ServiceResult<()> {
        request.validate()?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if let Some(username) = &request.username {
            user.username = username.clone();
        }
        if let Some(bio) = &request.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(avatar_url) = &request.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }

        if !self.users.update(&user).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        info!(%user_id, "Profile updated");
        Ok(())
    }
}
