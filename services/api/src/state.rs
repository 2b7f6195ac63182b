//! Application state shared across handlers

use std::sync::Arc;

use auth::AuthService;
use common::repositories::{Repositories, UserStore};

use crate::galleria::GalleriaService;
use crate::profile::ProfileService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub profiles: Arc<ProfileService>,
    pub galleria: Arc<GalleriaService>,
    /// Used by the health endpoint
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Build every service once over the given stores
    pub fn new(repositories: Repositories, auth: AuthService) -> Self {
        let Repositories {
            users,
            images,
            comments,
        } = repositories;

        Self {
            auth: Arc::new(auth),
            profiles: Arc::new(ProfileService::new(users.clone(), images.clone())),
            galleria: Arc::new(GalleriaService::new(users.clone(), images, comments)),
            users,
        }
    }
}
