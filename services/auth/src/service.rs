//! Registration and login

use std::sync::Arc;

use common::error::{DatabaseError, Resource, ServiceError, ServiceResult};
use common::models::NewUser;
use common::repositories::UserStore;
use common::validation::Validate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::jwt::{Claims, JwtService};
use crate::password::PasswordManager;

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub token: String,
    pub claims: Claims,
}

/// Auth service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: PasswordManager,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, passwords: PasswordManager, jwt: JwtService) -> Self {
        Self {
            users,
            passwords,
            jwt,
        }
    }

    /// Create a new account and return its identifier
    ///
    /// The email is looked up before the password is hashed, so a duplicate
    /// never costs a hash. A concurrent registration that slips past the
    /// lookup is caught by the unique key on insert.
    pub async fn register(&self, request: &RegisterRequest) -> ServiceResult<Uuid> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::AlreadyExists(Resource::User));
        }

        let password_hash = self
            .passwords
            .hash(&request.password)
            .await
            .map_err(ServiceError::Internal)?;

        let new_user = NewUser {
            username: request.username.clone(),
            email: request.email.clone(),
            password_hash,
        };

        match self.users.create(&new_user).await {
            Ok(user_id) => {
                info!(%user_id, "User registered");
                Ok(user_id)
            }
            Err(DatabaseError::UniqueViolation { .. }) => {
                Err(ServiceError::AlreadyExists(Resource::User))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and issue a bearer token
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, request: &LoginRequest) -> ServiceResult<LoginOutcome> {
        request.validate()?;

        let Some(user) = self.users.find_by_email(&request.email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(&request.password, &user.password_hash)
            .await
            .map_err(ServiceError::Internal)?;
        if !valid {
            return Err(ServiceError::InvalidCredentials);
        }

        let issued = self
            .jwt
            .generate_token(user.id)
            .map_err(ServiceError::Internal)?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user_id: user.id,
            token: issued.token,
            claims: issued.claims,
        })
    }

    /// Resolve a bearer token to the user it was issued for
    pub fn verify_token(&self, token: &str) -> ServiceResult<Uuid> {
        self.jwt
            .validate_token(token)
            .map(|claims| claims.sub)
            .map_err(|e| {
                warn!("Rejected bearer token: {}", e);
                ServiceError::InvalidCredentials
            })
    }

    /// Lifetime of issued tokens in seconds
    pub fn token_expiry(&self) -> u64 {
        self.jwt.expiry_seconds()
    }
}
