//! Authentication service for the Galleria application
//!
//! Registration and login over the credential store, Argon2id password
//! hashing, and HS256 bearer tokens.

pub mod jwt;
pub mod password;
pub mod service;
pub mod validation;

// Re-export for convenience
pub use jwt::{Claims, JwtConfig, JwtService};
pub use password::{PasswordConfig, PasswordManager};
pub use service::{AuthService, LoginOutcome, LoginRequest, RegisterRequest};
