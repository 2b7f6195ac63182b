//! Input validation for registration and login

use common::validation::{Validate, ValidationErrors, validate_email, validate_length};

use crate::service::{LoginRequest, RegisterRequest};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }
    validate_length(username, 3, 32, "Username")
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    validate_length(password, 8, 128, "Password")
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check("username", validate_username(&self.username));
        errors.check("password", validate_password(&self.password));
        errors.into_result()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email(&self.email));
        errors.check("password", validate_password(&self.password));
        errors.into_result()
    }
}
