//! Data model shared by the store layer and the services

pub mod comment;
pub mod image;
pub mod user;

// Re-export for convenience
pub use comment::{Comment, CommentView, NewComment};
pub use image::{Image, NewImage, Post};
pub use user::{NewUser, Profile, User};
