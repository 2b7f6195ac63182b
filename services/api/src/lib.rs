//! Galleria HTTP API
//!
//! Profile and feed services plus the axum boundary that exposes them
//! together with registration and login from the `auth` crate.

pub mod config;
pub mod error;
pub mod galleria;
pub mod middleware;
pub mod models;
pub mod profile;
pub mod routes;
pub mod state;

// Re-export for convenience
pub use config::ServerConfig;
pub use galleria::GalleriaService;
pub use profile::ProfileService;
pub use routes::create_router;
pub use state::AppState;
