//! Common library for the Galleria application
//!
//! This crate provides the relational store layer shared by the services:
//! database connectivity and migrations, the data model, the store contracts
//! with their PostgreSQL implementations, the service error taxonomy and
//! field validation helpers.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, run_migrations};
//! use common::repositories::Repositories;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let repositories = Repositories::postgres(pool);
//!     println!("Database health check: {}", repositories.users.health_check().await?);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod models;
pub mod repositories;
pub mod validation;
