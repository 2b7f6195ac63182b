use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{AppState, ServerConfig, create_router};
use auth::{AuthService, JwtConfig, JwtService, PasswordConfig, PasswordManager};
use common::database::{self, DatabaseConfig, init_pool, run_migrations};
use common::repositories::Repositories;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Galleria service");

    let server_config = ServerConfig::from_env();

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if server_config.run_migrations {
        run_migrations(&pool).await?;
    }

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    let password_manager = PasswordManager::new(&PasswordConfig::from_env())?;

    let repositories = Repositories::postgres(pool);
    let auth_service = AuthService::new(repositories.users.clone(), password_manager, jwt_service);
    let app_state = AppState::new(repositories, auth_service);

    // Start the web server
    let app = create_router(app_state, server_config.request_timeout());

    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Galleria service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Galleria service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
