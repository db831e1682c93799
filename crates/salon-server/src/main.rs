//! SEA Salon - booking backend for the SEA Salon web application

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{AdminConfig, Config, LoggingConfig};
use salon_api::{AppState, create_router};
use salon_auth::{JwtManager, PasswordManager};
use salon_db::{Database, NewUser, UserRole};

/// SEA Salon - booking backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "SALON_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "SALON_PORT")]
    port: Option<u16>,

    /// Session token signing key
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }

    // Initialize logging
    init_logging(&config.logging);

    info!("Starting SEA Salon v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Metrics recorder
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    // Create data directory
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Initialize credential hashing and session tokens
    let passwords = PasswordManager::new(config.auth.password.hash_cost())?;
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.validated_session_ttl_secs(),
    ));

    // Create the configured admin if their email is not registered yet
    if let Some(admin) = &config.admin {
        seed_admin(&db, &passwords, admin).await?;
    }

    // Create application state
    let state = AppState::new(db, jwt, passwords);

    // Create router
    let app = create_router(state, Some(Arc::new(metrics_handle))).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn seed_admin(db: &Database, passwords: &PasswordManager, admin: &AdminConfig) -> Result<()> {
    if db.get_user_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    info!("Creating admin user {}", admin.email);
    let password_hash = passwords.hash_blocking(admin.password.clone()).await?;
    db.insert_user(NewUser {
        full_name: admin.full_name.clone(),
        email: admin.email.clone(),
        phone_number: admin.phone_number.clone(),
        password_hash,
        role: UserRole::Admin,
    })
    .await
    .with_context(|| format!("Failed to create admin user {}", admin.email))?;

    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
