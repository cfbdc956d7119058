//! Friend Code Bot - Main Entry Point
//!
//! Serves the interaction endpoint the command dispatcher posts to.

use anyhow::Result;
use tracing::{info, warn};

use fc_bot::{api, config, db, friendcode::Stores};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fc_bot=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Friend Code Bot");

    if !config.verifies_signatures() {
        warn!("INTERACTION_SECRET not set, interaction signatures are not verified");
    }

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Initialize rate limiter (optional)
    let rate_limiter = {
        use fc_bot::ratelimit::{RateLimitConfig, RateLimiter};

        let rl_config = RateLimitConfig::from_env();
        if rl_config.enabled {
            match db::create_redis_client(&config.redis_url).await {
                Ok(redis) => {
                    let mut limiter = RateLimiter::new(redis, rl_config);
                    match limiter.init().await {
                        Ok(()) => {
                            info!("Rate limiter initialized");
                            Some(limiter)
                        }
                        Err(e) => {
                            warn!("Rate limiter initialization failed: {}. Cooldowns disabled.", e);
                            None
                        }
                    }
                }
                Err(e) => {
                    warn!("Redis connection failed: {}. Cooldowns disabled.", e);
                    None
                }
            }
        } else {
            info!("Rate limiting disabled by configuration");
            None
        }
    };

    // Build application state
    let state = api::AppState::new(Stores::postgres(db_pool), config.clone(), rate_limiter);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Bot listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Bot shutdown complete");

    Ok(())
}
