use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use matchcenter_backend::run;
use matchcenter_backend::config::settings::{get_config, get_jwt_settings};
use matchcenter_backend::db::{InMemoryMatchStore, MatchStore, PgMatchStore};
use matchcenter_backend::services::{LiveMatchService, RedisBroadcastPublisher, RedisService};
use matchcenter_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "matchcenter-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    // JWT
    let jwt_settings = get_jwt_settings(&config);
    // Redis
    let redis_service = match RedisService::new(&config.redis) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to create Redis client: {}", e);
            eprintln!("Redis is required for match broadcasts. Please ensure Redis is running.");
            std::process::exit(1);
        }
    };
    let publisher = Arc::new(RedisBroadcastPublisher::new(redis_service.client.clone()));

    let store: Arc<dyn MatchStore> = if config.application.in_memory_store {
        tracing::warn!("Using the in-memory match store; data is lost on restart");
        Arc::new(InMemoryMatchStore::new())
    } else {
        // Only try to establish connection when actually used
        let connection_pool = PgPoolOptions::new()
            .max_connections(32)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect_lazy(
                config.database.connection_string().expose_secret()
            )
            .expect("Failed to create Postgres connection pool");
        Arc::new(PgMatchStore::new(connection_pool))
    };

    let live_match_service = LiveMatchService::new(store, publisher, &config.match_center);
    tracing::info!(
        "⚽ Match center tracking '{}', broadcasting to '{}'",
        config.match_center.tracked_club_name,
        config.match_center.broadcast_topic
    );

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;

    run(
        listener,
        live_match_service,
        jwt_settings,
    )?.await
}
