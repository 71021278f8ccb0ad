use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info};

use acct_api::{create_app, telemetry::init_tracing, AppState};
use acct_core::services::{
    AuthService, AuthServiceConfig, CredentialsConfig, OutboxRelay, OutboxRelayConfig,
    PasswordHasher, TokenService, UserService,
};
use acct_infra::{DatabasePool, MySqlOutboxRepository, MySqlUserRepository, RedisStreamsPublisher};
use acct_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting account service");
    config.validate().context("invalid configuration")?;

    // Step 1: Connect the backing stores; the service cannot run without them
    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to database")?;
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;
    let healthy = database
        .health_check()
        .await
        .context("database health check failed")?;
    anyhow::ensure!(healthy, "database health check returned an unexpected value");
    info!(stats = %database.get_statistics(), "Database ready");

    let publisher = RedisStreamsPublisher::connect(&config.events)
        .await
        .context("failed to connect to event transport")?;
    let healthy = publisher
        .health_check()
        .await
        .context("event transport health check failed")?;
    anyhow::ensure!(healthy, "event transport did not answer PING");
    info!("Event transport ready");

    // Step 2: Build repositories and services
    let pool = database.get_pool().clone();
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let outbox_repository = Arc::new(MySqlOutboxRepository::new(pool));

    let credentials = CredentialsConfig::from(&config.auth);
    let token_service = Arc::new(TokenService::new(&credentials));
    let password_hasher = PasswordHasher::new(credentials.bcrypt_cost);

    let relay = Arc::new(OutboxRelay::new(
        outbox_repository,
        Arc::new(publisher),
        OutboxRelayConfig::from(&config.events),
    ));

    let auth_service = AuthService::new(
        user_repository.clone(),
        password_hasher,
        token_service.clone(),
        AuthServiceConfig::from(&config.auth),
    );
    let user_service = UserService::new(
        user_repository,
        relay.clone(),
        password_hasher,
        token_service.clone(),
    );
    let state = web::Data::new(AppState::new(auth_service, user_service, token_service));

    // Step 3: Start the outbox relay
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay_task = actix_web::rt::spawn(async move { relay.run(shutdown_rx).await });

    // Step 4: Serve until interrupted
    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await;

    // Step 5: Stop background work and release connections
    let _ = shutdown_tx.send(true);
    if let Err(e) = relay_task.await {
        error!(error = %e, "Outbox relay task failed");
    }
    database.close().await;
    info!("Account service stopped");

    result.context("server error")
}
