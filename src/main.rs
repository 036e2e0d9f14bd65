use std::{process, sync::Arc};

use drivefitt::{
    application::{error::AppError, services::Services},
    cache::{CacheConfig, CacheService, spawn_sweeper},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminToken, HttpState},
        telemetry,
    },
};
use sqlx::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_and_migrate(&settings).await?;
    let repositories = Arc::new(PostgresRepositories::new(pool));

    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(CacheService::in_memory(&cache_config));
    let sweeper = spawn_sweeper(Arc::clone(&cache), cache_config.sweep_interval);

    let admin = AdminToken::from_settings(&settings.admin).map_err(AppError::from)?;
    if !admin.is_configured() {
        warn!(
            target = "drivefitt::startup",
            "admin.token_sha256 is not set; every admin request will be rejected"
        );
    }

    let services = Services::new(repositories.clone(), cache);
    let state = HttpState::new(services, repositories, admin);

    let result = serve_http(&settings, state).await;

    sweeper.abort();
    let _ = sweeper.await;

    result
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    connect_and_migrate(&settings).await?;
    info!(target = "drivefitt::migrate", "migrations applied");
    Ok(())
}

async fn connect_and_migrate(settings: &config::Settings) -> Result<PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, &settings.database)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    Ok(pool)
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "drivefitt::startup",
        addr = %settings.server.addr,
        "listening"
    );

    let grace = settings.server.graceful_shutdown;
    let (signal_tx, mut signal_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(
        async move {
            shutdown_signal().await;
            let _ = signal_tx.send(true);
        },
    );

    // In-flight requests get `grace` to finish once the signal arrives.
    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            let _ = signal_rx.wait_for(|stopped| *stopped).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "drivefitt::shutdown",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "drivefitt::shutdown", "shutdown signal received");
}
