//! Univan server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use univan_api::{middleware::AppState, router as api_router};
use univan_common::Config;
use univan_core::{
    BoardingPointService, DriverService, PollService, StopResolver, StudentService, TripService,
    UserService, VoteService,
};
use univan_db::repositories::{
    BoardingPointRepository, DriverRepository, PollRepository, StudentRepository, TripRepository,
    UserRepository, VoteRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env in development
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "univan=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting univan server...");

    // Load configuration
    let config = Config::load()?;
    let timezone = config.service.timezone();

    // Connect to database
    let db = univan_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    univan_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let student_repo = StudentRepository::new(Arc::clone(&db));
    let driver_repo = DriverRepository::new(Arc::clone(&db));
    let boarding_point_repo = BoardingPointRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let trip_repo = TripRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(
        user_repo.clone(),
        student_repo.clone(),
        driver_repo.clone(),
    );
    let student_service = StudentService::new(
        student_repo.clone(),
        user_repo.clone(),
        boarding_point_repo.clone(),
        user_service.clone(),
    );
    let driver_service =
        DriverService::new(driver_repo.clone(), user_repo.clone(), user_service.clone());
    let boarding_point_service = BoardingPointService::new(boarding_point_repo.clone());

    let resolver = StopResolver::new(
        vote_repo.clone(),
        student_repo.clone(),
        boarding_point_repo.clone(),
    );
    let poll_service = PollService::new(poll_repo.clone(), resolver.clone(), timezone);
    let vote_service = VoteService::new(vote_repo, poll_repo.clone(), timezone);
    let trip_service = TripService::new(Arc::clone(&db), trip_repo, poll_repo, resolver);

    // Create app state
    let state = AppState {
        user_service,
        student_service,
        driver_service,
        boarding_point_service,
        poll_service,
        vote_service,
        trip_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            univan_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
