pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::gemini::GeminiClient;
use crate::services::planner::Planner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub planner: Arc<Planner>,
}

/// Build the API router with all routes.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/user/status", get(routes::user::status))
        // Onboarding routes
        .route(
            "/api/onboarding",
            post(routes::onboarding::save).get(routes::onboarding::get),
        )
        .route("/api/preferences", put(routes::onboarding::update))
        // Plan routes
        .route("/api/plan/generate", post(routes::plan::generate))
        .route("/api/plan/replan", put(routes::plan::replan))
        .route(
            "/api/plan/:date",
            get(routes::plan::get).put(routes::plan::update),
        )
        .route(
            "/api/plan/:date/blocks/:block_id/toggle",
            post(routes::plan::toggle),
        )
        .route("/api/ai/status", get(routes::plan::model_status))
        // Habit routes
        .route(
            "/api/habit",
            get(routes::habit::list)
                .post(routes::habit::create)
                .delete(routes::habit::delete),
        )
        .route(
            "/api/habit/checkin",
            post(routes::habit::checkin).get(routes::habit::list_checkins),
        )
        // Analytics routes
        .route("/api/analytics", get(routes::analytics::summary))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/user/register", post(routes::user::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    tracing::info!(model = %config.gemini.model, "Initializing model client...");
    let model = GeminiClient::new(&config.gemini)?;
    let planner = Planner::new(Arc::new(model), config.gemini.timeout);

    let state = AppState {
        db: Arc::new(db),
        planner: Arc::new(planner),
    };

    let app = router(state);
    let addr = config.bind_addr();

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
