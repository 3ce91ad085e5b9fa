//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Stub generative models so no network access is needed
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use uuid::Uuid;

use routina_backend::db::Database;
use routina_backend::models::User;
use routina_backend::services::gemini::{ModelError, RoutineModel};
use routina_backend::services::planner::Planner;
use routina_backend::{router, AppState};

/// Model that always answers with the same text.
pub struct CannedModel(pub String);

#[async_trait]
impl RoutineModel for CannedModel {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ModelError> {
        Ok(self.0.clone())
    }
}

/// Model that is never reachable.
pub struct UnreachableModel;

#[async_trait]
impl RoutineModel for UnreachableModel {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Network("connection refused".to_string()))
    }
}

/// Test context containing database connection and test router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a test context whose model returns [`fixtures::MODEL_REPLY`].
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        Self::with_model(Arc::new(CannedModel(fixtures::MODEL_REPLY.to_string()))).await
    }

    /// Create a test context whose model always fails.
    pub async fn with_unreachable_model() -> Self {
        Self::with_model(Arc::new(UnreachableModel)).await
    }

    pub async fn with_model(model: Arc<dyn RoutineModel>) -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let state = AppState {
            db: db.clone(),
            planner: Arc::new(Planner::new(model, Duration::from_secs(5))),
        };

        Self {
            db,
            app: router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let user = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Get user by token.
    pub async fn get_user_by_token(&self, token: &str) -> Option<User> {
        self.db.get_user_by_token(token).await.ok().flatten()
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Delete in order due to foreign keys
        for table in ["checkins", "habits", "plans", "preferences"] {
            let _ = sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", table))
                .bind(user_id)
                .execute(self.db.pool())
                .await;
        }

        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
