pub mod analytics;
pub mod auth;
pub mod habit;
pub mod onboarding;
pub mod plan;
pub mod user;
