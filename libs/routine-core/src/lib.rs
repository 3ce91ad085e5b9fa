//! Core routine-planning library used by the backend.
//!
//! Provides:
//! - `HH:MM` wall-clock arithmetic
//! - Prompt building and model-reply parsing for routine generation
//! - The deterministic fallback routine
//! - Replan partition/merge
//! - Streak and completion analytics

pub mod analytics;
pub mod blocks;
pub mod clock;
pub mod error;
pub mod fallback;
pub mod prompt;
pub mod replan;
pub mod response;
pub mod types;

pub use analytics::{
    compute_analytics, AnalyticsSummary, CheckinSnapshot, HabitSnapshot, HabitStats, PlanSnapshot,
};
pub use blocks::{completion_rate, toggle_block};
pub use clock::ClockTime;
pub use error::{ResponseError, TimeError};
pub use fallback::fallback_routine;
pub use prompt::build_prompt;
pub use replan::{partition_blocks, replan_blocks, Partition, ReplanOutcome};
pub use response::parse_blocks;
pub use types::{Category, Priority, ReplanContext, Role, RoutineBlock, RoutineRequest};
