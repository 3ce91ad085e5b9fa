//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from routine-core
pub use routine_core::{
    AnalyticsSummary, Category, CheckinSnapshot, ClockTime, HabitSnapshot, PlanSnapshot,
    Priority, Role, RoutineBlock, RoutineRequest, TimeError,
};

/// Status given to freshly generated plans.
pub const PLAN_STATUS_ACTIVE: &str = "active";

// === Database Entity Types ===

/// Registered user and their bearer token
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Onboarding preferences, one row per user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPreferences {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: Option<String>,
    pub timezone: Option<String>,
    pub wake_time: Option<String>,
    pub sleep_time: Option<String>,
    pub goals: Vec<String>,
    pub constraints_list: Vec<String>,
    pub focus_areas: Vec<String>,
    pub routine_types: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbPreferences {
    pub const DEFAULT_WAKE_TIME: &'static str = "06:00";
    pub const DEFAULT_SLEEP_TIME: &'static str = "22:00";
    pub const DEFAULT_TIMEZONE: &'static str = "UTC";

    /// Build generator input, filling unset fields with defaults.
    pub fn to_routine_request(&self) -> Result<RoutineRequest, TimeError> {
        let wake_time = self
            .wake_time
            .as_deref()
            .unwrap_or(Self::DEFAULT_WAKE_TIME)
            .parse()?;
        let sleep_time = self
            .sleep_time
            .as_deref()
            .unwrap_or(Self::DEFAULT_SLEEP_TIME)
            .parse()?;

        Ok(RoutineRequest {
            role: self
                .role
                .as_deref()
                .map(Role::from_name)
                .unwrap_or_default(),
            goals: self.goals.clone(),
            constraints: self.constraints_list.clone(),
            focus_areas: self.focus_areas.clone(),
            wake_time,
            sleep_time,
            timezone: self
                .timezone
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_TIMEZONE.to_string()),
            replan: None,
        })
    }
}

/// Validated preference values ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesInput {
    pub role: String,
    pub timezone: String,
    pub wake_time: ClockTime,
    pub sleep_time: ClockTime,
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub focus_areas: Vec<String>,
    pub routine_types: Vec<String>,
}

impl PreferencesInput {
    pub fn from_onboarding(request: OnboardingRequest) -> Result<Self, TimeError> {
        Ok(Self {
            role: Role::from_name(&request.role).as_str().to_string(),
            timezone: request
                .timezone
                .filter(|tz| !tz.trim().is_empty())
                .unwrap_or_else(|| DbPreferences::DEFAULT_TIMEZONE.to_string()),
            wake_time: request.wake_time.parse()?,
            sleep_time: request.sleep_time.parse()?,
            goals: request.goals,
            constraints: request.constraints,
            focus_areas: request.focus_areas,
            routine_types: request.routine_types,
        })
    }

    /// Overlay a partial update on stored preferences.
    pub fn merged(
        current: &DbPreferences,
        update: UpdatePreferencesRequest,
    ) -> Result<Self, TimeError> {
        let request = current.to_routine_request()?;
        let wake_time = match update.wake_time {
            Some(t) => t.parse()?,
            None => request.wake_time,
        };
        let sleep_time = match update.sleep_time {
            Some(t) => t.parse()?,
            None => request.sleep_time,
        };

        Ok(Self {
            role: update
                .role
                .map(|r| Role::from_name(&r))
                .unwrap_or(request.role)
                .as_str()
                .to_string(),
            timezone: update.timezone.unwrap_or(request.timezone),
            wake_time,
            sleep_time,
            goals: update.goals.unwrap_or(request.goals),
            constraints: update.constraints.unwrap_or(request.constraints),
            focus_areas: update.focus_areas.unwrap_or(request.focus_areas),
            routine_types: update
                .routine_types
                .unwrap_or_else(|| current.routine_types.clone()),
        })
    }
}

/// Daily plan; blocks are stored as a JSONB snapshot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub blocks: Json<Vec<RoutineBlock>>,
    pub status: String,
    pub completion_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbPlan {
    /// Convert to the analytics input type
    pub fn to_snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            date: self.date,
            completion_rate: self.completion_rate,
            blocks: self.blocks.0.clone(),
        }
    }
}

/// User-defined recurring habit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHabit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub target_frequency: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbHabit {
    /// Convert to the analytics input type, attaching this habit's checkins
    pub fn to_snapshot(&self, checkins: &[DbCheckin]) -> HabitSnapshot {
        HabitSnapshot {
            id: self.id.to_string(),
            name: self.name.clone(),
            checkins: checkins
                .iter()
                .filter(|c| c.habit_id == self.id)
                .map(DbCheckin::to_snapshot)
                .collect(),
        }
    }
}

/// Per-day habit completion record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCheckin {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCheckin {
    pub fn to_snapshot(&self) -> CheckinSnapshot {
        CheckinSnapshot {
            date: self.date,
            completed: self.completed,
        }
    }
}

// === API Request/Response Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
    /// Whether preferences have been saved; plan generation needs them.
    pub onboarded: bool,
    /// Normalized role from preferences, when onboarded.
    pub role: Option<String>,
}

// Preferences types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub role: String,
    pub timezone: Option<String>,
    pub wake_time: String,
    pub sleep_time: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub routine_types: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub role: Option<String>,
    pub timezone: Option<String>,
    pub wake_time: Option<String>,
    pub sleep_time: Option<String>,
    pub goals: Option<Vec<String>>,
    pub constraints: Option<Vec<String>>,
    pub focus_areas: Option<Vec<String>>,
    pub routine_types: Option<Vec<String>>,
}

/// `{ "data": value | null }` envelope for lookups that may be empty
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Option<T>,
}

// Plan types
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePlanRequest {
    pub blocks: Vec<RoutineBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplanRequest {
    pub date: NaiveDate,
    /// Client wall-clock time; the server clock is used when absent.
    pub current_time: Option<ClockTime>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplanResponse {
    pub plan: DbPlan,
    pub current_time: ClockTime,
    pub retained_count: usize,
    pub generated_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleBlockResponse {
    pub plan: DbPlan,
    pub block_id: String,
    pub completed: bool,
}

// Habit types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub description: Option<String>,
    pub target_frequency: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteHabitQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckinRequest {
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckinQuery {
    pub habit_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Analytics types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
    pub recent_plans: Vec<DbPlan>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    pub model: String,
    pub reachable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferences() -> DbPreferences {
        DbPreferences {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: None,
            timezone: None,
            wake_time: None,
            sleep_time: None,
            goals: vec!["exercise".into()],
            constraints_list: vec!["meetings 9-11am".into()],
            focus_areas: Vec::new(),
            routine_types: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn routine_request_uses_defaults() {
        let request = preferences().to_routine_request().unwrap();
        assert_eq!(request.role, Role::Professional);
        assert_eq!(request.wake_time.to_string(), "06:00");
        assert_eq!(request.sleep_time.to_string(), "22:00");
        assert_eq!(request.timezone, "UTC");
        assert_eq!(request.constraints, vec!["meetings 9-11am".to_string()]);
        assert!(request.replan.is_none());
    }

    #[test]
    fn routine_request_rejects_bad_stored_time() {
        let mut prefs = preferences();
        prefs.wake_time = Some("late".into());
        assert!(prefs.to_routine_request().is_err());
    }

    fn onboarding(wake: &str) -> OnboardingRequest {
        OnboardingRequest {
            role: "Student".into(),
            timezone: None,
            wake_time: wake.into(),
            sleep_time: "23:30".into(),
            goals: vec!["read".into()],
            constraints: Vec::new(),
            focus_areas: Vec::new(),
            routine_types: vec!["morning".into()],
        }
    }

    #[test]
    fn onboarding_input_normalizes_values() {
        let input = PreferencesInput::from_onboarding(onboarding("7:05")).unwrap();
        assert_eq!(input.role, "student");
        assert_eq!(input.timezone, "UTC");
        assert_eq!(input.wake_time.to_string(), "07:05");
    }

    #[test]
    fn onboarding_input_rejects_bad_time() {
        assert!(PreferencesInput::from_onboarding(onboarding("7am")).is_err());
    }

    #[test]
    fn merged_input_keeps_unset_fields() {
        let mut stored = preferences();
        stored.role = Some("creator".into());
        stored.routine_types = vec!["evening".into()];

        let update = UpdatePreferencesRequest {
            wake_time: Some("05:30".into()),
            goals: Some(Vec::new()),
            ..Default::default()
        };
        let input = PreferencesInput::merged(&stored, update).unwrap();

        assert_eq!(input.role, "creator");
        assert_eq!(input.wake_time.to_string(), "05:30");
        assert_eq!(input.sleep_time.to_string(), "22:00");
        assert!(input.goals.is_empty());
        assert_eq!(input.constraints, vec!["meetings 9-11am".to_string()]);
        assert_eq!(input.routine_types, vec!["evening".to_string()]);
    }

    #[test]
    fn habit_snapshot_keeps_own_checkins() {
        let habit = DbHabit {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Meditate".into(),
            description: None,
            target_frequency: "daily".into(),
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let checkin = |habit_id| DbCheckin {
            id: Uuid::new_v4(),
            habit_id,
            user_id: habit.user_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            completed: true,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = habit.to_snapshot(&[checkin(habit.id), checkin(Uuid::new_v4())]);
        assert_eq!(snapshot.id, habit.id.to_string());
        assert_eq!(snapshot.checkins.len(), 1);
    }
}
