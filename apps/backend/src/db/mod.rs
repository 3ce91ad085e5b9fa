//! PostgreSQL database operations

use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

const PLAN_COLUMNS: &str =
    "id, user_id, date, blocks, status, completion_rate, created_at, updated_at";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, name: Option<&str>) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Preferences Repository ===

    /// Get preferences for a user
    pub async fn get_preferences(&self, user_id: Uuid) -> Result<Option<DbPreferences>> {
        let preferences = sqlx::query_as::<_, DbPreferences>(
            r#"
            SELECT id, user_id, role, timezone, wake_time, sleep_time, goals,
                   constraints_list, focus_areas, routine_types, created_at, updated_at
            FROM preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(preferences)
    }

    /// Insert or replace preferences in a single statement
    pub async fn upsert_preferences(
        &self,
        user_id: Uuid,
        preferences: &PreferencesInput,
    ) -> Result<DbPreferences> {
        let saved = sqlx::query_as::<_, DbPreferences>(
            r#"
            INSERT INTO preferences (user_id, role, timezone, wake_time, sleep_time, goals,
                                     constraints_list, focus_areas, routine_types)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                role = EXCLUDED.role,
                timezone = EXCLUDED.timezone,
                wake_time = EXCLUDED.wake_time,
                sleep_time = EXCLUDED.sleep_time,
                goals = EXCLUDED.goals,
                constraints_list = EXCLUDED.constraints_list,
                focus_areas = EXCLUDED.focus_areas,
                routine_types = EXCLUDED.routine_types,
                updated_at = NOW()
            RETURNING id, user_id, role, timezone, wake_time, sleep_time, goals,
                      constraints_list, focus_areas, routine_types, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&preferences.role)
        .bind(&preferences.timezone)
        .bind(preferences.wake_time.to_string())
        .bind(preferences.sleep_time.to_string())
        .bind(&preferences.goals)
        .bind(&preferences.constraints)
        .bind(&preferences.focus_areas)
        .bind(&preferences.routine_types)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    // === Plan Repository ===

    /// Get the plan for a date
    pub async fn get_plan(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<DbPlan>> {
        let plan = sqlx::query_as::<_, DbPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE user_id = $1 AND date = $2"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Insert a plan unless one already exists for the date.
    ///
    /// Returns `None` when the (user, date) slot is taken.
    pub async fn insert_plan(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        blocks: &[RoutineBlock],
        completion_rate: f64,
    ) -> Result<Option<DbPlan>> {
        let plan = sqlx::query_as::<_, DbPlan>(&format!(
            r#"
            INSERT INTO plans (user_id, date, blocks, status, completion_rate)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, date) DO NOTHING
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(date)
        .bind(Json(blocks))
        .bind(PLAN_STATUS_ACTIVE)
        .bind(completion_rate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Replace a plan's blocks and completion rate
    pub async fn update_plan_blocks(
        &self,
        plan_id: Uuid,
        blocks: &[RoutineBlock],
        completion_rate: f64,
    ) -> Result<DbPlan> {
        let plan = sqlx::query_as::<_, DbPlan>(&format!(
            r#"
            UPDATE plans
            SET blocks = $2, completion_rate = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {PLAN_COLUMNS}
            "#
        ))
        .bind(plan_id)
        .bind(Json(blocks))
        .bind(completion_rate)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

        Ok(plan)
    }

    /// Plans dated on or after `since`, newest first
    pub async fn get_plans_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<DbPlan>> {
        let plans = sqlx::query_as::<_, DbPlan>(&format!(
            r#"
            SELECT {PLAN_COLUMNS}
            FROM plans
            WHERE user_id = $1 AND date >= $2
            ORDER BY date DESC
            "#
        ))
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    // === Habit Repository ===

    /// All habits for a user, newest first
    pub async fn get_habits(&self, user_id: Uuid) -> Result<Vec<DbHabit>> {
        let habits = sqlx::query_as::<_, DbHabit>(
            r#"
            SELECT id, user_id, name, description, target_frequency, category,
                   created_at, updated_at
            FROM habits
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(habits)
    }

    /// Get a habit owned by the user
    pub async fn get_habit(&self, user_id: Uuid, habit_id: Uuid) -> Result<Option<DbHabit>> {
        let habit = sqlx::query_as::<_, DbHabit>(
            r#"
            SELECT id, user_id, name, description, target_frequency, category,
                   created_at, updated_at
            FROM habits
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(habit)
    }

    /// Create a habit
    pub async fn create_habit(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
        target_frequency: &str,
        category: Option<&str>,
    ) -> Result<DbHabit> {
        let habit = sqlx::query_as::<_, DbHabit>(
            r#"
            INSERT INTO habits (user_id, name, description, target_frequency, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, description, target_frequency, category,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(target_frequency)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(habit)
    }

    /// Delete a habit (checkins cascade)
    pub async fn delete_habit(&self, user_id: Uuid, habit_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM habits
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(habit_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Checkin Repository ===

    /// Insert or update the checkin for (habit, date) in a single statement
    pub async fn upsert_checkin(
        &self,
        user_id: Uuid,
        habit_id: Uuid,
        date: NaiveDate,
        completed: bool,
        notes: Option<&str>,
    ) -> Result<DbCheckin> {
        let checkin = sqlx::query_as::<_, DbCheckin>(
            r#"
            INSERT INTO checkins (habit_id, user_id, date, completed, notes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (habit_id, date) DO UPDATE SET
                completed = EXCLUDED.completed,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING id, habit_id, user_id, date, completed, notes, created_at, updated_at
            "#,
        )
        .bind(habit_id)
        .bind(user_id)
        .bind(date)
        .bind(completed)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(checkin)
    }

    /// Checkins filtered by habit and/or inclusive date range, newest first
    pub async fn get_checkins(
        &self,
        user_id: Uuid,
        habit_id: Option<Uuid>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<DbCheckin>> {
        let (start, end) = range.unzip();
        let checkins = sqlx::query_as::<_, DbCheckin>(
            r#"
            SELECT id, habit_id, user_id, date, completed, notes, created_at, updated_at
            FROM checkins
            WHERE user_id = $1
              AND ($2::UUID IS NULL OR habit_id = $2)
              AND ($3::DATE IS NULL OR date >= $3)
              AND ($4::DATE IS NULL OR date <= $4)
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(checkins)
    }

    /// All of a user's checkins dated on or after `since`
    pub async fn get_checkins_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<DbCheckin>> {
        let checkins = sqlx::query_as::<_, DbCheckin>(
            r#"
            SELECT id, habit_id, user_id, date, completed, notes, created_at, updated_at
            FROM checkins
            WHERE user_id = $1 AND date >= $2
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(checkins)
    }
}
