//! Routine generation and replanning on top of a [`RoutineModel`].
//!
//! Generation never fails: any model, timeout or parse problem is logged
//! and answered with the fixed fallback routine.

use std::sync::Arc;
use std::time::Duration;

use routine_core::prompt::{CONNECTION_PROBE, CONNECTION_PROBE_REPLY};
use routine_core::{
    build_prompt, fallback_routine, parse_blocks, partition_blocks, replan_blocks, ClockTime,
    ReplanOutcome, RoutineBlock, RoutineRequest,
};
use uuid::Uuid;

use super::gemini::{ModelError, RoutineModel};
use crate::error::{ApiError, Result};
use crate::models::{DbPlan, DbPreferences};

/// Result of replanning a day.
#[derive(Debug, Clone)]
pub struct Replanned {
    pub plan_id: Uuid,
    pub outcome: ReplanOutcome,
    pub retained_count: usize,
    pub generated_count: usize,
}

#[derive(Clone)]
pub struct Planner {
    model: Arc<dyn RoutineModel>,
    timeout: Duration,
}

impl Planner {
    pub fn new(model: Arc<dyn RoutineModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    async fn ask(&self, prompt: &str) -> std::result::Result<String, ModelError> {
        tokio::time::timeout(self.timeout, self.model.complete(prompt))
            .await
            .map_err(|_| ModelError::Timeout)?
    }

    /// Produce a routine for `request`, falling back when the model fails.
    pub async fn generate_routine(&self, request: &RoutineRequest) -> Vec<RoutineBlock> {
        let prompt = build_prompt(request);
        let replan = request.replan.is_some();

        let outcome = match self.ask(&prompt).await {
            Ok(text) => parse_blocks(&text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(blocks) => {
                tracing::debug!(
                    model = self.model.name(),
                    blocks = blocks.len(),
                    replan,
                    "Generated routine"
                );
                blocks
            }
            Err(error) => {
                tracing::warn!(
                    model = self.model.name(),
                    %error,
                    replan,
                    "Routine generation failed, using fallback"
                );
                fallback_routine(request.wake_time, request.role)
            }
        }
    }

    /// Regenerate the unfinished part of a day from `now`.
    ///
    /// Fails with `NotFound` without an existing plan and with
    /// `PreconditionsNotMet` without stored preferences.
    pub async fn replan_day(
        &self,
        plan: Option<&DbPlan>,
        preferences: Option<&DbPreferences>,
        now: ClockTime,
    ) -> Result<Replanned> {
        let plan =
            plan.ok_or_else(|| ApiError::NotFound("No plan found for this date".to_string()))?;
        let preferences = preferences.ok_or_else(|| {
            ApiError::PreconditionsNotMet("Please complete onboarding first".to_string())
        })?;

        let partition = partition_blocks(plan.blocks.0.clone(), now);
        let retained_count = partition.retained.len();
        let request = preferences
            .to_routine_request()?
            .with_replan(partition.replan_context(now));

        let candidates = self.generate_routine(&request).await;
        let outcome = replan_blocks(partition, candidates, now);
        let generated_count = outcome.blocks.len() - retained_count;

        tracing::info!(
            plan_id = %plan.id,
            %now,
            retained = retained_count,
            generated = generated_count,
            completion_rate = outcome.completion_rate,
            "Replanned day"
        );

        Ok(Replanned {
            plan_id: plan.id,
            outcome,
            retained_count,
            generated_count,
        })
    }

    /// Send the connectivity probe and check the reply.
    pub async fn check_connection(&self) -> bool {
        match self.ask(CONNECTION_PROBE).await {
            Ok(text) => text.to_lowercase().contains(CONNECTION_PROBE_REPLY),
            Err(e) => {
                tracing::warn!(
                    model = self.model.name(),
                    error = %e,
                    "Model connection check failed"
                );
                false
            }
        }
    }
}
