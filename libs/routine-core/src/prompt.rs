//! Prompt construction for the routine generator.

use std::fmt::Write;

use crate::types::{Role, RoutineRequest};

/// Prompt used to check that the model endpoint answers at all.
pub const CONNECTION_PROBE: &str = "Say \"connection successful\" if you can read this.";

/// Phrase expected back from [`CONNECTION_PROBE`].
pub const CONNECTION_PROBE_REPLY: &str = "connection successful";

const STUDENT: &str = "You are an AI routine planner for students. Create a balanced daily schedule that includes:
- Study sessions with breaks (Pomodoro technique)
- Time for classes and assignments
- Physical activity and exercise
- Meals and rest periods
- Social and recreational activities
- Adequate sleep schedule";

const PROFESSIONAL: &str = "You are an AI routine planner for working professionals. Create a productive schedule that includes:
- Focused work blocks with breaks
- Meeting slots and collaboration time
- Email and communication management
- Professional development
- Exercise and wellness activities
- Work-life balance with personal time";

const CREATOR: &str = "You are an AI routine planner for creators and artists. Create an inspiring schedule that includes:
- Deep work sessions for creative projects
- Skill development and learning
- Content creation and publishing
- Marketing and audience engagement
- Rest and inspiration time
- Physical and mental wellness";

const FITNESS: &str = "You are an AI routine planner for fitness enthusiasts. Create an optimal schedule that includes:
- Workout sessions (strength, cardio, flexibility)
- Meal prep and nutrition planning
- Recovery and rest periods
- Active recovery activities
- Sleep optimization
- Hydration and wellness tracking";

const BLOCK_FIELDS: &str = "Create a detailed daily routine with specific time blocks. Each block should have:
- Unique ID (use format: block-1, block-2, etc.)
- Start time (HH:MM format in 24-hour)
- End time (HH:MM format in 24-hour)
- Activity name (concise, actionable)
- Description (brief, 1-2 sentences explaining the activity)
- Category (one of: work, study, fitness, personal, break, sleep)
- Priority (one of: high, medium, low)";

const OUTPUT_FORMAT: &str = r#"IMPORTANT: Respond ONLY with valid JSON array of blocks. No explanations, no markdown formatting, just the JSON array.

Example format:
[
  {
    "id": "block-1",
    "startTime": "06:00",
    "endTime": "06:30",
    "activity": "Morning Routine",
    "description": "Wake up, freshen up, and prepare for the day",
    "category": "personal",
    "priority": "high",
    "completed": false
  }
]"#;

/// Role-specific system text.
pub fn role_template(role: Role) -> &'static str {
    match role {
        Role::Student => STUDENT,
        Role::Professional => PROFESSIONAL,
        Role::Creator => CREATOR,
        Role::Fitness => FITNESS,
    }
}

/// Build the full natural-language prompt for one generation call.
pub fn build_prompt(request: &RoutineRequest) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str(role_template(request.role));
    prompt.push_str("\n\nUser Profile:\n");

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "- Role: {}", request.role.as_str());
    let _ = writeln!(prompt, "- Goals: {}", request.goals.join(", "));
    let _ = writeln!(prompt, "- Constraints: {}", request.constraints.join(", "));
    let _ = writeln!(prompt, "- Focus Areas: {}", request.focus_areas.join(", "));
    let _ = writeln!(prompt, "- Wake Time: {}", request.wake_time);
    let _ = writeln!(prompt, "- Sleep Time: {}", request.sleep_time);
    let _ = writeln!(prompt, "- Timezone: {}", request.timezone);

    if let Some(replan) = &request.replan {
        let _ = writeln!(
            prompt,
            "- Current Time: {} (re-planning from this point)",
            replan.current_time
        );
        if !replan.completed_activities.is_empty() {
            let _ = writeln!(
                prompt,
                "- Already Completed: {}",
                replan.completed_activities.join(", ")
            );
        }
    }

    prompt.push('\n');
    prompt.push_str(BLOCK_FIELDS);
    prompt.push_str("\n\n");

    match &request.replan {
        Some(replan) => {
            let _ = write!(
                prompt,
                "Start from {} and plan the rest of the day. Do not schedule anything before {}. \
                 Preserve completed activities and adjust remaining schedule.",
                replan.current_time, replan.current_time
            );
        }
        None => {
            let _ = write!(
                prompt,
                "Plan from {} to {}.",
                request.wake_time, request.sleep_time
            );
        }
    }

    prompt.push_str("\n\n");
    prompt.push_str(OUTPUT_FORMAT);
    prompt
}
