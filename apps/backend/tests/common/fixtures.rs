//! Test fixtures and factory functions for creating test data.

use serde_json::json;

/// Model reply used by the default test context: a fenced JSON array of
/// three morning blocks.
pub const MODEL_REPLY: &str = r#"```json
[
  {"id": "m1", "startTime": "07:00", "endTime": "07:30", "activity": "Stretch",
   "category": "fitness", "description": "Light mobility", "priority": "medium",
   "completed": false},
  {"id": "m2", "startTime": "09:00", "endTime": "12:00", "activity": "Deep work",
   "category": "work", "description": "Main project", "priority": "high",
   "completed": false},
  {"id": "m3", "startTime": "15:00", "endTime": "16:00", "activity": "Reading",
   "category": "study", "priority": "low"}
]
```"#;

/// Create a user register request body.
pub fn register_request(name: Option<&str>) -> serde_json::Value {
    match name {
        Some(n) => json!({ "name": n }),
        None => json!({}),
    }
}

/// Create an onboarding request body.
pub fn onboarding_request(role: &str, wake_time: &str, sleep_time: &str) -> serde_json::Value {
    json!({
        "role": role,
        "timezone": "Europe/Berlin",
        "wake_time": wake_time,
        "sleep_time": sleep_time,
        "goals": ["ship the release", "exercise"],
        "constraints": ["meetings 9-11am"],
        "focus_areas": ["health"],
        "routine_types": ["morning"]
    })
}

/// Create a single routine block in wire format.
pub fn block(
    id: &str,
    start: &str,
    end: &str,
    category: &str,
    completed: bool,
) -> serde_json::Value {
    json!({
        "id": id,
        "startTime": start,
        "endTime": end,
        "activity": format!("Activity {}", id),
        "category": category,
        "description": "",
        "priority": "medium",
        "completed": completed
    })
}

/// Create a habit request body.
pub fn habit_request(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Every day",
        "category": "personal"
    })
}

/// Create a checkin request body.
pub fn checkin_request(habit_id: &str, date: &str, completed: bool) -> serde_json::Value {
    json!({
        "habit_id": habit_id,
        "date": date,
        "completed": completed,
        "notes": null
    })
}
