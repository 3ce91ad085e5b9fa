//! Core types for routine planning.

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;

/// Activity category of a routine block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Study,
    Fitness,
    Personal,
    Break,
    Sleep,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Work,
        Self::Study,
        Self::Fitness,
        Self::Personal,
        Self::Break,
        Self::Sleep,
    ];

    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Study => "study",
            Self::Fitness => "fitness",
            Self::Personal => "personal",
            Self::Break => "break",
            Self::Sleep => "sleep",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Block priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// User role; selects the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Professional,
    Creator,
    Fitness,
}

impl Default for Role {
    fn default() -> Self {
        Self::Professional
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
            Self::Creator => "creator",
            Self::Fitness => "fitness",
        }
    }

    /// Resolve a stored role name. Unknown names map to `Professional`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "student" => Self::Student,
            "creator" => Self::Creator,
            "fitness" => Self::Fitness,
            _ => Self::Professional,
        }
    }

    /// Category used for the focused work slot of the fallback routine.
    pub fn focus_category(&self) -> Category {
        match self {
            Self::Student => Category::Study,
            _ => Category::Work,
        }
    }
}

/// One scheduled activity within a plan.
///
/// Serialized with camelCase keys: this is both the shape the model is asked
/// to produce and the snapshot stored in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineBlock {
    pub id: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub activity: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

/// Replan inputs passed to the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplanContext {
    pub current_time: ClockTime,
    /// Activity labels of blocks already done or elapsed.
    pub completed_activities: Vec<String>,
}

/// Everything the generator needs to produce a routine.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineRequest {
    pub role: Role,
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub focus_areas: Vec<String>,
    pub wake_time: ClockTime,
    pub sleep_time: ClockTime,
    pub timezone: String,
    pub replan: Option<ReplanContext>,
}

impl RoutineRequest {
    /// Same request in replan mode.
    pub fn with_replan(mut self, context: ReplanContext) -> Self {
        self.replan = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn category_round_trips_names() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
        assert_eq!(Category::from_str("leisure"), None);
        assert_eq!(Category::from_str("Work"), None);
    }

    #[test]
    fn unknown_role_defaults_to_professional() {
        assert_eq!(Role::from_name("student"), Role::Student);
        assert_eq!(Role::from_name(" Creator "), Role::Creator);
        assert_eq!(Role::from_name("astronaut"), Role::Professional);
        assert_eq!(Role::from_name(""), Role::Professional);
    }

    #[test]
    fn block_uses_camel_case_and_defaults() {
        let block: RoutineBlock = serde_json::from_value(serde_json::json!({
            "id": "block-1",
            "startTime": "06:00",
            "endTime": "06:30",
            "activity": "Morning Routine",
            "category": "personal"
        }))
        .unwrap();

        assert_eq!(block.description, "");
        assert_eq!(block.priority, Priority::Medium);
        assert!(!block.completed);

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["startTime"], "06:00");
        assert_eq!(value["category"], "personal");
        assert_eq!(value["priority"], "medium");
    }

    #[test]
    fn block_rejects_unknown_category() {
        let result = serde_json::from_value::<RoutineBlock>(serde_json::json!({
            "id": "block-1",
            "startTime": "06:00",
            "endTime": "06:30",
            "activity": "Nap",
            "category": "leisure"
        }));
        assert!(result.is_err());
    }
}
