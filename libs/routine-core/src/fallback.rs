//! Deterministic routine used whenever generation fails.

use crate::clock::ClockTime;
use crate::types::{Category, Priority, Role, RoutineBlock};

/// Three-block skeleton anchored at the wake time: 30 minutes of morning
/// routine, 30 minutes of breakfast, then a 90-minute focus slot. Times wrap
/// past midnight.
pub fn fallback_routine(wake_time: ClockTime, role: Role) -> Vec<RoutineBlock> {
    let slot = |id: &str, from: u32, to: u32, activity: &str, description: &str, category| {
        RoutineBlock {
            id: id.to_string(),
            start_time: wake_time.add_minutes(from),
            end_time: wake_time.add_minutes(to),
            activity: activity.to_string(),
            description: description.to_string(),
            category,
            priority: Priority::High,
            completed: false,
        }
    };

    vec![
        slot(
            "block-1",
            0,
            30,
            "Morning Routine",
            "Wake up, freshen up, and prepare for the day",
            Category::Personal,
        ),
        slot(
            "block-2",
            30,
            60,
            "Breakfast",
            "Healthy breakfast to start the day",
            Category::Personal,
        ),
        slot(
            "block-3",
            60,
            150,
            "Focused Work Block",
            "Deep work on priority tasks",
            role.focus_category(),
        ),
    ]
}
