//! Operations over a plan's block list.

use crate::types::RoutineBlock;

/// Prefix of generated block ids (`block-1`, `block-2`, ...).
pub const BLOCK_ID_PREFIX: &str = "block-";

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total` as a percentage, 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Share of completed blocks as a percentage rounded to two decimals.
///
/// An empty plan has a rate of 0.
pub fn completion_rate(blocks: &[RoutineBlock]) -> f64 {
    let completed = blocks.iter().filter(|b| b.completed).count();
    round2(percentage(completed, blocks.len()))
}

/// Flip `completed` on the first block with `id`.
///
/// Returns the new value, or `None` when no block matches.
pub fn toggle_block(blocks: &mut [RoutineBlock], id: &str) -> Option<bool> {
    let block = blocks.iter_mut().find(|b| b.id == id)?;
    block.completed = !block.completed;
    Some(block.completed)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::clock::ClockTime;
    use crate::types::{Category, Priority, RoutineBlock};

    pub fn block(id: &str, start: &str, end: &str, completed: bool) -> RoutineBlock {
        RoutineBlock {
            id: id.to_string(),
            start_time: start.parse::<ClockTime>().unwrap(),
            end_time: end.parse::<ClockTime>().unwrap(),
            activity: format!("Activity {}", id),
            description: String::new(),
            category: Category::Work,
            priority: Priority::Medium,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::block;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rate_rounds_to_two_decimals() {
        let blocks = vec![
            block("a", "06:00", "07:00", true),
            block("b", "07:00", "08:00", false),
            block("c", "08:00", "09:00", false),
        ];
        assert_eq!(completion_rate(&blocks), 33.33);
    }

    #[test]
    fn rate_of_empty_plan_is_zero() {
        assert_eq!(completion_rate(&[]), 0.0);
    }

    #[test]
    fn rate_bounds() {
        let done = vec![block("a", "06:00", "07:00", true)];
        let open = vec![block("a", "06:00", "07:00", false)];
        assert_eq!(completion_rate(&done), 100.0);
        assert_eq!(completion_rate(&open), 0.0);
    }

    #[test]
    fn toggle_flips_first_match_only() {
        let mut blocks = vec![
            block("a", "06:00", "07:00", false),
            block("a", "07:00", "08:00", false),
        ];
        assert_eq!(toggle_block(&mut blocks, "a"), Some(true));
        assert!(blocks[0].completed);
        assert!(!blocks[1].completed);
        assert_eq!(toggle_block(&mut blocks, "a"), Some(false));
        assert_eq!(toggle_block(&mut blocks, "zzz"), None);
    }
}
