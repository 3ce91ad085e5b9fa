//! Replanning of a partially completed day.
//!
//! Blocks that are done or already over are kept untouched. Everything else
//! is replaced by freshly generated blocks that start at or after the current
//! time. The merged list is retained blocks followed by the new ones; it is
//! not re-sorted. Block ids stay unique across the merged list.

use std::collections::HashSet;

use serde::Serialize;

use crate::blocks::{completion_rate, BLOCK_ID_PREFIX};
use crate::clock::ClockTime;
use crate::types::{ReplanContext, RoutineBlock};

/// Existing blocks split at the current time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Completed or elapsed blocks, in original order.
    pub retained: Vec<RoutineBlock>,
    /// Upcoming, not yet completed blocks.
    pub superseded: Vec<RoutineBlock>,
}

impl Partition {
    /// Activity labels of the retained blocks, for the generator.
    pub fn retained_activities(&self) -> Vec<String> {
        self.retained.iter().map(|b| b.activity.clone()).collect()
    }

    /// Generator context for replanning from `now`.
    pub fn replan_context(&self, now: ClockTime) -> ReplanContext {
        ReplanContext {
            current_time: now,
            completed_activities: self.retained_activities(),
        }
    }
}

/// Merged blocks and their completion rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplanOutcome {
    pub blocks: Vec<RoutineBlock>,
    pub completion_rate: f64,
}

/// A block survives a replan when it is done or has already ended.
pub fn is_retained(block: &RoutineBlock, now: ClockTime) -> bool {
    block.completed || block.end_time <= now
}

pub fn partition_blocks(blocks: Vec<RoutineBlock>, now: ClockTime) -> Partition {
    let (retained, superseded) = blocks.into_iter().partition(|b| is_retained(b, now));
    Partition {
        retained,
        superseded,
    }
}

/// Candidate blocks starting at or after `now`, in generator order.
pub fn filter_upcoming(candidates: Vec<RoutineBlock>, now: ClockTime) -> Vec<RoutineBlock> {
    candidates
        .into_iter()
        .filter(|b| b.start_time >= now)
        .collect()
}

fn block_number(id: &str) -> Option<u32> {
    id.strip_prefix(BLOCK_ID_PREFIX)?.parse().ok()
}

/// Retained blocks followed by the upcoming candidates.
///
/// A candidate whose id is already in use is renumbered to the next
/// `block-N` above every numbered id in either list.
pub fn merge_blocks(
    retained: Vec<RoutineBlock>,
    candidates: Vec<RoutineBlock>,
    now: ClockTime,
) -> Vec<RoutineBlock> {
    let upcoming = filter_upcoming(candidates, now);
    let mut next = retained
        .iter()
        .chain(&upcoming)
        .filter_map(|b| block_number(&b.id))
        .max()
        .map_or(1, |n| n.saturating_add(1));

    let mut taken: HashSet<String> = retained.iter().map(|b| b.id.clone()).collect();
    let mut merged = retained;

    for mut block in upcoming {
        if taken.contains(&block.id) {
            block.id = format!("{BLOCK_ID_PREFIX}{next}");
            next = next.saturating_add(1);
        }
        taken.insert(block.id.clone());
        merged.push(block);
    }

    merged
}

/// Finish a replan once the generator has produced `candidates`.
pub fn replan_blocks(
    partition: Partition,
    candidates: Vec<RoutineBlock>,
    now: ClockTime,
) -> ReplanOutcome {
    let blocks = merge_blocks(partition.retained, candidates, now);
    let completion_rate = completion_rate(&blocks);
    ReplanOutcome {
        blocks,
        completion_rate,
    }
}
