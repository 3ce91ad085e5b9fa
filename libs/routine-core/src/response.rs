//! Parsing of the model's free-text reply into routine blocks.
//!
//! The reply should be a bare JSON array but is often wrapped in a Markdown
//! code fence. Every element must carry `id`, `startTime`, `endTime`,
//! `activity` and `category`; closed-enum and time values are checked here so
//! nothing unrecognised reaches a stored plan.

use serde_json::{Map, Value};

use crate::clock::ClockTime;
use crate::error::ResponseError;
use crate::types::{Category, Priority, RoutineBlock};

/// Remove an optional ```` ``` ```` / ```` ```json ```` wrapper.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse and validate a model reply.
pub fn parse_blocks(text: &str) -> Result<Vec<RoutineBlock>, ResponseError> {
    let value: Value = serde_json::from_str(strip_code_fence(text))?;
    let Value::Array(items) = value else {
        return Err(ResponseError::NotArray);
    };
    if items.is_empty() {
        return Err(ResponseError::Empty);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_block(index, item))
        .collect()
}

fn parse_block(index: usize, item: &Value) -> Result<RoutineBlock, ResponseError> {
    let Value::Object(fields) = item else {
        return Err(ResponseError::InvalidField {
            index,
            field: "block",
            reason: "expected an object".to_string(),
        });
    };

    let id = required_str(fields, index, "id")?;
    let start_time = required_str(fields, index, "startTime")?;
    let end_time = required_str(fields, index, "endTime")?;
    let activity = required_str(fields, index, "activity")?;
    let category = required_str(fields, index, "category")?;

    let category = Category::from_str(category).ok_or_else(|| ResponseError::InvalidField {
        index,
        field: "category",
        reason: format!("unknown category '{}'", category),
    })?;

    let priority = match fields.get("priority").and_then(Value::as_str) {
        Some(p) => Priority::from_str(p).ok_or_else(|| ResponseError::InvalidField {
            index,
            field: "priority",
            reason: format!("unknown priority '{}'", p),
        })?,
        None => Priority::default(),
    };

    Ok(RoutineBlock {
        id: id.to_string(),
        start_time: parse_time(index, "startTime", start_time)?,
        end_time: parse_time(index, "endTime", end_time)?,
        activity: activity.to_string(),
        description: fields
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        category,
        priority,
        completed: fields
            .get("completed")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn required_str<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a str, ResponseError> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ResponseError::MissingField { index, field })
}

fn parse_time(index: usize, field: &'static str, raw: &str) -> Result<ClockTime, ResponseError> {
    raw.parse().map_err(|e: crate::error::TimeError| ResponseError::InvalidField {
        index,
        field,
        reason: e.to_string(),
    })
}
