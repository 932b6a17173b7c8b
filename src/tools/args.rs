//! Accessors for validated argument objects.
//!
//! Dispatch validates arguments before a handler runs, so these lookups
//! only fail if a handler reads a field its descriptor never declared or
//! the value is outside the target integer range; either way they return
//! `InvalidParameters` rather than panic.

use serde_json::Value;

use crate::tools::types::ToolError;

pub fn require_str<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing required parameter: {name}")))
}

pub fn optional_str<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

pub fn optional_u64(args: &Value, name: &str) -> Result<Option<u64>, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ToolError::InvalidParameters(format!(
                "parameter '{name}' must be a non-negative integer"
            ))
        }),
    }
}

pub fn optional_u32(args: &Value, name: &str) -> Result<Option<u32>, ToolError> {
    match optional_u64(args, name)? {
        None => Ok(None),
        Some(v) => u32::try_from(v).map(Some).map_err(|_| {
            ToolError::InvalidParameters(format!(
                "parameter '{name}' must be no larger than {}",
                u32::MAX
            ))
        }),
    }
}

pub fn optional_bool(args: &Value, name: &str) -> Option<bool> {
    args.get(name).and_then(Value::as_bool)
}
