// src/api/validate.rs
//! Shape checks for the untrusted `homework_statuses` payload.

use serde_json::{Map, Value};

use crate::error::{BotError, Result};

/// One element of the `homeworks` array, kept as raw JSON.
/// Shape and field checks happen in [`crate::status::interpret`], so only
/// the record that is actually reported can fail a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord(Value);

impl HomeworkRecord {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Value under `key`, with JSON `null` treated as absent.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }
}

/// Validated view of one API response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiSnapshot {
    pub homeworks: Vec<HomeworkRecord>,
    /// Server time echoed back; becomes the next cursor.
    pub current_date: Option<i64>,
}

pub fn validate(raw: &Value) -> Result<ApiSnapshot> {
    let Value::Object(obj) = raw else {
        return Err(BotError::Schema(format!(
            "expected a JSON object, got {}",
            type_name(raw)
        )));
    };

    let homeworks = obj.get("homeworks").ok_or(BotError::EmptyResponse)?;
    let Value::Array(items) = homeworks else {
        return Err(BotError::Schema(format!(
            "`homeworks` must be a list, got {}",
            type_name(homeworks)
        )));
    };

    let records = items.iter().cloned().map(HomeworkRecord::new).collect();

    let current_date = match obj.get("current_date") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_i64().ok_or_else(|| {
            BotError::Schema(format!(
                "`current_date` must be an integer timestamp, got {}",
                type_name(v)
            ))
        })?),
    };

    Ok(ApiSnapshot {
        homeworks: records,
        current_date,
    })
}

pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
