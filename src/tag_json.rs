//! JSON interchange format for tag export and import.
//!
//! One tag per object: `{"name", "description", "copyable", "content"}`.
//! Export-all produces a plain array of such objects; import accepts either
//! a single object or an array. `description` may be null and `copyable`
//! may be omitted (defaulting at create time), but `name` and `content`
//! are required.

use crate::error::TagError;
use crate::orm::tags;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wire shape of a single tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub copyable: Option<bool>,
    pub content: String,
}

impl TagData {
    pub fn from_model(tag: &tags::Model) -> Self {
        Self {
            name: tag.name.clone(),
            description: tag.description.clone(),
            copyable: Some(tag.copyable),
            content: tag.content.clone(),
        }
    }

    /// Deserialize one import item. Missing `name`/`content` or wrong types
    /// come back as `MalformedInput`.
    pub fn from_value(value: &Value) -> Result<Self, TagError> {
        serde_json::from_value(value.clone()).map_err(|e| TagError::MalformedInput(e.to_string()))
    }
}

/// Serialize a tag row into its wire shape.
pub fn export_tag(tag: &tags::Model) -> Value {
    serde_json::to_value(TagData::from_model(tag)).unwrap_or(Value::Null)
}

/// Serialize a set of tag rows into the export-all array.
pub fn export_tags(tags: &[tags::Model]) -> Value {
    Value::Array(tags.iter().map(export_tag).collect())
}

/// Parse raw import JSON into individual items, accepting either a single
/// object or an array of objects.
pub fn parse_import(raw: &str) -> Result<Vec<Value>, TagError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| TagError::MalformedInput(e.to_string()))?;
    match value {
        Value::Object(_) => Ok(vec![value]),
        Value::Array(items) => Ok(items),
        other => Err(TagError::MalformedInput(format!(
            "expected a tag object or array, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Best-effort name of an import item, for bucketing items that fail to
/// parse fully. Empty when the item has no usable name field.
pub fn item_name(value: &Value) -> String {
    value
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
