//! Tag naming policy.
//!
//! Tag names double as remote command names, so they are restricted to
//! lowercase alphanumerics and dashes and may not shadow the root command.
//! Because every valid name is already lowercase, case-insensitive lookup
//! elsewhere in the crate is just "lowercase the query, match exactly".

use crate::constants::{RESERVED_NAMES, TAG_NAME_MAX_LENGTH, TAG_NAME_MIN_LENGTH};
use crate::orm::tags;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[a-z0-9-]{{{},{}}}$",
        TAG_NAME_MIN_LENGTH, TAG_NAME_MAX_LENGTH
    ))
    .expect("tag name pattern is valid")
});

/// Check whether `name` is usable as a tag name: matches the pattern and is
/// not reserved.
pub fn validate_name(name: &str) -> bool {
    TAG_NAME_REGEX.is_match(name) && !RESERVED_NAMES.contains(&name)
}

/// Normalize free-text input into tag-name shape: trim, lowercase and turn
/// spaces into dashes. Does not guarantee the result is valid.
pub fn ensure_name(raw: &str) -> String {
    raw.trim().replace(' ', "-").to_lowercase()
}

/// The description used for a tag whose author never provided one.
pub fn default_description_for(name: &str) -> String {
    format!("Triggers the '{}' tag.", name)
}

/// The description to display or register for a tag: its own when present
/// and non-blank, the computed default otherwise.
pub fn description_for(tag: Option<&tags::Model>, name: &str) -> String {
    match tag.and_then(|t| t.description.as_deref()) {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => default_description_for(name),
    }
}
