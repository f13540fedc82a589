//! Test fixtures for creating tag data
#![allow(dead_code)]

use tagbot::error::TagError;
use tagbot::orm::tags;
use tagbot::store::TagStore;

/// Create a tag with defaulted description and copyability.
pub async fn create_test_tag(
    store: &TagStore,
    guild_id: i64,
    name: &str,
) -> Result<tags::Model, TagError> {
    store
        .create(guild_id, name, None, None, format!("content for {}", name))
        .await
}

/// Create a tag flagged non-copyable.
pub async fn create_uncopyable_tag(
    store: &TagStore,
    guild_id: i64,
    name: &str,
) -> Result<tags::Model, TagError> {
    store
        .create(
            guild_id,
            name,
            None,
            Some(false),
            format!("content for {}", name),
        )
        .await
}

/// Minimal import JSON for a single tag.
pub fn tag_json(name: &str, content: &str) -> String {
    format!(r#"{{"name":"{}","content":"{}"}}"#, name, content)
}
