//! Guild-scoped tag storage and slash-command lifecycle coordination.
//!
//! Tags are short named text snippets owned by a guild. This crate owns tag
//! identity (case-insensitive, guild-scoped names), per-guild quotas, and the
//! orchestration that keeps a remote per-guild command directory in agreement
//! with the tag table after every mutation. The chat-platform gateway, UI
//! widgets and permission checks live outside this crate; they drive it
//! through [`coordinator::TagCoordinator`] and implement
//! [`registry::CommandRegistry`] for their platform.

pub mod constants;
pub mod coordinator;
pub mod db;
pub mod error;
pub mod orm;
pub mod registry;
pub mod store;
pub mod tag_json;
pub mod tag_name;
