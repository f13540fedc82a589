//! Application-wide constants
//!
//! Tag policy knobs live here so the store, coordinator and tests agree on
//! a single source of truth.

/// Maximum number of live tags a single guild may own.
/// Creates, copies, moves and imports into a guild at this count are refused.
pub const MAX_TAGS_PER_GUILD: u64 = 50;

/// Minimum length for a tag name in characters.
pub const TAG_NAME_MIN_LENGTH: usize = 1;

/// Maximum length for a tag name in characters.
pub const TAG_NAME_MAX_LENGTH: usize = 25;

/// Names that can never be used for a tag.
/// "tag" collides with the root management command.
pub const RESERVED_NAMES: &[&str] = &["tag"];

/// Whether a tag may be copied or moved to another guild when the creator
/// did not say either way.
pub const COPYABLE_DEFAULT: bool = true;
