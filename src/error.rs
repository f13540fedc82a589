//! Error taxonomy for tag operations.
//!
//! Single-tag operations surface exactly one of these kinds; bulk operations
//! fold per-item failures into their report buckets instead and only return
//! an error when the whole batch cannot start.

use crate::registry::RegistryError;
use sea_orm::DbErr;

/// Everything that can go wrong with a tag operation.
#[derive(Debug)]
pub enum TagError {
    /// Name fails the tag name pattern or is reserved.
    InvalidName(String),
    /// No tag with this name exists in the stated guild.
    NotFound(String),
    /// A tag with this name already exists in the target guild.
    AlreadyExists(String),
    /// The guild is at or above its tag quota.
    QuotaExceeded { guild_id: i64, limit: u64 },
    /// The source tag is flagged non-copyable.
    NotCopyable(String),
    /// Target guild equals the source guild or cannot be used.
    InvalidTarget(i64),
    /// Import JSON is unparseable or missing required fields.
    MalformedInput(String),
    /// The remote command registry rejected a call.
    Registry(RegistryError),
    /// Underlying database failure.
    Database(DbErr),
    /// Unclassified fault caught at the operation boundary.
    Internal(String),
}

impl std::fmt::Display for TagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagError::InvalidName(name) => write!(f, "Invalid tag name: {}", name),
            TagError::NotFound(name) => write!(f, "Tag not found: {}", name),
            TagError::AlreadyExists(name) => write!(f, "Tag already exists: {}", name),
            TagError::QuotaExceeded { guild_id, limit } => {
                write!(f, "Guild {} is at its tag limit of {}", guild_id, limit)
            }
            TagError::NotCopyable(name) => write!(f, "Tag is not copyable: {}", name),
            TagError::InvalidTarget(guild_id) => {
                write!(f, "Invalid target guild: {}", guild_id)
            }
            TagError::MalformedInput(msg) => write!(f, "Malformed tag JSON: {}", msg),
            TagError::Registry(err) => write!(f, "Command registry error: {}", err),
            TagError::Database(err) => write!(f, "Database error: {}", err),
            TagError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::Registry(err) => Some(err),
            TagError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for TagError {
    fn from(err: DbErr) -> Self {
        TagError::Database(err)
    }
}

impl From<RegistryError> for TagError {
    fn from(err: RegistryError) -> Self {
        TagError::Registry(err)
    }
}

impl TagError {
    /// The tag name this error is about, when there is one. Bulk operations
    /// use this to bucket an item under the right heading.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            TagError::InvalidName(name)
            | TagError::NotFound(name)
            | TagError::AlreadyExists(name)
            | TagError::NotCopyable(name) => Some(name),
            _ => None,
        }
    }
}
