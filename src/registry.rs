//! Remote command registry contract.
//!
//! The chat platform keeps a per-guild list of registered slash commands;
//! every live tag should have one carrying its name. The platform adapter
//! implements this trait; the coordinator never talks to the platform
//! directly. Registry state is advisory — the tag table is the source of
//! truth and divergence is healed by `TagCoordinator::sync_guild_commands`.

use async_trait::async_trait;

/// A remote registry call failed.
#[derive(Debug, Clone)]
pub enum RegistryError {
    /// The registry rejected the request (bad name, guild unknown, ...).
    Rejected(String),
    /// The registry could not be reached.
    Unavailable(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Rejected(msg) => write!(f, "Registry rejected request: {}", msg),
            RegistryError::Unavailable(msg) => write!(f, "Registry unavailable: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Per-guild remote command directory.
///
/// `register` has upsert semantics: registering a name that is already
/// registered replaces it and is not an error. `unregister` of an absent
/// name is a no-op.
#[async_trait]
pub trait CommandRegistry: Send + Sync {
    /// Register (or re-register) a guild command for a tag.
    async fn register(
        &self,
        guild_id: i64,
        name: &str,
        description: &str,
    ) -> Result<(), RegistryError>;

    /// Remove the guild command for a tag, if registered.
    async fn unregister(&self, guild_id: i64, name: &str) -> Result<(), RegistryError>;

    /// Names currently registered in a guild. Used only by resync.
    async fn list_registered(&self, guild_id: i64) -> Result<Vec<String>, RegistryError>;
}
