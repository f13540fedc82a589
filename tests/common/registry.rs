//! In-memory CommandRegistry double with failure injection
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use tagbot::registry::{CommandRegistry, RegistryError};

/// Records per-guild command sets and can be told to fail calls for a
/// whole guild or for a specific command name.
#[derive(Default)]
pub struct MockRegistry {
    commands: Mutex<BTreeMap<i64, BTreeSet<String>>>,
    failing_guilds: Mutex<BTreeSet<i64>>,
    failing_names: Mutex<BTreeSet<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently registered in a guild, sorted.
    pub fn registered(&self, guild_id: i64) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .get(&guild_id)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Seed a registered command with no matching tag (resync fodder).
    pub fn seed_command(&self, guild_id: i64, name: &str) {
        self.commands
            .lock()
            .unwrap()
            .entry(guild_id)
            .or_default()
            .insert(name.to_string());
    }

    /// Make every call touching this guild fail.
    pub fn fail_guild(&self, guild_id: i64) {
        self.failing_guilds.lock().unwrap().insert(guild_id);
    }

    /// Make register/unregister of this name fail in any guild.
    pub fn fail_name(&self, name: &str) {
        self.failing_names.lock().unwrap().insert(name.to_string());
    }

    fn check(&self, guild_id: i64, name: Option<&str>) -> Result<(), RegistryError> {
        if self.failing_guilds.lock().unwrap().contains(&guild_id) {
            return Err(RegistryError::Unavailable(format!(
                "injected failure for guild {}",
                guild_id
            )));
        }
        if let Some(name) = name {
            if self.failing_names.lock().unwrap().contains(name) {
                return Err(RegistryError::Rejected(format!(
                    "injected failure for '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRegistry for MockRegistry {
    async fn register(
        &self,
        guild_id: i64,
        name: &str,
        _description: &str,
    ) -> Result<(), RegistryError> {
        self.check(guild_id, Some(name))?;
        self.commands
            .lock()
            .unwrap()
            .entry(guild_id)
            .or_default()
            .insert(name.to_string());
        Ok(())
    }

    async fn unregister(&self, guild_id: i64, name: &str) -> Result<(), RegistryError> {
        self.check(guild_id, Some(name))?;
        if let Some(names) = self.commands.lock().unwrap().get_mut(&guild_id) {
            names.remove(name);
        }
        Ok(())
    }

    async fn list_registered(&self, guild_id: i64) -> Result<Vec<String>, RegistryError> {
        self.check(guild_id, None)?;
        Ok(self.registered(guild_id))
    }
}
