//! Tag lifecycle orchestration.
//!
//! `TagCoordinator` sequences store mutations with remote command registry
//! calls and turns the outcome into structured reports the rendering layer
//! can present. Policy lives here: pre-check pipelines for single-tag
//! operations, per-item bucketing for bulk operations, and the resync pass
//! that realigns the remote registry with the tag table.
//!
//! The store is the source of truth. A registry call that fails after a
//! committed store write is never rolled back — it is logged, reflected in
//! the operation's `registry_synced` flag (or the item's `failed` bucket for
//! bulk operations) and healed by the next [`TagCoordinator::sync_guild_commands`]
//! pass.

use crate::error::TagError;
use crate::orm::tags;
use crate::registry::CommandRegistry;
use crate::store::TagStore;
use crate::tag_json::{self, TagData};
use crate::tag_name::{description_for, validate_name};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Result of a single mutating operation.
#[derive(Debug, Clone)]
pub struct TagOutcome {
    pub tag: tags::Model,
    /// Whether the remote registry reflects this mutation. `false` means
    /// the store write committed but the registry call failed; resync will
    /// converge it.
    pub registry_synced: bool,
}

/// Result of clearing a guild's tags.
#[derive(Debug, Clone)]
pub struct ClearOutcome {
    /// Names of the tags that were removed.
    pub removed: Vec<String>,
    pub registry_synced: bool,
}

/// Per-item dispositions of a bulk operation. Items land in exactly one
/// bucket; the batch itself never aborts on an item failure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: Vec<String>,
    pub already_exists: Vec<String>,
    pub over_limit: Vec<String>,
    pub not_copyable: Vec<String>,
    /// Import items that were unparseable or carried an invalid name.
    pub invalid: Vec<String>,
    /// Items that hit an unexpected store or registry failure.
    pub failed: Vec<String>,
}

impl BulkReport {
    pub fn total(&self) -> usize {
        self.succeeded.len()
            + self.already_exists.len()
            + self.over_limit.len()
            + self.not_copyable.len()
            + self.invalid.len()
            + self.failed.len()
    }
}

/// Result of a registry resynchronization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub guilds_synced: usize,
    /// Guilds whose registry could not be processed this pass.
    pub guilds_failed: usize,
    pub commands_registered: usize,
    pub commands_removed: usize,
}

/// Orchestrates tag mutations against the store and the remote command
/// registry. Callers are assumed to be authorized already; no permission
/// logic lives here.
pub struct TagCoordinator {
    store: TagStore,
    registry: Arc<dyn CommandRegistry>,
}

impl TagCoordinator {
    pub fn new(store: TagStore, registry: Arc<dyn CommandRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &TagStore {
        &self.store
    }

    /// Create a tag and register its guild command.
    ///
    /// Pre-checks, in order: name valid, name free in the guild, guild
    /// under quota.
    pub async fn create_tag(
        &self,
        guild_id: i64,
        name: &str,
        description: Option<String>,
        copyable: Option<bool>,
        content: String,
    ) -> Result<TagOutcome, TagError> {
        let name = name.to_lowercase();
        if !validate_name(&name) {
            return Err(TagError::InvalidName(name));
        }
        if self.store.exists(guild_id, &name).await? {
            return Err(TagError::AlreadyExists(name));
        }
        if self.store.is_over_limit(guild_id).await? {
            return Err(TagError::QuotaExceeded {
                guild_id,
                limit: self.store.quota(),
            });
        }

        let tag = self
            .store
            .create(guild_id, &name, description, copyable, content)
            .await?;
        let registry_synced = self.register_tag(&tag).await;

        Ok(TagOutcome {
            tag,
            registry_synced,
        })
    }

    /// Edit a tag's description, copyability and content. The name — and
    /// therefore the registered command — does not change, so there is no
    /// registry action.
    pub async fn edit_tag(
        &self,
        guild_id: i64,
        name: &str,
        description: Option<String>,
        copyable: Option<bool>,
        content: String,
    ) -> Result<tags::Model, TagError> {
        self.store
            .edit(guild_id, name, description, copyable, content)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))
    }

    /// Delete a tag and unregister its guild command.
    pub async fn delete_tag(&self, guild_id: i64, name: &str) -> Result<TagOutcome, TagError> {
        let tag = self
            .store
            .get(guild_id, name)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))?;

        self.store.delete(guild_id, name).await?;
        let registry_synced = self.unregister_name(guild_id, &tag.name).await;

        Ok(TagOutcome {
            tag,
            registry_synced,
        })
    }

    /// Delete every tag in a guild, unregistering each removed tag's
    /// command. Commands that never belonged to a tag are left alone.
    pub async fn clear_tags(&self, guild_id: i64) -> Result<ClearOutcome, TagError> {
        let removed: Vec<String> = self
            .store
            .list_for(guild_id)
            .await?
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        self.store.clear(guild_id).await?;

        let mut registry_synced = true;
        for name in &removed {
            registry_synced &= self.unregister_name(guild_id, name).await;
        }

        Ok(ClearOutcome {
            removed,
            registry_synced,
        })
    }

    /// Copy a tag to another guild and register the copy's command there.
    pub async fn copy_tag(
        &self,
        guild_id: i64,
        name: &str,
        target_guild_id: i64,
    ) -> Result<TagOutcome, TagError> {
        let source = self.check_transfer(guild_id, name, target_guild_id).await?;

        let tag = self
            .store
            .copy_to(guild_id, &source.name, target_guild_id)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))?;
        let registry_synced = self.register_tag(&tag).await;

        Ok(TagOutcome {
            tag,
            registry_synced,
        })
    }

    /// Move a tag to another guild: the same row is re-homed, the command
    /// is unregistered at the source and registered at the target.
    pub async fn move_tag(
        &self,
        guild_id: i64,
        name: &str,
        target_guild_id: i64,
    ) -> Result<TagOutcome, TagError> {
        let source = self.check_transfer(guild_id, name, target_guild_id).await?;

        let tag = self
            .store
            .move_to(guild_id, &source.name, target_guild_id)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))?;

        let mut registry_synced = self.unregister_name(guild_id, &tag.name).await;
        registry_synced &= self.register_tag(&tag).await;

        Ok(TagOutcome {
            tag,
            registry_synced,
        })
    }

    /// All tags in a guild.
    pub async fn list_tags(&self, guild_id: i64) -> Result<Vec<tags::Model>, TagError> {
        self.store.list_for(guild_id).await
    }

    /// A single tag's full record.
    pub async fn tag_info(&self, guild_id: i64, name: &str) -> Result<tags::Model, TagError> {
        self.store
            .get(guild_id, name)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))
    }

    /// The payload to send when a tag is triggered.
    pub async fn trigger(&self, guild_id: i64, name: &str) -> Result<String, TagError> {
        Ok(self.tag_info(guild_id, name).await?.content)
    }

    /// Export one tag as its JSON wire shape.
    pub async fn export_tag(&self, guild_id: i64, name: &str) -> Result<Value, TagError> {
        let tag = self.tag_info(guild_id, name).await?;
        Ok(tag_json::export_tag(&tag))
    }

    /// Export every tag in a guild as a JSON array.
    pub async fn export_all(&self, guild_id: i64) -> Result<Value, TagError> {
        let tags = self.store.list_for(guild_id).await?;
        Ok(tag_json::export_tags(&tags))
    }

    /// Import a single tag from JSON. With `overwrite`, an existing tag of
    /// the same name is deleted first and replaced.
    pub async fn import_tag(
        &self,
        guild_id: i64,
        raw: &str,
        overwrite: bool,
    ) -> Result<TagOutcome, TagError> {
        let mut items = tag_json::parse_import(raw)?;
        if items.len() != 1 {
            return Err(TagError::MalformedInput(
                "expected a single tag object".to_string(),
            ));
        }
        let mut data = TagData::from_value(&items.remove(0))?;
        data.name = data.name.to_lowercase();

        if !validate_name(&data.name) {
            return Err(TagError::InvalidName(data.name));
        }
        if !overwrite && self.store.exists(guild_id, &data.name).await? {
            return Err(TagError::AlreadyExists(data.name));
        }
        if self.store.is_over_limit(guild_id).await? {
            return Err(TagError::QuotaExceeded {
                guild_id,
                limit: self.store.quota(),
            });
        }
        if overwrite {
            self.store.delete(guild_id, &data.name).await?;
        }

        let tag = self
            .store
            .create(
                guild_id,
                &data.name,
                data.description,
                data.copyable,
                data.content,
            )
            .await?;
        let registry_synced = self.register_tag(&tag).await;

        Ok(TagOutcome {
            tag,
            registry_synced,
        })
    }

    /// Import a batch of tags from JSON (single object or array). Items are
    /// processed in input order; an item's failure never aborts the batch.
    /// Quota is re-read before each item, so a batch fills a guild to
    /// exactly its quota and buckets the remainder as over-limit.
    pub async fn import_bulk(
        &self,
        guild_id: i64,
        raw: &str,
        overwrite: bool,
    ) -> Result<BulkReport, TagError> {
        let items = tag_json::parse_import(raw)?;
        let mut report = BulkReport::default();

        for item in items {
            let item_label = tag_json::item_name(&item);

            let mut data = match TagData::from_value(&item) {
                Ok(data) => data,
                Err(_) => {
                    report.invalid.push(item_label);
                    continue;
                }
            };
            data.name = data.name.to_lowercase();
            if !validate_name(&data.name) {
                report.invalid.push(data.name);
                continue;
            }
            if !overwrite && self.store.exists(guild_id, &data.name).await? {
                report.already_exists.push(data.name);
                continue;
            }
            if self.store.is_over_limit(guild_id).await? {
                report.over_limit.push(data.name);
                continue;
            }
            if overwrite {
                self.store.delete(guild_id, &data.name).await?;
            }

            let name = data.name.clone();
            let tag = match self
                .store
                .create(
                    guild_id,
                    &data.name,
                    data.description,
                    data.copyable,
                    data.content,
                )
                .await
            {
                Ok(tag) => tag,
                Err(err) => {
                    log::warn!("bulk import of '{}' failed: {}", name, err);
                    report.failed.push(name);
                    continue;
                }
            };

            if self.register_tag(&tag).await {
                report.succeeded.push(tag.name);
            } else {
                report.failed.push(tag.name);
            }
        }

        Ok(report)
    }

    /// Copy every tag in the source guild to the target guild.
    pub async fn copy_all(
        &self,
        guild_id: i64,
        target_guild_id: i64,
    ) -> Result<BulkReport, TagError> {
        self.bulk_transfer(guild_id, target_guild_id, false).await
    }

    /// Move every tag in the source guild to the target guild.
    pub async fn move_all(
        &self,
        guild_id: i64,
        target_guild_id: i64,
    ) -> Result<BulkReport, TagError> {
        self.bulk_transfer(guild_id, target_guild_id, true).await
    }

    /// Reconcile the remote registry with the tag table: for every guild
    /// owning at least one tag, drop registered commands without a matching
    /// live tag, then (re-)register a command per live tag. Idempotent; a
    /// guild's failure does not stop the pass.
    pub async fn sync_guild_commands(&self) -> Result<SyncReport, TagError> {
        let mut by_guild: BTreeMap<i64, Vec<tags::Model>> = BTreeMap::new();
        for tag in self.store.list_all().await? {
            by_guild.entry(tag.guild_id).or_default().push(tag);
        }

        let mut report = SyncReport::default();
        for (guild_id, guild_tags) in by_guild {
            match self.sync_one_guild(guild_id, &guild_tags).await {
                Ok((registered, removed)) => {
                    report.guilds_synced += 1;
                    report.commands_registered += registered;
                    report.commands_removed += removed;
                }
                Err(err) => {
                    log::warn!("command resync for guild {} failed: {}", guild_id, err);
                    report.guilds_failed += 1;
                }
            }
        }

        log::info!(
            "command resync: {} guilds synced, {} failed, {} registered, {} removed",
            report.guilds_synced,
            report.guilds_failed,
            report.commands_registered,
            report.commands_removed
        );
        Ok(report)
    }

    async fn sync_one_guild(
        &self,
        guild_id: i64,
        guild_tags: &[tags::Model],
    ) -> Result<(usize, usize), TagError> {
        let live: HashSet<&str> = guild_tags.iter().map(|tag| tag.name.as_str()).collect();

        let mut removed = 0;
        for name in self.registry.list_registered(guild_id).await? {
            if !live.contains(name.as_str()) {
                self.registry.unregister(guild_id, &name).await?;
                removed += 1;
            }
        }

        let mut registered = 0;
        for tag in guild_tags {
            self.registry
                .register(guild_id, &tag.name, &description_for(Some(tag), &tag.name))
                .await?;
            registered += 1;
        }

        Ok((registered, removed))
    }

    /// Shared pre-check pipeline for copy/move. Checked in order: source
    /// tag exists, target differs from source, name free in target, target
    /// under quota, source tag copyable.
    async fn check_transfer(
        &self,
        guild_id: i64,
        name: &str,
        target_guild_id: i64,
    ) -> Result<tags::Model, TagError> {
        let source = self
            .store
            .get(guild_id, name)
            .await?
            .ok_or_else(|| TagError::NotFound(name.to_string()))?;

        if target_guild_id == guild_id {
            return Err(TagError::InvalidTarget(target_guild_id));
        }
        if self.store.exists(target_guild_id, &source.name).await? {
            return Err(TagError::AlreadyExists(source.name));
        }
        if self.store.is_over_limit(target_guild_id).await? {
            return Err(TagError::QuotaExceeded {
                guild_id: target_guild_id,
                limit: self.store.quota(),
            });
        }
        if !source.copyable {
            return Err(TagError::NotCopyable(source.name));
        }

        Ok(source)
    }

    async fn bulk_transfer(
        &self,
        guild_id: i64,
        target_guild_id: i64,
        moving: bool,
    ) -> Result<BulkReport, TagError> {
        if target_guild_id == guild_id {
            return Err(TagError::InvalidTarget(target_guild_id));
        }

        let mut report = BulkReport::default();
        for tag in self.store.list_for(guild_id).await? {
            if self.store.exists(target_guild_id, &tag.name).await? {
                report.already_exists.push(tag.name);
                continue;
            }
            if self.store.is_over_limit(target_guild_id).await? {
                report.over_limit.push(tag.name);
                continue;
            }
            if !tag.copyable {
                report.not_copyable.push(tag.name);
                continue;
            }

            let result = if moving {
                self.store
                    .move_to(guild_id, &tag.name, target_guild_id)
                    .await
            } else {
                self.store
                    .copy_to(guild_id, &tag.name, target_guild_id)
                    .await
            };
            let transferred = match result {
                Ok(Some(transferred)) => transferred,
                Ok(None) => {
                    report.failed.push(tag.name);
                    continue;
                }
                Err(err) => {
                    log::warn!("bulk transfer of '{}' failed: {}", tag.name, err);
                    report.failed.push(tag.name);
                    continue;
                }
            };

            let mut synced = true;
            if moving {
                synced &= self.unregister_name(guild_id, &transferred.name).await;
            }
            synced &= self.register_tag(&transferred).await;

            if synced {
                report.succeeded.push(transferred.name);
            } else {
                report.failed.push(transferred.name);
            }
        }

        Ok(report)
    }

    /// Register a tag's guild command. Returns whether the registry call
    /// succeeded; failure is logged, never escalated — the store write it
    /// follows has already committed.
    async fn register_tag(&self, tag: &tags::Model) -> bool {
        let description = description_for(Some(tag), &tag.name);
        match self
            .registry
            .register(tag.guild_id, &tag.name, &description)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "failed to register command '{}' in guild {}: {}",
                    tag.name,
                    tag.guild_id,
                    err
                );
                false
            }
        }
    }

    async fn unregister_name(&self, guild_id: i64, name: &str) -> bool {
        match self.registry.unregister(guild_id, name).await {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "failed to unregister command '{}' in guild {}: {}",
                    name,
                    guild_id,
                    err
                );
                false
            }
        }
    }
}
