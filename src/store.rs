//! Durable, guild-scoped tag storage.
//!
//! `TagStore` owns the identity rules for tags: names are stored lowercase,
//! `(guild_id, name)` is unique among live tags, and every check-then-write
//! runs inside one database transaction so concurrent requests cannot slip a
//! duplicate past the existence check. The store knows nothing about the
//! chat platform; cross-guild policy (copyable flags, target quotas) belongs
//! to the coordinator.

use crate::constants::{COPYABLE_DEFAULT, MAX_TAGS_PER_GUILD};
use crate::error::TagError;
use crate::orm::tags;
use crate::tag_name::{default_description_for, validate_name};
use chrono::Utc;
use sea_orm::{
    entity::*, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

/// Handle over the tags table for one database.
///
/// Cheap to clone; the quota is fixed at construction (tests lower it to
/// exercise quota policy without filling fifty rows).
#[derive(Clone)]
pub struct TagStore {
    db: DatabaseConnection,
    quota: u64,
}

impl TagStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            quota: MAX_TAGS_PER_GUILD,
        }
    }

    /// A store with a non-default per-guild tag quota.
    pub fn with_quota(db: DatabaseConnection, quota: u64) -> Self {
        Self { db, quota }
    }

    pub fn quota(&self) -> u64 {
        self.quota
    }

    /// True iff a live tag with this (case-insensitive) name exists in the
    /// guild.
    pub async fn exists(&self, guild_id: i64, name: &str) -> Result<bool, TagError> {
        let count = Self::find_by_name(guild_id, name).count(&self.db).await?;
        Ok(count > 0)
    }

    /// The tag, or `None` if no live tag matches.
    pub async fn get(&self, guild_id: i64, name: &str) -> Result<Option<tags::Model>, TagError> {
        Ok(Self::find_by_name(guild_id, name).one(&self.db).await?)
    }

    /// All tags in a guild, in insertion order.
    pub async fn list_for(&self, guild_id: i64) -> Result<Vec<tags::Model>, TagError> {
        Ok(tags::Entity::find()
            .filter(tags::Column::GuildId.eq(guild_id))
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Every tag across every guild. Used only by resynchronization.
    pub async fn list_all(&self) -> Result<Vec<tags::Model>, TagError> {
        Ok(tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Number of live tags in a guild.
    pub async fn count(&self, guild_id: i64) -> Result<u64, TagError> {
        Ok(tags::Entity::find()
            .filter(tags::Column::GuildId.eq(guild_id))
            .count(&self.db)
            .await?)
    }

    /// True iff the guild is at or above its tag quota.
    pub async fn is_over_limit(&self, guild_id: i64) -> Result<bool, TagError> {
        Ok(self.count(guild_id).await? >= self.quota)
    }

    /// Create a tag. Validates the name and re-checks uniqueness inside the
    /// transaction; does NOT check quota — that is coordinator policy.
    ///
    /// A missing description is stored as the computed default, so every
    /// row carries the text it was registered remotely with.
    pub async fn create(
        &self,
        guild_id: i64,
        name: &str,
        description: Option<String>,
        copyable: Option<bool>,
        content: String,
    ) -> Result<tags::Model, TagError> {
        // Normalize at write time; lookups lowercase the query to match.
        let name = name.to_lowercase();
        if !validate_name(&name) {
            return Err(TagError::InvalidName(name));
        }
        if content.trim().is_empty() {
            return Err(TagError::MalformedInput(
                "tag content cannot be empty".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let taken = Self::find_by_name(guild_id, &name).count(&txn).await? > 0;
        if taken {
            txn.rollback().await?;
            return Err(TagError::AlreadyExists(name));
        }

        let tag = tags::ActiveModel {
            guild_id: Set(guild_id),
            name: Set(name.clone()),
            description: Set(Some(
                description.unwrap_or_else(|| default_description_for(&name)),
            )),
            copyable: Set(copyable.unwrap_or(COPYABLE_DEFAULT)),
            content: Set(content),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        let tag = tag.insert(&txn).await?;

        txn.commit().await?;
        Ok(tag)
    }

    /// Edit a tag's description, copyability and content in place. The name
    /// is immutable. Returns `None` when no tag matches.
    ///
    /// An absent `copyable` resets the flag to its default rather than
    /// preserving the stored value — longstanding behavior, kept on purpose.
    pub async fn edit(
        &self,
        guild_id: i64,
        name: &str,
        description: Option<String>,
        copyable: Option<bool>,
        content: String,
    ) -> Result<Option<tags::Model>, TagError> {
        let txn = self.db.begin().await?;

        let Some(tag) = Self::find_by_name(guild_id, name).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut tag: tags::ActiveModel = tag.into();
        tag.description = Set(description);
        tag.copyable = Set(copyable.unwrap_or(COPYABLE_DEFAULT));
        tag.content = Set(content);
        let tag = tag.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(tag))
    }

    /// Remove a tag. Returns whether one was removed.
    pub async fn delete(&self, guild_id: i64, name: &str) -> Result<bool, TagError> {
        let result = tags::Entity::delete_many()
            .filter(tags::Column::GuildId.eq(guild_id))
            .filter(tags::Column::Name.eq(name.to_lowercase()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Remove every tag in a guild. Returns the number removed.
    pub async fn clear(&self, guild_id: i64) -> Result<u64, TagError> {
        let result = tags::Entity::delete_many()
            .filter(tags::Column::GuildId.eq(guild_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Copy a tag into another guild as a brand-new row with the same
    /// name, description, copyability and content. `None` when the source
    /// tag is missing. Performs no copyable/uniqueness/quota checks.
    pub async fn copy_to(
        &self,
        guild_id: i64,
        name: &str,
        target_guild_id: i64,
    ) -> Result<Option<tags::Model>, TagError> {
        let txn = self.db.begin().await?;

        let Some(source) = Self::find_by_name(guild_id, name).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let copy = tags::ActiveModel {
            guild_id: Set(target_guild_id),
            name: Set(source.name.clone()),
            description: Set(source.description.clone()),
            copyable: Set(source.copyable),
            content: Set(source.content.clone()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        let copy = copy.insert(&txn).await?;

        txn.commit().await?;
        Ok(Some(copy))
    }

    /// Re-home a tag to another guild in place — same row, same id, no
    /// duplicate. `None` when the source tag is missing.
    pub async fn move_to(
        &self,
        guild_id: i64,
        name: &str,
        target_guild_id: i64,
    ) -> Result<Option<tags::Model>, TagError> {
        let txn = self.db.begin().await?;

        let Some(tag) = Self::find_by_name(guild_id, name).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut tag: tags::ActiveModel = tag.into();
        tag.guild_id = Set(target_guild_id);
        let tag = tag.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(tag))
    }

    // Names are stored lowercase, so case-insensitive lookup is a
    // lowercased exact match.
    fn find_by_name(guild_id: i64, name: &str) -> Select<tags::Entity> {
        tags::Entity::find()
            .filter(tags::Column::GuildId.eq(guild_id))
            .filter(tags::Column::Name.eq(name.to_lowercase()))
    }
}
