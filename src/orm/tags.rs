//! SeaORM Entity for the tags table

use sea_orm::entity::prelude::*;

/// A guild-scoped tag row.
///
/// `name` is stored lowercase; `(guild_id, name)` carries a unique index
/// (see `db::create_schema`). `guild_id` only ever changes when a tag is
/// moved to another guild — the row keeps its identity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub guild_id: i64,
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub copyable: bool,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
