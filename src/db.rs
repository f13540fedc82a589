//! Database connection and schema bootstrap.
//!
//! There is deliberately no global pool here: callers connect and hand the
//! `DatabaseConnection` to whatever needs it, which keeps the store and
//! coordinator swappable against an in-memory database in tests.

use crate::orm::tags;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

/// Connect to the database at the given URL.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(url).await
}

/// Connect using the `DATABASE_URL` environment variable, reading a `.env`
/// file first if one is present.
pub async fn connect_from_env() -> Result<DatabaseConnection, DbErr> {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL must be set".to_string()))?;
    connect(&url).await
}

/// Create the tags table and its indexes if they do not exist.
///
/// The unique index over `(guild_id, name)` is the database-level backstop
/// for the uniqueness checks the store performs inside its transactions.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(tags::Entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    let mut guild_idx = Index::create();
    guild_idx
        .name("idx_tags_guild_id")
        .table(tags::Entity)
        .col(tags::Column::GuildId)
        .if_not_exists();
    db.execute(builder.build(&guild_idx)).await?;

    let mut name_idx = Index::create();
    name_idx
        .name("idx_tags_guild_id_name")
        .table(tags::Entity)
        .col(tags::Column::GuildId)
        .col(tags::Column::Name)
        .unique()
        .if_not_exists();
    db.execute(builder.build(&name_idx)).await?;

    Ok(())
}
