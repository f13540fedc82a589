//! Test database setup and management
#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Open a fresh in-memory SQLite database with the tags schema applied.
///
/// Every caller gets a fully isolated database, so tests can run in
/// parallel without stepping on each other. The pool is pinned to a single
/// connection: each new SQLite `:memory:` connection would otherwise be a
/// brand-new empty database.
pub async fn setup_test_database() -> Result<DatabaseConnection, DbErr> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await?;

    tagbot::db::create_schema(&db).await?;
    Ok(db)
}
