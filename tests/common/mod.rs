pub mod database;
pub mod fixtures;
pub mod registry;
