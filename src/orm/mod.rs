//! SeaORM entities

pub mod tags;
