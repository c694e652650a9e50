//! SQLite persistence adapter for lienzo.
//!
//! Implements the core history and bonus repository ports over an sqlx
//! `SqlitePool`, and provides schema setup plus a composition factory.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::StoreFactory;
pub use repositories::{SqliteBonusRepository, SqliteHistoryRepository};
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
