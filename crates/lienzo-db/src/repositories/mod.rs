//! `SQLite` implementations of the core repository ports.

pub mod sqlite_bonus_repository;
pub mod sqlite_history_repository;

pub use sqlite_bonus_repository::SqliteBonusRepository;
pub use sqlite_history_repository::SqliteHistoryRepository;
