//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the core expects from infrastructure. They
//! contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - No filesystem implementation details
//! - Repository traits are minimal and CRUD-focused

pub mod artifact_store;
pub mod bonus;
pub mod history;
pub mod predictor;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use bonus::{BonusError, BonusRepository};
pub use history::{HistoryError, HistoryRepository};
pub use predictor::{
    Predictor, PredictorError, PredictionHandle, PredictionSnapshot, PredictionStatus,
};
