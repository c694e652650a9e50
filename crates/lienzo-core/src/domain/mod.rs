//! Domain types for lienzo.
//!
//! These types model generation requests, prediction jobs, persisted
//! artifacts, and per-user quota state, independent of any infrastructure
//! concerns.

pub mod artifact;
pub mod bonus;
pub mod generation;
pub mod history;
pub mod style;

pub use artifact::{Artifact, MediaType};
pub use bonus::BonusRecord;
pub use generation::{
    GenerationOutcome, GenerationParams, GenerationRequest, JobState, PredictionJob,
};
pub use history::{HistoryRecord, NewHistoryRecord};
pub use style::Style;
