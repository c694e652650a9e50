//! Core domain and orchestration logic for lienzo.
//!
//! This crate contains the domain types, the port traits that adapters
//! implement, and the services that coordinate a generation request from
//! prompt to persisted artifact. It performs no I/O of its own; everything
//! external arrives through injected ports.

pub mod domain;
pub mod errors;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Artifact, BonusRecord, GenerationOutcome, GenerationParams, GenerationRequest, HistoryRecord,
    JobState, MediaType, NewHistoryRecord, PredictionJob, Style,
};
pub use errors::{DeleteError, GenerateError};
pub use ports::{
    ArtifactStore, ArtifactStoreError, BonusError, BonusRepository, HistoryError,
    HistoryRepository, Predictor, PredictorError, PredictionHandle, PredictionSnapshot,
    PredictionStatus,
};
pub use services::{
    BonusService, DeletionService, GenerationConfig, GenerationService, QuotaError,
    QuotaReservation, QuotaService, QuotaStatus, start_of_local_day,
};
