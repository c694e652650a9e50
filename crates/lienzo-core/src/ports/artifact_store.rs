//! Artifact store port definition.
//!
//! The store owns generated bytes once written; history records reference
//! artifacts by name only and never own them.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::artifact::Artifact;

/// Errors that can occur persisting or removing artifacts.
#[derive(Debug, Error)]
pub enum ArtifactStoreError {
    /// The fetched buffer was empty.
    #[error("artifact is empty")]
    Empty,

    /// The buffer did not look like a supported image format.
    #[error("unrecognized artifact content")]
    UnsupportedContent,

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Io(String),
}

/// Port for durable artifact storage.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Validate and persist `bytes` under a fresh collision-resistant name.
    ///
    /// Implementations must publish atomically: a crash mid-write may leave
    /// a temporary file behind but never a corrupt final artifact.
    async fn save(&self, bytes: &[u8]) -> Result<Artifact, ArtifactStoreError>;

    /// Remove an artifact by name. Idempotent: absence is not an error.
    /// Returns whether a file was actually deleted.
    async fn remove(&self, name: &str) -> Result<bool, ArtifactStoreError>;

    /// Whether an artifact with this name exists.
    async fn exists(&self, name: &str) -> Result<bool, ArtifactStoreError>;
}
