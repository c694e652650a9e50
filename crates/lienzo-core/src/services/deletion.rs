//! Deletion coordinator: removes an artifact and its ledger entry together.

use std::sync::Arc;

use crate::errors::DeleteError;
use crate::ports::artifact_store::ArtifactStore;
use crate::ports::history::HistoryRepository;

/// Coordinates deletion across artifact storage and the history ledger.
///
/// File removal is idempotent; the ledger record decides whether the
/// operation "existed". The two deletions are not transactional: a ledger
/// failure after the file is gone is logged and reported as success.
pub struct DeletionService {
    store: Arc<dyn ArtifactStore>,
    history: Arc<dyn HistoryRepository>,
}

impl DeletionService {
    /// Create a new deletion service.
    pub fn new(store: Arc<dyn ArtifactStore>, history: Arc<dyn HistoryRepository>) -> Self {
        Self { store, history }
    }

    /// Delete the artifact named `saved_as` and its matching history record.
    ///
    /// Returns `NotFound` when no record matches `(user_id, saved_as)`,
    /// whether or not the file existed.
    pub async fn delete(&self, user_id: &str, saved_as: &str) -> Result<(), DeleteError> {
        let file_removed = match self.store.remove(saved_as).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(
                    target: "lienzo.delete",
                    user_id,
                    saved_as,
                    error = %e,
                    "artifact removal failed; continuing with ledger delete"
                );
                false
            }
        };

        match self.history.delete(user_id, saved_as).await {
            Ok(0) => Err(DeleteError::NotFound {
                saved_as: saved_as.to_string(),
            }),
            Ok(rows) => {
                tracing::info!(
                    target: "lienzo.delete",
                    user_id,
                    saved_as,
                    rows,
                    file_removed,
                    "generation deleted"
                );
                Ok(())
            }
            Err(e) if file_removed => {
                // The file is already gone; report success and log the
                // now-orphaned record.
                tracing::error!(
                    target: "lienzo.delete",
                    user_id,
                    saved_as,
                    error = %e,
                    "ledger delete failed after artifact removal"
                );
                Ok(())
            }
            Err(e) => Err(DeleteError::Downstream(e.to_string())),
        }
    }
}
