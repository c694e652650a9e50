//! The generation pipeline: submit, poll, persist, record.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::generation::{
    GenerationOutcome, GenerationParams, GenerationRequest, JobState, PredictionJob,
};
use crate::domain::history::NewHistoryRecord;
use crate::domain::style::Style;
use crate::errors::GenerateError;
use crate::ports::artifact_store::{ArtifactStore, ArtifactStoreError};
use crate::ports::history::HistoryRepository;
use crate::ports::predictor::{PredictionSnapshot, PredictionStatus, Predictor};
use crate::services::quota::{QuotaError, QuotaService};

/// Tunables for the polling loop and the fixed generation parameters.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Pause between status queries.
    pub poll_interval: Duration,
    /// Hard ceiling on status queries per job.
    pub max_poll_attempts: u32,
    /// Fixed parameters sent with every prediction.
    pub params: GenerationParams,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1500),
            max_poll_attempts: 20,
            params: GenerationParams::default(),
        }
    }
}

/// Orchestrates one generation request end to end.
///
/// The pipeline is: validate, resolve style, reserve a quota slot, submit,
/// poll to a terminal state, fetch and persist the artifact, append the
/// history record, release the slot. The artifact write strictly precedes
/// the history append; a ledger failure after the write is logged and the
/// response still succeeds.
pub struct GenerationService {
    predictor: Arc<dyn Predictor>,
    store: Arc<dyn ArtifactStore>,
    history: Arc<dyn HistoryRepository>,
    quota: Arc<QuotaService>,
    config: GenerationConfig,
}

impl GenerationService {
    /// Create a generation service.
    pub fn new(
        predictor: Arc<dyn Predictor>,
        store: Arc<dyn ArtifactStore>,
        history: Arc<dyn HistoryRepository>,
        quota: Arc<QuotaService>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            predictor,
            store,
            history,
            quota,
            config,
        }
    }

    /// Run one generation request to completion.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerateError> {
        let prompt = request.prompt.trim().to_string();
        let user_id = request.user_id.trim().to_string();
        if prompt.is_empty() || user_id.is_empty() {
            return Err(GenerateError::Validation(
                "prompt and userId are required".to_string(),
            ));
        }

        let style = Style::resolve(request.style.as_deref());
        let effective_prompt = style.apply(&prompt);

        let reservation = self.quota.try_reserve(&user_id).await.map_err(|e| match e {
            QuotaError::Exhausted { restantes } => GenerateError::QuotaExceeded { restantes },
            QuotaError::Downstream(msg) => GenerateError::Downstream(msg),
        })?;

        let handle = self
            .predictor
            .create(&effective_prompt, &self.config.params)
            .await
            .map_err(|e| GenerateError::Submission(e.to_string()))?;
        let mut job = PredictionJob::new(handle);
        tracing::info!(
            target: "lienzo.generate",
            user_id,
            job_id = %job.handle.id,
            style = %style,
            "prediction submitted"
        );

        let snapshot = self.poll_to_terminal(&mut job).await?;
        let image_url = snapshot.output.first().cloned().ok_or_else(|| {
            GenerateError::InvalidArtifact("prediction succeeded with no output".to_string())
        })?;

        let bytes = self
            .predictor
            .fetch(&image_url)
            .await
            .map_err(|e| GenerateError::InvalidArtifact(format!("could not fetch output: {e}")))?;

        let artifact = self.store.save(&bytes).await.map_err(|e| match e {
            ArtifactStoreError::Io(msg) => GenerateError::Storage(msg),
            other => GenerateError::InvalidArtifact(other.to_string()),
        })?;
        tracing::info!(
            target: "lienzo.generate",
            user_id,
            job_id = %job.handle.id,
            saved_as = %artifact.name,
            attempts = job.attempts,
            "artifact persisted"
        );

        // Write-before-record: the artifact is durable at this point. An
        // append failure leaves an orphaned artifact (garbage-collectable),
        // never a record without an artifact.
        let record = NewHistoryRecord {
            user_id: user_id.clone(),
            prompt,
            image_url: image_url.clone(),
            saved_as: artifact.name.clone(),
            created_at: Utc::now(),
        };
        if let Err(e) = self.history.append(record).await {
            tracing::warn!(
                target: "lienzo.generate",
                user_id,
                saved_as = %artifact.name,
                error = %e,
                "history append failed after artifact write; artifact kept"
            );
        }
        // Release the quota slot only once the append has landed.
        drop(reservation);

        Ok(GenerationOutcome {
            image_url,
            saved_as: artifact.name,
        })
    }

    /// Poll until a terminal status or the attempt budget runs out.
    ///
    /// This is the only polling loop for the job; the request owns it
    /// exclusively.
    async fn poll_to_terminal(
        &self,
        job: &mut PredictionJob,
    ) -> Result<PredictionSnapshot, GenerateError> {
        job.state = JobState::Polling;
        while job.attempts < self.config.max_poll_attempts {
            tokio::time::sleep(self.config.poll_interval).await;
            job.attempts += 1;

            let snapshot = match self.predictor.poll(&job.handle).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    job.state = JobState::Failed;
                    return Err(GenerateError::PredictionFailed(format!(
                        "status query failed: {e}"
                    )));
                }
            };

            match snapshot.status {
                PredictionStatus::Succeeded => {
                    job.state = JobState::Succeeded;
                    tracing::debug!(
                        target: "lienzo.generate",
                        job_id = %job.handle.id,
                        attempts = job.attempts,
                        "prediction succeeded"
                    );
                    return Ok(snapshot);
                }
                PredictionStatus::Failed | PredictionStatus::Canceled => {
                    job.state = JobState::Failed;
                    let detail = snapshot
                        .error
                        .unwrap_or_else(|| "provider reported failure".to_string());
                    return Err(GenerateError::PredictionFailed(detail));
                }
                PredictionStatus::Starting | PredictionStatus::Processing => {}
            }
        }

        job.state = JobState::TimedOut;
        tracing::warn!(
            target: "lienzo.generate",
            job_id = %job.handle.id,
            attempts = job.attempts,
            "gave up polling; prediction may still complete upstream"
        );
        Err(GenerateError::PollTimeout {
            attempts: job.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::artifact::{Artifact, MediaType};
    use crate::domain::bonus::BonusRecord;
    use crate::domain::history::HistoryRecord;
    use crate::ports::bonus::{BonusError, BonusRepository};
    use crate::ports::history::HistoryError;
    use crate::ports::predictor::{PredictionHandle, PredictorError};

    struct ScriptedPredictor {
        create_result: Option<PredictorError>,
        statuses: StdMutex<VecDeque<PredictionStatus>>,
        output: Vec<String>,
        bytes: Vec<u8>,
    }

    impl ScriptedPredictor {
        fn succeeding(after: usize) -> Self {
            let mut statuses: VecDeque<_> =
                std::iter::repeat_n(PredictionStatus::Processing, after).collect();
            statuses.push_back(PredictionStatus::Succeeded);
            Self {
                create_result: None,
                statuses: StdMutex::new(statuses),
                output: vec!["https://predictor.test/out/1.png".to_string()],
                bytes: b"\x89PNG\r\n\x1a\nfake".to_vec(),
            }
        }

        fn with_status(status: PredictionStatus) -> Self {
            Self {
                create_result: None,
                statuses: StdMutex::new(VecDeque::from([status])),
                output: Vec::new(),
                bytes: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Predictor for ScriptedPredictor {
        async fn create(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<PredictionHandle, PredictorError> {
            if let Some(err) = &self.create_result {
                return Err(PredictorError::Submission(err.to_string()));
            }
            Ok(PredictionHandle {
                id: "p-1".to_string(),
                poll_url: "mem://p-1".to_string(),
            })
        }

        async fn poll(
            &self,
            _handle: &PredictionHandle,
        ) -> Result<PredictionSnapshot, PredictorError> {
            let status = {
                let mut statuses = self.statuses.lock().unwrap();
                if statuses.len() > 1 {
                    statuses.pop_front().unwrap()
                } else {
                    // Keep the final scripted status so the predictor can
                    // serve repeated generations within one test.
                    statuses
                        .front()
                        .copied()
                        .unwrap_or(PredictionStatus::Processing)
                }
            };
            let output = if status == PredictionStatus::Succeeded {
                self.output.clone()
            } else {
                Vec::new()
            };
            Ok(PredictionSnapshot {
                status,
                output,
                error: (status == PredictionStatus::Failed).then(|| "boom".to_string()),
            })
        }

        async fn fetch(&self, _output_url: &str) -> Result<Vec<u8>, PredictorError> {
            Ok(self.bytes.clone())
        }
    }

    struct MemStore {
        saved: StdMutex<Vec<String>>,
        next: AtomicUsize,
    }

    impl MemStore {
        fn new() -> Self {
            Self {
                saved: StdMutex::new(Vec::new()),
                next: AtomicUsize::new(1),
            }
        }
    }

    #[async_trait]
    impl ArtifactStore for MemStore {
        async fn save(&self, bytes: &[u8]) -> Result<Artifact, ArtifactStoreError> {
            if bytes.is_empty() {
                return Err(ArtifactStoreError::Empty);
            }
            let name = format!("image_{}.png", self.next.fetch_add(1, Ordering::SeqCst));
            self.saved.lock().unwrap().push(name.clone());
            Ok(Artifact {
                name,
                media_type: MediaType::Png,
                len: bytes.len() as u64,
            })
        }

        async fn remove(&self, name: &str) -> Result<bool, ArtifactStoreError> {
            let mut saved = self.saved.lock().unwrap();
            let before = saved.len();
            saved.retain(|n| n != name);
            Ok(saved.len() < before)
        }

        async fn exists(&self, name: &str) -> Result<bool, ArtifactStoreError> {
            Ok(self.saved.lock().unwrap().iter().any(|n| n == name))
        }
    }

    struct MemHistory {
        records: StdMutex<Vec<HistoryRecord>>,
        fail_append: bool,
    }

    impl MemHistory {
        fn new() -> Self {
            Self {
                records: StdMutex::new(Vec::new()),
                fail_append: false,
            }
        }
    }

    #[async_trait]
    impl HistoryRepository for MemHistory {
        async fn append(&self, record: NewHistoryRecord) -> Result<i64, HistoryError> {
            if self.fail_append {
                return Err(HistoryError::Database("insert failed".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            let id = records.len() as i64 + 1;
            records.push(HistoryRecord {
                id,
                user_id: record.user_id,
                prompt: record.prompt,
                image_url: record.image_url,
                saved_as: record.saved_as,
                created_at: record.created_at,
            });
            Ok(id)
        }

        async fn list_by_user(&self, user_id: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn count_since(
            &self,
            user_id: &str,
            since: DateTime<Utc>,
        ) -> Result<i64, HistoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.user_id == user_id && r.created_at >= since)
                .count() as i64)
        }

        async fn delete(&self, user_id: &str, saved_as: &str) -> Result<u64, HistoryError> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| !(r.user_id == user_id && r.saved_as == saved_as));
            Ok((before - records.len()) as u64)
        }
    }

    struct NoBonus;

    #[async_trait]
    impl BonusRepository for NoBonus {
        async fn get(&self, _user_id: &str) -> Result<Option<BonusRecord>, BonusError> {
            Ok(None)
        }

        async fn upsert(&self, _record: &BonusRecord) -> Result<(), BonusError> {
            Ok(())
        }
    }

    struct Fixture {
        service: GenerationService,
        store: Arc<MemStore>,
        history: Arc<MemHistory>,
    }

    fn fixture(predictor: ScriptedPredictor, history: MemHistory, max_attempts: u32) -> Fixture {
        let store = Arc::new(MemStore::new());
        let history = Arc::new(history);
        let quota = Arc::new(QuotaService::new(
            Arc::clone(&history) as Arc<dyn HistoryRepository>,
            Arc::new(NoBonus),
            3,
        ));
        let config = GenerationConfig {
            poll_interval: Duration::ZERO,
            max_poll_attempts: max_attempts,
            params: GenerationParams::default(),
        };
        let service = GenerationService::new(
            Arc::new(predictor),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            Arc::clone(&history) as Arc<dyn HistoryRepository>,
            quota,
            config,
        );
        Fixture {
            service,
            store,
            history,
        }
    }

    fn request(prompt: &str, user: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: prompt.to_string(),
            style: None,
            user_id: user.to_string(),
        }
    }

    #[tokio::test]
    async fn successful_generation_persists_artifact_then_record() {
        let fx = fixture(ScriptedPredictor::succeeding(2), MemHistory::new(), 20);
        let outcome = fx.service.generate(request("a red fox", "ana")).await.unwrap();

        assert_eq!(outcome.image_url, "https://predictor.test/out/1.png");
        assert!(fx.store.exists(&outcome.saved_as).await.unwrap());

        let records = fx.history.list_by_user("ana").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].prompt, "a red fox");
        assert_eq!(records[0].saved_as, outcome.saved_as);
        assert_eq!(records[0].image_url, outcome.image_url);
    }

    #[tokio::test]
    async fn empty_prompt_is_a_validation_error() {
        let fx = fixture(ScriptedPredictor::succeeding(0), MemHistory::new(), 20);
        let err = fx.service.generate(request("   ", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_user_is_a_validation_error() {
        let fx = fixture(ScriptedPredictor::succeeding(0), MemHistory::new(), 20);
        let err = fx.service.generate(request("a fox", "")).await.unwrap_err();
        assert!(matches!(err, GenerateError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_and_persists_nothing() {
        let fx = fixture(
            ScriptedPredictor::with_status(PredictionStatus::Failed),
            MemHistory::new(),
            20,
        );
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::PredictionFailed(_)));
        assert!(fx.history.list_by_user("ana").await.unwrap().is_empty());
        assert!(fx.store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn canceled_counts_as_failure() {
        let fx = fixture(
            ScriptedPredictor::with_status(PredictionStatus::Canceled),
            MemHistory::new(),
            20,
        );
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::PredictionFailed(_)));
    }

    #[tokio::test]
    async fn attempt_budget_exhaustion_times_out() {
        let predictor = ScriptedPredictor {
            create_result: None,
            statuses: StdMutex::new(VecDeque::new()), // always Processing
            output: Vec::new(),
            bytes: Vec::new(),
        };
        let fx = fixture(predictor, MemHistory::new(), 5);
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::PollTimeout { attempts: 5 }));
    }

    #[tokio::test]
    async fn success_with_no_output_is_an_invalid_artifact() {
        let mut predictor = ScriptedPredictor::succeeding(0);
        predictor.output.clear();
        let fx = fixture(predictor, MemHistory::new(), 20);
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidArtifact(_)));
    }

    #[tokio::test]
    async fn empty_fetched_bytes_are_an_invalid_artifact() {
        let mut predictor = ScriptedPredictor::succeeding(0);
        predictor.bytes.clear();
        let fx = fixture(predictor, MemHistory::new(), 20);
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidArtifact(_)));
    }

    #[tokio::test]
    async fn ledger_failure_after_artifact_write_still_succeeds() {
        let history = MemHistory {
            records: StdMutex::new(Vec::new()),
            fail_append: true,
        };
        let fx = fixture(ScriptedPredictor::succeeding(0), history, 20);
        let outcome = fx.service.generate(request("a fox", "ana")).await.unwrap();
        // Artifact kept, record missing: the accepted inconsistency.
        assert!(fx.store.exists(&outcome.saved_as).await.unwrap());
        assert!(fx.history.list_by_user("ana").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn quota_exhaustion_blocks_the_fourth_request() {
        let fx = fixture(ScriptedPredictor::succeeding(0), MemHistory::new(), 20);
        for _ in 0..3 {
            fx.service.generate(request("a fox", "ana")).await.unwrap();
        }
        let err = fx.service.generate(request("a fox", "ana")).await.unwrap_err();
        assert!(matches!(err, GenerateError::QuotaExceeded { restantes: 0 }));
        // Another user is unaffected
        fx.service.generate(request("a fox", "bea")).await.unwrap();
    }
}
