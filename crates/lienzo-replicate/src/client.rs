//! Predictor client over the Replicate-style HTTP API.
//!
//! Submissions are sent once and never retried; poll and fetch are read
//! paths and use exponential backoff for transient errors.

use async_trait::async_trait;
use url::Url;

use lienzo_core::domain::generation::GenerationParams;
use lienzo_core::ports::predictor::{
    PredictionHandle, PredictionSnapshot, PredictionStatus, Predictor, PredictorError,
};

use crate::config::ReplicateConfig;
use crate::error::{ReplicateError, ReplicateResult};
use crate::wire::{parse_status, CreatePredictionRequest, PredictionInput, PredictionResponse};

/// Production predictor client using reqwest.
pub struct ReplicateClient {
    client: reqwest::Client,
    config: ReplicateConfig,
}

impl ReplicateClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ReplicateConfig) -> ReplicateResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    fn auth_value(&self) -> String {
        format!("Token {}", self.config.token)
    }

    /// GET a URL with automatic retry for transient errors.
    ///
    /// 5xx responses and network errors are retried with exponential
    /// backoff; 4xx responses fail immediately.
    async fn fetch_with_retry(&self, url: &Url) -> ReplicateResult<reqwest::Response> {
        let mut last_error: Option<ReplicateError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tokio::time::sleep(delay).await;
            }

            let request = self
                .client
                .get(url.as_str())
                .header("Authorization", self.auth_value());

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    if status.is_server_error() && attempt < self.config.max_retries {
                        tracing::debug!(
                            target: "lienzo.replicate",
                            status = status.as_u16(),
                            attempt,
                            "transient API error, will retry"
                        );
                        last_error = Some(ReplicateError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    return Err(ReplicateError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    if attempt < self.config.max_retries {
                        tracing::debug!(
                            target: "lienzo.replicate",
                            attempt,
                            error = %e,
                            "network error, will retry"
                        );
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ReplicateError::InvalidResponse {
            message: "unknown error during fetch".to_string(),
        }))
    }
}

/// Extract a poll handle from a create response.
///
/// A usable submission must carry both an id and a poll URL; anything
/// else is treated as rejected.
fn handle_from(response: PredictionResponse) -> ReplicateResult<PredictionHandle> {
    let id = response
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ReplicateError::SubmissionRejected {
            message: "create response carried no prediction id".to_string(),
        })?;

    let poll_url = response
        .urls
        .and_then(|urls| urls.get)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ReplicateError::SubmissionRejected {
            message: format!("create response for {id} carried no poll URL"),
        })?;

    Ok(PredictionHandle { id, poll_url })
}

/// Convert a poll response into a snapshot.
///
/// Unknown status strings are treated as still processing so an evolving
/// provider vocabulary never fails a poll loop.
fn snapshot_from(response: PredictionResponse) -> ReplicateResult<PredictionSnapshot> {
    let raw = response
        .status
        .ok_or_else(|| ReplicateError::InvalidResponse {
            message: "poll response carried no status field".to_string(),
        })?;

    let status = parse_status(&raw).unwrap_or_else(|| {
        tracing::debug!(
            target: "lienzo.replicate",
            status = %raw,
            "unrecognized prediction status, treating as in progress"
        );
        PredictionStatus::Processing
    });

    Ok(PredictionSnapshot {
        status,
        output: response.output.unwrap_or_default(),
        error: response.error,
    })
}

#[async_trait]
impl Predictor for ReplicateClient {
    async fn create(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<PredictionHandle, PredictorError> {
        let body = CreatePredictionRequest {
            version: &self.config.model_version,
            input: PredictionInput::new(prompt, params),
        };

        // Submissions are not idempotent, so no retry here.
        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", self.auth_value())
            .json(&body)
            .send()
            .await
            .map_err(ReplicateError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReplicateError::ApiRequestFailed {
                status: status.as_u16(),
                url: self.config.base_url.clone(),
            }
            .into());
        }

        let parsed: PredictionResponse =
            response.json().await.map_err(ReplicateError::from)?;
        let handle = handle_from(parsed)?;

        tracing::debug!(
            target: "lienzo.replicate",
            prediction_id = %handle.id,
            "prediction submitted"
        );

        Ok(handle)
    }

    async fn poll(&self, handle: &PredictionHandle) -> Result<PredictionSnapshot, PredictorError> {
        let url = Url::parse(&handle.poll_url).map_err(ReplicateError::from)?;
        let response = self.fetch_with_retry(&url).await?;
        let parsed: PredictionResponse =
            response.json().await.map_err(ReplicateError::from)?;
        Ok(snapshot_from(parsed)?)
    }

    async fn fetch(&self, output_url: &str) -> Result<Vec<u8>, PredictorError> {
        let url = Url::parse(output_url).map_err(ReplicateError::from)?;
        let response = self.fetch_with_retry(&url).await?;
        let bytes = response.bytes().await.map_err(ReplicateError::from)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::PredictionUrls;

    fn response(
        id: Option<&str>,
        status: Option<&str>,
        poll_url: Option<&str>,
    ) -> PredictionResponse {
        PredictionResponse {
            id: id.map(String::from),
            status: status.map(String::from),
            urls: poll_url.map(|get| PredictionUrls {
                get: Some(get.to_string()),
            }),
            output: None,
            error: None,
        }
    }

    #[test]
    fn test_handle_requires_id_and_poll_url() {
        let ok = handle_from(response(
            Some("p-1"),
            Some("starting"),
            Some("https://api.example/predictions/p-1"),
        ))
        .unwrap();
        assert_eq!(ok.id, "p-1");
        assert_eq!(ok.poll_url, "https://api.example/predictions/p-1");

        let no_id = handle_from(response(None, None, Some("https://x")));
        assert!(matches!(
            no_id,
            Err(ReplicateError::SubmissionRejected { .. })
        ));

        let no_url = handle_from(response(Some("p-1"), None, None));
        assert!(matches!(
            no_url,
            Err(ReplicateError::SubmissionRejected { .. })
        ));
    }

    #[test]
    fn test_snapshot_requires_a_status_field() {
        let missing = snapshot_from(response(Some("p-1"), None, None));
        assert!(matches!(
            missing,
            Err(ReplicateError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_snapshot_maps_known_statuses() {
        let snapshot = snapshot_from(response(Some("p-1"), Some("succeeded"), None)).unwrap();
        assert_eq!(snapshot.status, PredictionStatus::Succeeded);

        let snapshot = snapshot_from(response(Some("p-1"), Some("failed"), None)).unwrap();
        assert_eq!(snapshot.status, PredictionStatus::Failed);
    }

    #[test]
    fn test_unknown_status_is_treated_as_in_progress() {
        let snapshot = snapshot_from(response(Some("p-1"), Some("queued-v2"), None)).unwrap();
        assert_eq!(snapshot.status, PredictionStatus::Processing);
        assert!(!snapshot.status.is_terminal());
    }

    #[test]
    fn test_snapshot_carries_output_and_error() {
        let mut raw = response(Some("p-1"), Some("succeeded"), None);
        raw.output = Some(vec!["https://cdn.example/out.png".to_string()]);
        let snapshot = snapshot_from(raw).unwrap();
        assert_eq!(snapshot.output.len(), 1);

        let mut raw = response(Some("p-1"), Some("failed"), None);
        raw.error = Some("NSFW content".to_string());
        let snapshot = snapshot_from(raw).unwrap();
        assert_eq!(snapshot.error.as_deref(), Some("NSFW content"));
    }

    #[test]
    fn test_client_builds_from_config() {
        let config = ReplicateConfig::new("tok", "version-sha");
        let client = ReplicateClient::new(config).unwrap();
        assert_eq!(client.auth_value(), "Token tok");
    }
}
