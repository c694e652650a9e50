//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use lienzo_core::ports::bonus::BonusRepository;
use lienzo_core::ports::history::HistoryRepository;
use lienzo_core::ports::predictor::Predictor;
use lienzo_core::services::{
    BonusService, DeletionService, GenerationConfig, GenerationService, QuotaService,
};
use lienzo_db::{StoreFactory, setup_database};
use lienzo_replicate::{ReplicateClient, ReplicateConfig};
use lienzo_store::FsArtifactStore;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Directory where generated images are persisted and served from.
    pub output_dir: PathBuf,
    /// API token for the predictor.
    pub predictor_token: String,
    /// Model version submitted with every prediction.
    pub model_version: String,
    /// Base daily generation allowance per user.
    pub daily_limit: u32,
    /// Polling tunables and fixed model parameters.
    pub generation: GenerationConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create a config with default paths and limits.
    #[must_use]
    pub fn new(predictor_token: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            port: 3000,
            db_path: PathBuf::from("lienzo.db"),
            output_dir: PathBuf::from("output"),
            predictor_token: predictor_token.into(),
            model_version: model_version.into(),
            daily_limit: 3,
            generation: GenerationConfig::default(),
            cors: CorsConfig::default(),
        }
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
///
/// Holds all initialized services for the web server.
pub struct AxumContext {
    /// End-to-end generation pipeline.
    pub generation: Arc<GenerationService>,
    /// Quota reads for `/can-generate`.
    pub quota: Arc<QuotaService>,
    /// Same-day bonus grants.
    pub bonus: Arc<BonusService>,
    /// Paired artifact and record removal.
    pub deletion: Arc<DeletionService>,
    /// Per-user history reads.
    pub history: Arc<dyn HistoryRepository>,
    /// Directory served under `/output`.
    pub output_dir: PathBuf,
}

/// Bootstrap the server with the production predictor client.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    let predictor_config =
        ReplicateConfig::new(config.predictor_token.clone(), config.model_version.clone());
    let predictor: Arc<dyn Predictor> = Arc::new(ReplicateClient::new(predictor_config)?);
    bootstrap_with_predictor(config, predictor).await
}

/// Bootstrap with an injected predictor.
///
/// Used by tests to wire a stub in place of the real HTTP client; the
/// rest of the stack (database, artifact store, services) is identical
/// to production.
pub async fn bootstrap_with_predictor(
    config: ServerConfig,
    predictor: Arc<dyn Predictor>,
) -> Result<AxumContext> {
    tracing::info!(
        target: "lienzo.bootstrap",
        db_path = %config.db_path.display(),
        output_dir = %config.output_dir.display(),
        daily_limit = config.daily_limit,
        "bootstrap starting"
    );

    let pool = setup_database(&config.db_path).await?;
    let history: Arc<dyn HistoryRepository> = StoreFactory::history_repository(pool.clone());
    let bonus_repo: Arc<dyn BonusRepository> = StoreFactory::bonus_repository(pool);

    let store = Arc::new(FsArtifactStore::new(&config.output_dir)?);

    let quota = Arc::new(QuotaService::new(
        history.clone(),
        bonus_repo.clone(),
        config.daily_limit,
    ));
    let generation = Arc::new(GenerationService::new(
        predictor,
        store.clone(),
        history.clone(),
        quota.clone(),
        config.generation.clone(),
    ));
    let bonus = Arc::new(BonusService::new(bonus_repo));
    let deletion = Arc::new(DeletionService::new(store, history.clone()));

    Ok(AxumContext {
        generation,
        quota,
        bonus,
        deletion,
        history,
        output_dir: config.output_dir,
    })
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let port = config.port;
    let cors = config.cors.clone();
    let ctx = bootstrap(config).await?;
    let app = crate::routes::create_router(ctx, &cors);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(target: "lienzo.bootstrap", "listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
