//! Service bootstrap
//!
//! Builds the long-lived clients once per process: the claim and note stores,
//! the model backend, the summarizer on top of them, and the health registry
//! that the readiness probe reads.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use core_kernel::{AdapterType, HealthRegistry};
use domain_claims::adapters::{HttpGenerativeBackend, InMemoryClaimStore, InMemoryNoteStore};
use domain_claims::{
    ClaimStore, ClaimSummarizer, InstrumentedSummarizer, NoteStore, SummarizationEngine,
    SummarizationOrchestrator,
};
use infra_db::{create_pool, run_migrations, DatabasePool, PostgresClaimStore, PostgresNoteStore};

use crate::config::{ApiConfig, StoreBackend};
use crate::AppState;

/// Process-wide services
pub struct Services {
    pub claims: Arc<dyn ClaimStore>,
    pub notes: Arc<dyn NoteStore>,
    pub summarizer: Arc<dyn ClaimSummarizer>,
    pub health: Arc<HealthRegistry>,
    pub config: ApiConfig,
    pool: Option<DatabasePool>,
}

impl Services {
    /// Connects the configured stores and the model backend
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be reached or migrated, or the HTTP client
    /// for the model cannot be built.
    pub async fn start(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut health = HealthRegistry::new();

        let (claims, notes, pool): (Arc<dyn ClaimStore>, Arc<dyn NoteStore>, _) =
            match config.store_backend {
                StoreBackend::Memory => {
                    info!("Using in-memory claim and note stores");
                    let claims = Arc::new(InMemoryClaimStore::new());
                    let notes = Arc::new(InMemoryNoteStore::new());
                    health.register("claim_store", AdapterType::InMemory, claims.clone());
                    health.register("note_store", AdapterType::InMemory, notes.clone());
                    (claims, notes, None)
                }
                StoreBackend::Postgres => {
                    let db_config = config
                        .database_config()
                        .context("database_url is required for the postgres store backend")?;
                    let pool = create_pool(db_config)
                        .await
                        .context("failed to connect to the database")?;
                    run_migrations(&pool)
                        .await
                        .context("failed to apply database migrations")?;

                    info!("Using PostgreSQL claim and note stores");
                    let claims = Arc::new(PostgresClaimStore::new(pool.clone()));
                    let notes = Arc::new(PostgresNoteStore::new(pool.clone()));
                    health.register("claim_store", AdapterType::Postgres, claims.clone());
                    health.register("note_store", AdapterType::Postgres, notes.clone());
                    (claims, notes, Some(pool))
                }
            };

        let backend = Arc::new(
            HttpGenerativeBackend::new(config.backend_config())
                .context("failed to build the model backend client")?,
        );
        health.register("model_backend", AdapterType::ExternalRestApi, backend.clone());

        info!(
            model = %config.llm_model,
            base_url = %backend.base_url(),
            timeout_secs = config.llm_timeout_secs,
            "Model backend configured"
        );

        let engine = SummarizationEngine::new(backend, config.engine_config());
        let orchestrator = SummarizationOrchestrator::new(claims.clone(), notes.clone(), engine);
        let summarizer: Arc<dyn ClaimSummarizer> = Arc::new(InstrumentedSummarizer::new(orchestrator));

        Ok(Self {
            claims,
            notes,
            summarizer,
            health: Arc::new(health),
            config: config.clone(),
            pool,
        })
    }

    /// State handed to the router
    pub fn app_state(&self) -> AppState {
        AppState {
            summarizer: self.summarizer.clone(),
            claims: self.claims.clone(),
            notes: self.notes.clone(),
            health: self.health.clone(),
            config: self.config.clone(),
        }
    }

    /// Releases pooled connections
    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_starts_without_network() {
        let config = ApiConfig {
            llm_base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let services = Services::start(&config).await.unwrap();

        assert_eq!(services.health.registrations().len(), 3);
        assert!(services.pool.is_none());
        services.shutdown().await;
    }
}
