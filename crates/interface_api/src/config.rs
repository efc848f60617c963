//! API configuration
//!
//! Every key can be set through an `API_`-prefixed environment variable,
//! e.g. `API_PORT=9000` or `API_LLM_MODEL=gpt-4o-mini`. Unset keys keep
//! their defaults.

use std::time::Duration;

use serde::Deserialize;

use core_kernel::CoreError;
use domain_claims::adapters::HttpBackendConfig;
use domain_claims::EngineConfig;
use infra_db::DatabaseConfig;

/// Where claims and notes are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps, lost on restart
    Memory,
    /// PostgreSQL at `database_url`
    Postgres,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level or filter directive
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Deadline for a whole HTTP request
    pub request_timeout_secs: u64,
    /// Claim and note storage
    pub store_backend: StoreBackend,
    /// PostgreSQL connection string, required for the postgres backend
    pub database_url: Option<String>,
    /// Pool size for the postgres backend
    pub database_max_connections: u32,
    /// Base URL of the OpenAI-compatible model endpoint
    pub llm_base_url: String,
    /// Bearer token for the model endpoint
    pub llm_api_key: String,
    /// Model identifier
    pub llm_model: String,
    /// Upper bound on generated tokens
    pub llm_max_output_tokens: u32,
    /// Sampling temperature
    pub llm_temperature: f32,
    /// Bounded wait for one model call
    pub llm_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            request_timeout_secs: 120,
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 10,
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_api_key: String::new(),
            llm_model: "gpt-4o-mini".to_string(),
            llm_max_output_tokens: domain_claims::engine::DEFAULT_MAX_OUTPUT_TOKENS,
            llm_temperature: domain_claims::engine::DEFAULT_TEMPERATURE,
            llm_timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Rejects combinations the service cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.llm_temperature) {
            return Err(CoreError::configuration(format!(
                "llm_temperature must be within 0..=1, got {}",
                self.llm_temperature
            )));
        }
        if self.llm_max_output_tokens == 0 {
            return Err(CoreError::configuration("llm_max_output_tokens must be positive"));
        }
        if self.llm_model.trim().is_empty() {
            return Err(CoreError::configuration("llm_model must be set"));
        }
        if self.llm_timeout_secs == 0 {
            return Err(CoreError::configuration("llm_timeout_secs must be positive"));
        }
        if self.request_timeout_secs <= self.llm_timeout_secs {
            return Err(CoreError::configuration(format!(
                "request_timeout_secs ({}) must exceed llm_timeout_secs ({})",
                self.request_timeout_secs, self.llm_timeout_secs
            )));
        }
        if self.store_backend == StoreBackend::Postgres
            && self.database_url.as_deref().map_or(true, |url| url.trim().is_empty())
        {
            return Err(CoreError::configuration(
                "database_url is required when store_backend is postgres",
            ));
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parameters of the summarization engine
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.llm_model.clone())
            .max_output_tokens(self.llm_max_output_tokens)
            .temperature(self.llm_temperature)
            .request_timeout(Duration::from_secs(self.llm_timeout_secs))
    }

    /// Connection settings of the model endpoint
    ///
    /// The transport timeout sits slightly above the engine's bounded wait so
    /// that the engine, not reqwest, decides when a call has taken too long.
    pub fn backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.llm_base_url.clone(),
            api_key: self.llm_api_key.clone(),
            timeout: Duration::from_secs(self.llm_timeout_secs + 5),
        }
    }

    /// Pool settings, when a database is configured
    pub fn database_config(&self) -> Option<DatabaseConfig> {
        self.database_url
            .as_ref()
            .map(|url| DatabaseConfig::new(url.clone()).max_connections(self.database_max_connections))
    }
}
