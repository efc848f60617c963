//! HTTP Generative Backend
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint. One client
//! is built at startup and shared by every call; reqwest pools connections
//! underneath.
//!
//! # Error Handling
//!
//! Transport and HTTP failures are mapped to `PortError` variants:
//! - request timeout -> `PortError::Timeout`
//! - connect failure -> `PortError::Connection`
//! - 401/403 -> `PortError::Unauthorized`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - unreadable body or no choices -> `PortError::Transformation`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::ports::{GenerativeTextBackend, InvocationRequest};

const ADAPTER_ID: &str = "http-generative-backend";

/// Connection settings of the model endpoint
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Bearer token; sent only when non-empty
    pub api_key: String,

    /// Transport-level timeout for one request
    pub timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Generative backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpGenerativeBackend {
    client: Client,
    config: HttpBackendConfig,
}

impl HttpGenerativeBackend {
    /// Builds the shared HTTP client
    pub fn new(config: HttpBackendConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortError::connection_with_source("failed to build HTTP client", e))?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(&self.config.api_key)
        }
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::timeout("chat completion", self.config.timeout.as_millis() as u64)
        } else if error.is_connect() {
            PortError::connection_with_source(
                format!("cannot reach model endpoint {}", self.config.base_url),
                error,
            )
        } else {
            PortError::connection_with_source("model request failed", error)
        }
    }
}

fn map_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("model endpoint rejected credentials ({})", status.as_u16()),
        },
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(1),
        },
        s if s.is_server_error() => {
            PortError::unavailable(format!("model endpoint answered {}", s.as_u16()))
        }
        s => PortError::internal(format!(
            "model endpoint answered {}: {}",
            s.as_u16(),
            body.chars().take(200).collect::<String>()
        )),
    }
}

impl DomainPort for HttpGenerativeBackend {}

#[async_trait]
impl HealthCheckable for HttpGenerativeBackend {
    /// Lists the endpoint's models to confirm it is reachable and accepts our key
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let outcome = self.authorize(self.client.get(self.url("models"))).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) if response.status().is_success() => {
                HealthCheckResult::healthy(ADAPTER_ID, latency_ms)
            }
            Ok(response) => HealthCheckResult::unhealthy(
                ADAPTER_ID,
                latency_ms,
                format!("model endpoint answered {}", response.status().as_u16()),
            ),
            Err(error) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, error.to_string()),
        }
    }
}

#[async_trait]
impl GenerativeTextBackend for HttpGenerativeBackend {
    async fn invoke(&self, request: &InvocationRequest) -> Result<String, PortError> {
        let body = ChatRequest {
            model: &request.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let response = self
            .authorize(self.client.post(self.url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Model endpoint returned an error status");
            return Err(map_status(status, retry_after, &text));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport_error(e)
            } else {
                PortError::transformation(format!("unreadable chat completion body: {}", e))
            }
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PortError::transformation("chat completion contained no message"))?;

        debug!(response_length = content.len(), "Chat completion received");
        Ok(content)
    }
}
