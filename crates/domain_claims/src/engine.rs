//! Summarization engine
//!
//! Turns one claim and its notes into a single prompt, sends it to the
//! generative-text backend, and hands back whatever text came out. Parsing
//! is left to [`crate::parser::ResponseParser`].
//!
//! The prompt is a fixed instruction block followed by the claim and notes
//! serialized as JSON. Only the data section varies between calls.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use core_kernel::PortError;

use crate::claim::Claim;
use crate::note::ClaimNote;
use crate::ports::{GenerativeTextBackend, InvocationRequest};
use crate::summary::SummaryField;

/// Default upper bound on generated tokens
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8000;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default wait for the model before giving up
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Failures of the generation step
#[derive(Debug, Error)]
pub enum EngineError {
    /// The backend could not be reached or refused the call
    #[error("generative backend unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Option<PortError>,
    },

    /// No answer within the configured wait
    #[error("generative backend timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Invocation parameters of the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Model identifier passed to the backend
    pub model_id: String,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Bounded wait for one model call
    pub request_timeout: Duration,
}

impl EngineConfig {
    /// Configuration with default parameters for the given model
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Raw text returned by the model, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawText(String);

impl RawText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// One claim with its notes, for the duration of one summarize call
#[derive(Debug, Clone, Copy)]
pub struct SummarizationRequest<'a> {
    pub claim: &'a Claim,
    pub notes: &'a [ClaimNote],
}

impl<'a> SummarizationRequest<'a> {
    pub fn new(claim: &'a Claim, notes: &'a [ClaimNote]) -> Self {
        Self { claim, notes }
    }

    /// Builds the full prompt: instructions, then the claim, then its notes
    pub fn render_prompt(&self) -> String {
        let mut notes: Vec<&ClaimNote> = self.notes.iter().collect();
        // Oldest first reads naturally; undated notes go last, in store order
        notes.sort_by_key(|n| (n.recorded_at.is_none(), n.recorded_at));

        let notes_json = serde_json::Value::Array(notes.iter().map(|n| n.to_json()).collect());

        format!(
            "{instructions}\nClaim in JSON format:\n{claim}\n\nClaim notes in JSON format:\n{notes}\n",
            instructions = instruction_block(),
            claim = self.claim.to_json(),
            notes = notes_json,
        )
    }
}

fn instruction_block() -> String {
    let mut block = String::from(
        "You are an insurance claims assistant.\n\n\
         Given the following claim and its notes, generate:\n",
    );
    for (position, field) in SummaryField::ALL.iter().enumerate() {
        block.push_str(&format!(
            "{}. \"{}\": {}\n",
            position + 1,
            field.key(),
            field.instruction()
        ));
    }
    block.push_str(
        "\nRespond with a single JSON object containing exactly these four string fields. \
         Every field must be non-empty. If the notes are empty, say that no further detail is \
         available. The response must be directly parsable JSON: do not wrap it in markdown, \
         do not start it with ```json or any other code fence, and do not add any text before \
         or after the object.\n",
    );
    block
}

/// Generates raw summary text for a claim
#[derive(Clone)]
pub struct SummarizationEngine {
    backend: Arc<dyn GenerativeTextBackend>,
    config: EngineConfig,
}

impl std::fmt::Debug for SummarizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SummarizationEngine {
    pub fn new(backend: Arc<dyn GenerativeTextBackend>, config: EngineConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one model call for the claim and returns its text verbatim
    ///
    /// # Errors
    ///
    /// - `EngineError::Timeout` when `request_timeout` elapses or the backend
    ///   reports a timeout of its own
    /// - `EngineError::Unavailable` for every other backend failure
    pub async fn generate(&self, claim: &Claim, notes: &[ClaimNote]) -> Result<RawText, EngineError> {
        let prompt = SummarizationRequest::new(claim, notes).render_prompt();
        let request = InvocationRequest {
            model_id: self.config.model_id.clone(),
            prompt,
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            claim_id = %claim.id,
            note_count = notes.len(),
            prompt_length = request.prompt.len(),
            model = %request.model_id,
            "Invoking generative backend"
        );

        let started = Instant::now();
        let timeout_ms = self.config.request_timeout.as_millis() as u64;

        let outcome = tokio::time::timeout(self.config.request_timeout, self.backend.invoke(&request)).await;

        match outcome {
            Err(_elapsed) => {
                warn!(claim_id = %claim.id, timeout_ms, "Generative backend timed out");
                Err(EngineError::Timeout { timeout_ms })
            }
            Ok(Err(error)) if error.is_timeout() => {
                warn!(claim_id = %claim.id, error = %error, "Generative backend reported a timeout");
                Err(EngineError::Timeout {
                    timeout_ms: started.elapsed().as_millis() as u64,
                })
            }
            Ok(Err(error)) => {
                warn!(claim_id = %claim.id, error = %error, "Generative backend call failed");
                Err(EngineError::Unavailable {
                    message: error.to_string(),
                    source: Some(error),
                })
            }
            Ok(Ok(text)) => {
                info!(
                    claim_id = %claim.id,
                    response_length = text.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generative backend response received"
                );
                Ok(RawText::new(text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{ScriptedBackend, ScriptedReply};
    use chrono::{TimeZone, Utc};
    use core_kernel::ClaimId;

    fn claim() -> Claim {
        Claim::new(ClaimId::new("C1").unwrap()).with_attribute("status", "open")
    }

    #[test]
    fn test_prompt_names_every_field() {
        let prompt = SummarizationRequest::new(&claim(), &[]).render_prompt();
        for field in SummaryField::ALL {
            assert!(prompt.contains(field.key()), "prompt lacks {}", field);
        }
        assert!(prompt.contains("```json"));
        assert!(prompt.contains(r#"{"id":"C1","status":"open"}"#));
        assert!(prompt.ends_with("Claim notes in JSON format:\n[]\n"));
    }

    #[test]
    fn test_prompt_orders_notes_oldest_first() {
        let id = ClaimId::new("C1").unwrap();
        let notes = vec![
            ClaimNote::new(id.clone(), "undated"),
            ClaimNote::new(id.clone(), "second")
                .recorded_at(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
            ClaimNote::new(id, "first")
                .recorded_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        ];
        let claim = claim();
        let prompt = SummarizationRequest::new(&claim, &notes).render_prompt();

        let first = prompt.find("\"first\"").unwrap();
        let second = prompt.find("\"second\"").unwrap();
        let undated = prompt.find("\"undated\"").unwrap();
        assert!(first < second && second < undated);
    }

    #[tokio::test]
    async fn test_generate_passes_fixed_parameters() {
        let backend = Arc::new(ScriptedBackend::replying("raw"));
        let engine = SummarizationEngine::new(backend.clone(), EngineConfig::new("model-x"));

        let raw = engine.generate(&claim(), &[]).await.unwrap();
        assert_eq!(raw.as_str(), "raw");

        let request = backend.last_request().unwrap();
        assert_eq!(request.model_id, "model-x");
        assert_eq!(request.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let text = "```json\n{\"not\": \"parsed\"}\n```  ";
        let engine = SummarizationEngine::new(
            Arc::new(ScriptedBackend::replying(text)),
            EngineConfig::new("m"),
        );
        assert_eq!(engine.generate(&claim(), &[]).await.unwrap().into_inner(), text);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let engine = SummarizationEngine::new(
            Arc::new(ScriptedBackend::with_script(vec![ScriptedReply::Unreachable])),
            EngineConfig::new("m"),
        );
        let error = engine.generate(&claim(), &[]).await.unwrap_err();
        assert!(matches!(error, EngineError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_backend_reported_timeout() {
        let engine = SummarizationEngine::new(
            Arc::new(ScriptedBackend::with_script(vec![ScriptedReply::TimedOut])),
            EngineConfig::new("m"),
        );
        let error = engine.generate(&claim(), &[]).await.unwrap_err();
        assert!(matches!(error, EngineError::Timeout { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_wait() {
        let engine = SummarizationEngine::new(
            Arc::new(ScriptedBackend::with_script(vec![ScriptedReply::Delayed(
                Duration::from_secs(120),
                "late".into(),
            )])),
            EngineConfig::new("m").request_timeout(Duration::from_secs(5)),
        );
        let error = engine.generate(&claim(), &[]).await.unwrap_err();
        assert!(matches!(error, EngineError::Timeout { timeout_ms: 5000 }));
    }
}
