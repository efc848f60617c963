//! Claims Summarization Domain
//!
//! This crate turns a claim and its notes into a four-part summary written by
//! a generative model.
//!
//! # Pipeline
//!
//! ```text
//! ClaimStore ─┐
//!             ├─> SummarizationEngine -> ResponseParser -> ClaimSummary
//! NoteStore ──┘
//! ```
//!
//! The stores and the model are reached through the port traits in
//! [`ports`]; [`SummarizationOrchestrator`] wires them together and
//! [`InstrumentedSummarizer`] adds tracing and counters around it.

pub mod adapters;
pub mod claim;
pub mod engine;
pub mod error;
pub mod instrumented;
pub mod note;
pub mod orchestrator;
pub mod parser;
pub mod ports;
pub mod summary;

pub use claim::Claim;
pub use engine::{EngineConfig, EngineError, RawText, SummarizationEngine, SummarizationRequest};
pub use error::{ErrorKind, StoreKind, SummarizationError};
pub use instrumented::{InstrumentedSummarizer, SummaryMetrics};
pub use note::ClaimNote;
pub use orchestrator::{ClaimSummarizer, SummarizationOrchestrator};
pub use parser::{strip_code_fence, ParseError, ResponseParser};
pub use ports::{ClaimStore, GenerativeTextBackend, InvocationRequest, NoteStore};
pub use summary::{ClaimSummary, SummaryField};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{FailingStore, Failure, ScriptedBackend, ScriptedReply};
