//! Adapters for the claims ports
//!
//! - **InMemoryClaimStore / InMemoryNoteStore**: process-local stores
//! - **HttpGenerativeBackend**: OpenAI-compatible `chat/completions` client
//!
//! PostgreSQL stores live in the `infra_db` crate.
//!
//! ```rust,ignore
//! use domain_claims::adapters::{HttpBackendConfig, HttpGenerativeBackend};
//!
//! let backend = HttpGenerativeBackend::new(HttpBackendConfig {
//!     base_url: "https://api.openai.com/v1".to_string(),
//!     api_key: key,
//!     ..Default::default()
//! })?;
//! ```

pub mod http_backend;
pub mod memory;

pub use http_backend::{HttpBackendConfig, HttpGenerativeBackend};
pub use memory::{InMemoryClaimStore, InMemoryNoteStore};
