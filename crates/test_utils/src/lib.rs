//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims summary workspace.
//!
//! # Modules
//!
//! - `fixtures`: Deterministic claims, notes, and model replies
//! - `builders`: Builders for test data, including malformed model output
//! - `harness`: A summarizer wired over in-memory stores and a scripted model
//! - `database`: PostgreSQL container management for store tests
//! - `assertions`: Assertion helpers for summaries and errors
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;
pub mod harness;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
pub use harness::*;

use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    // Another harness may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs a test-friendly tracing subscriber once per process
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}
