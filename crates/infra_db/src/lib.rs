//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the claims summary service, built on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! return row structs, adapters implement the domain's `ClaimStore` and
//! `NoteStore` ports on top of them.
//!
//! # Schema
//!
//! - `claims`: one row per claim, attributes kept as a JSONB object
//! - `claim_notes`: free-text notes keyed by claim id
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let claims = PostgresClaimStore::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::{PostgresClaimStore, PostgresNoteStore};
pub use error::DatabaseError;
pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
