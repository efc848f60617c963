//! Domain Adapters
//!
//! Implementations of the claims ports backed by PostgreSQL. Each adapter
//! implements a domain port trait, translates rows into domain types, and
//! reports database failures as `PortError`.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimStore;
//! use domain_claims::ClaimStore;
//!
//! let store = PostgresClaimStore::new(pool);
//! let claim = store.get_claim(&claim_id, None).await?;
//! ```

pub mod claims;

pub use claims::{PostgresClaimStore, PostgresNoteStore};
