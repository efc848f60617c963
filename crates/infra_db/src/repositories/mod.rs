//! Repository implementations
//!
//! Repositories own the SQL and map rows to plain row structs; the adapters
//! in `crate::adapters` turn those rows into domain types.

pub mod claims;
pub mod notes;

pub use claims::{ClaimRow, ClaimsRepository, NewClaim};
pub use notes::{NewNote, NoteRow, NotesRepository};
