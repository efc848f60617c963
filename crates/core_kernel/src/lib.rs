//! Core Kernel - Foundational types shared by every crate of the claims summary service
//!
//! This crate provides the building blocks used across the workspace:
//! - Strongly-typed identifiers for claims, notes, and trace contexts
//! - The port contract (`PortError`, `DomainPort`, `HealthCheckable`) implemented by
//!   every store and model adapter
//! - A health registry that aggregates adapter health for readiness probes

pub mod identifiers;
pub mod ports;
pub mod registry;
pub mod error;

pub use identifiers::{ClaimId, NoteId, TraceId};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
    AdapterType, OperationMetadata,
};
pub use registry::{HealthRegistry, RegistryHealthReport};
pub use error::CoreError;
