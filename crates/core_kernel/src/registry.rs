//! Health Registry
//!
//! The service holds one long-lived client per external collaborator. The
//! registry keeps a handle on each of them, together with the adapter kind it
//! was built from, so the readiness probe can ask every dependency for its
//! health in one place.
//!
//! ```rust,ignore
//! let mut registry = HealthRegistry::new();
//! registry.register("claim_store", AdapterType::Postgres, claim_store.clone());
//! registry.register("model_backend", AdapterType::ExternalRestApi, backend.clone());
//!
//! let report = registry.check_all().await;
//! if !report.is_operational() { /* answer 503 */ }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::ports::{AdapterHealth, AdapterType, HealthCheckResult, HealthCheckable};

/// Registration information for an adapter
#[derive(Clone)]
pub struct AdapterRegistration {
    /// The dependency this adapter serves (e.g. "claim_store")
    pub dependency: String,

    /// The type of adapter (in-memory, postgres, external)
    pub adapter_type: AdapterType,

    adapter: Arc<dyn HealthCheckable>,
}

impl std::fmt::Debug for AdapterRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistration")
            .field("dependency", &self.dependency)
            .field("adapter_type", &self.adapter_type)
            .finish()
    }
}

/// Result of health checks across all registered adapters
#[derive(Debug, Clone, Serialize)]
pub struct RegistryHealthReport {
    /// Overall health status
    pub overall_status: AdapterHealth,

    /// Health results by dependency name
    pub dependencies: BTreeMap<String, HealthCheckResult>,

    /// Number of healthy adapters
    pub healthy_count: usize,

    /// Number of unhealthy adapters
    pub unhealthy_count: usize,

    /// Total number of registered adapters
    pub total_count: usize,
}

impl RegistryHealthReport {
    /// Returns true if all adapters are healthy
    pub fn is_fully_healthy(&self) -> bool {
        self.overall_status == AdapterHealth::Healthy
    }

    /// Returns true if the system is at least partially operational
    pub fn is_operational(&self) -> bool {
        matches!(
            self.overall_status,
            AdapterHealth::Healthy | AdapterHealth::Degraded
        )
    }
}

/// Registry of the process-wide adapters
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    registrations: Vec<AdapterRegistration>,
}

impl HealthRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an adapter under a dependency name
    pub fn register(
        &mut self,
        dependency: impl Into<String>,
        adapter_type: AdapterType,
        adapter: Arc<dyn HealthCheckable>,
    ) {
        self.registrations.push(AdapterRegistration {
            dependency: dependency.into(),
            adapter_type,
            adapter,
        });
    }

    /// Builder-style variant of [`HealthRegistry::register`]
    pub fn with(
        mut self,
        dependency: impl Into<String>,
        adapter_type: AdapterType,
        adapter: Arc<dyn HealthCheckable>,
    ) -> Self {
        self.register(dependency, adapter_type, adapter);
        self
    }

    /// Returns a list of all registered adapters
    pub fn registrations(&self) -> &[AdapterRegistration] {
        &self.registrations
    }

    /// Runs every adapter's health check and folds the results into one report
    pub async fn check_all(&self) -> RegistryHealthReport {
        let mut dependencies = BTreeMap::new();
        for registration in &self.registrations {
            let result = registration.adapter.health_check().await;
            dependencies.insert(registration.dependency.clone(), result);
        }
        summarize_health(dependencies)
    }
}

fn summarize_health(dependencies: BTreeMap<String, HealthCheckResult>) -> RegistryHealthReport {
    let total_count = dependencies.len();
    let healthy_count = dependencies
        .values()
        .filter(|r| r.status == AdapterHealth::Healthy)
        .count();
    let unhealthy_count = dependencies
        .values()
        .filter(|r| r.status == AdapterHealth::Unhealthy)
        .count();

    let overall_status = if unhealthy_count > 0 {
        AdapterHealth::Unhealthy
    } else if healthy_count == total_count {
        AdapterHealth::Healthy
    } else {
        AdapterHealth::Degraded
    };

    RegistryHealthReport {
        overall_status,
        dependencies,
        healthy_count,
        unhealthy_count,
        total_count,
    }
}
