//! Global metrics aggregation
//!
//! Snapshots are always recomputed from the full registry; there is no
//! incremental bookkeeping that could drift from a from-scratch pass.

use serde::{Deserialize, Serialize};

use crate::registry::CityRegistry;

/// Derived global indices shown to the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalMetrics {
    /// Imperial pressure index: mean of per-city `(unrest + retaliation_risk) / 2`,
    /// rounded to the nearest integer in [0, 100]
    pub ipi: u32,
    /// Mean of per-city influence, in [0, 100]
    pub solidarity: f64,
}

impl GlobalMetrics {
    /// Recompute both indices from current registry contents.
    ///
    /// Pure and idempotent: two calls without an intervening mutation
    /// yield identical snapshots, and replaying the same action sequence
    /// from a fresh registry reproduces the same values bit for bit.
    pub fn recompute(registry: &CityRegistry) -> Self {
        if registry.is_empty() {
            return Self::default();
        }

        let count = registry.len() as f64;
        let mut pressure_sum = 0.0;
        let mut influence_sum = 0.0;

        for city in registry.iter() {
            pressure_sum += (city.unrest + city.retaliation_risk) / 2.0;
            influence_sum += city.influence;
        }

        let ipi = (pressure_sum / count).round().clamp(0.0, 100.0) as u32;
        let solidarity = influence_sum / count;

        Self { ipi, solidarity }
    }
}
