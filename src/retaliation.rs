//! Retaliation policy - the scripted adversary response model
//!
//! A pure function over city state, the action just applied, and an
//! explicit RNG handle. All randomness flows through the caller-supplied
//! generator so a fixed seed reproduces every outcome exactly.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::core::types::CityId;
use crate::registry::{City, CityDelta};

/// Policy constants for adversary retaliation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetaliationConfig {
    /// Base trigger chance, multiplied by the city's risk fraction
    ///
    /// Trigger probability is `base_chance * (retaliation_risk / 100)`,
    /// so even a maximum-risk city retaliates at most this often.
    pub base_chance: f64,

    /// Severity draw range before stability scaling
    pub severity_min: f64,
    pub severity_max: f64,

    /// Unrest added per point of severity
    pub unrest_factor: f64,

    /// Influence removed per point of severity
    pub influence_factor: f64,

    /// Flat retaliation risk added whenever retaliation fires.
    ///
    /// A one-way ratchet: the policy never lowers risk. Cooling off is
    /// the engine's per-tick decay, not the policy's concern.
    pub risk_increment: f64,
}

impl Default for RetaliationConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.35,
            severity_min: 20.0,
            severity_max: 80.0,
            unrest_factor: 0.5,
            influence_factor: 0.4,
            risk_increment: 5.0,
        }
    }
}

/// Result of one retaliation check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetaliationOutcome {
    pub triggered: bool,
    /// Severity in [0, 100]; zero when not triggered
    pub severity: f64,
    pub city: CityId,
    /// Delta to apply to the affected city when triggered
    pub delta: CityDelta,
}

impl RetaliationOutcome {
    fn not_triggered(city: CityId) -> Self {
        Self {
            triggered: false,
            severity: 0.0,
            city,
            delta: CityDelta::default(),
        }
    }
}

/// Evaluate the retaliation check for an action just applied to `city`.
///
/// Only retaliation-eligible (sabotage-class) actions can trigger; all
/// other kinds return a non-triggered outcome without consuming any
/// randomness. Severity scales with regime stability: entrenched regimes
/// strike harder.
pub fn evaluate(
    city: &City,
    action: ActionKind,
    config: &RetaliationConfig,
    rng: &mut ChaCha8Rng,
) -> RetaliationOutcome {
    if !action.retaliation_eligible() {
        return RetaliationOutcome::not_triggered(city.id.clone());
    }

    let risk_fraction = (city.retaliation_risk / 100.0).clamp(0.0, 1.0);
    let trigger_probability = config.base_chance * risk_fraction;

    let draw: f64 = rng.gen();
    if draw >= trigger_probability {
        return RetaliationOutcome::not_triggered(city.id.clone());
    }

    let base_severity = if config.severity_max > config.severity_min {
        rng.gen_range(config.severity_min..=config.severity_max)
    } else {
        config.severity_min
    };
    let severity = (base_severity * (city.stability / 100.0)).clamp(0.0, 100.0);

    let delta = CityDelta {
        influence: -severity * config.influence_factor,
        stability: 0.0,
        unrest: severity * config.unrest_factor,
        retaliation_risk: config.risk_increment,
        sabotage_increment: 0,
    };

    RetaliationOutcome {
        triggered: true,
        severity,
        city: city.id.clone(),
        delta,
    }
}
