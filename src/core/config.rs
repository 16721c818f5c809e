//! Engine configuration with documented constants
//!
//! All tunable values are collected here so tests can substitute
//! deterministic or extreme values instead of relying on literals
//! scattered through the resolution code.

use crate::actions::EffectTable;
use crate::retaliation::RetaliationConfig;

/// Configuration for one engine session
///
/// These values have been tuned to produce a playable pacing. Changing
/// them affects how quickly sessions end, not the resolution semantics.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-action-kind baseline stat deltas
    pub effects: EffectTable,

    /// Retaliation policy constants (base chance, severity range, ratchet)
    pub retaliation: RetaliationConfig,

    /// Amount subtracted from every city's retaliation risk each tick
    ///
    /// At the default (0.5), the +4 risk a sabotage adds takes 8 quiet
    /// ticks to cool back off. The retaliation policy itself never
    /// decays risk; this is the only counterweight to its ratchet.
    pub risk_decay_per_tick: f64,

    /// Ticks between scripted world incidents (0 disables them)
    ///
    /// The default (120) matches one incident every two minutes at the
    /// original one-second tick rate.
    pub incident_interval: u64,

    /// Minimum influence a city needs to be a crackdown target
    pub crackdown_influence_floor: f64,

    /// Solidarity percentages that record a milestone when first reached
    pub solidarity_milestones: Vec<u32>,

    /// IPI percentages that record a milestone when first driven to or below
    pub pressure_milestones: Vec<u32>,

    /// Session ends in victory once IPI falls to or below this value
    pub victory_ipi_ceiling: u32,

    /// Session ends in victory once solidarity reaches this value
    pub victory_solidarity_floor: f64,

    /// Defeat requires IPI at or above this value...
    pub defeat_ipi_floor: u32,

    /// ...combined with solidarity at or below this value
    pub defeat_solidarity_ceiling: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            effects: EffectTable::standard(),
            retaliation: RetaliationConfig::default(),

            risk_decay_per_tick: 0.5,
            incident_interval: 120,
            crackdown_influence_floor: 30.0,

            solidarity_milestones: vec![25, 50, 75],
            pressure_milestones: vec![75, 50, 25],

            victory_ipi_ceiling: 25,
            victory_solidarity_floor: 75.0,
            defeat_ipi_floor: 95,
            defeat_solidarity_ceiling: 10.0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.effects.is_empty() {
            return Err("effect table must define at least one action".into());
        }

        // Every f64 tunable must be finite. A NaN here would slip past the
        // range checks below and only surface as an InvalidDelta after a
        // baseline delta has already been applied, breaking the
        // all-or-nothing resolution guarantee.
        for (name, value) in [
            ("retaliation.base_chance", self.retaliation.base_chance),
            ("retaliation.severity_min", self.retaliation.severity_min),
            ("retaliation.severity_max", self.retaliation.severity_max),
            ("retaliation.unrest_factor", self.retaliation.unrest_factor),
            (
                "retaliation.influence_factor",
                self.retaliation.influence_factor,
            ),
            ("retaliation.risk_increment", self.retaliation.risk_increment),
            ("risk_decay_per_tick", self.risk_decay_per_tick),
            ("crackdown_influence_floor", self.crackdown_influence_floor),
            ("victory_solidarity_floor", self.victory_solidarity_floor),
            ("defeat_solidarity_ceiling", self.defeat_solidarity_ceiling),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be finite, got {}", name, value));
            }
        }

        if !(0.0..=1.0).contains(&self.retaliation.base_chance) {
            return Err(format!(
                "retaliation base_chance ({}) must be within [0, 1]",
                self.retaliation.base_chance
            ));
        }

        if self.retaliation.severity_min > self.retaliation.severity_max {
            return Err(format!(
                "severity range inverted ({} > {})",
                self.retaliation.severity_min, self.retaliation.severity_max
            ));
        }

        if self.risk_decay_per_tick < 0.0 {
            return Err("risk_decay_per_tick must be non-negative".into());
        }

        if self.victory_ipi_ceiling >= self.defeat_ipi_floor {
            return Err(format!(
                "victory_ipi_ceiling ({}) must be below defeat_ipi_floor ({})",
                self.victory_ipi_ceiling, self.defeat_ipi_floor
            ));
        }

        Ok(())
    }
}
