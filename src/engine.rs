//! Action resolution engine
//!
//! Owns all mutable session state (city registry, event log, RNG) and is
//! the only writer to any of it. A `perform_action` call is atomic: every
//! failure is detected before the first mutation, so a failed resolve
//! leaves the registry, log, and metrics untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::actions::ActionKind;
use crate::catalog::CityCatalog;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CityId, MilestoneId, Tick};
use crate::incidents;
use crate::log::{Event, EventKind, EventLog, ProgressTrackers};
use crate::metrics::GlobalMetrics;
use crate::registry::{City, CityDelta, CityRegistry};
use crate::retaliation;

/// What one successful resolution did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    /// Snapshot of the target city after all deltas
    pub city: City,
    /// Events appended by this resolution, in append order
    pub events: Vec<Event>,
}

/// Current standing of the session against the win/lose thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Ongoing,
    /// Imperial pressure collapsed below the victory ceiling
    PressureVictory,
    /// Global solidarity reached the victory floor
    SolidarityVictory,
    /// Pressure consolidated while solidarity collapsed
    Defeat,
}

/// One running session: registry, log, RNG, and derived metrics.
///
/// Sessions are explicitly constructed and independent; two engines with
/// the same catalog, config, and seed replay identically.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: CityRegistry,
    log: EventLog,
    rng: ChaCha8Rng,
    tick: Tick,
    metrics: GlobalMetrics,
    /// Milestones already recorded, mirror of the log's milestone events
    /// plus thresholds the starting catalog satisfied before any play
    reached: BTreeSet<MilestoneId>,
    /// Re-entrancy guard for hosts that cannot serialize calls upstream
    resolving: bool,
}

impl Engine {
    pub fn new(catalog: &CityCatalog, config: EngineConfig, seed: u64) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;

        let registry = CityRegistry::from_catalog(catalog);
        let metrics = GlobalMetrics::recompute(&registry);

        let mut engine = Self {
            config,
            registry,
            log: EventLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            metrics,
            reached: BTreeSet::new(),
            resolving: false,
        };

        // Thresholds the seed data already satisfies never count as
        // play-earned milestones, so mark them reached without logging.
        for milestone in engine.satisfied_milestones() {
            engine.reached.insert(milestone);
        }

        tracing::info!(
            cities = engine.registry.len(),
            seed,
            "session initialized"
        );

        Ok(engine)
    }

    // === Queries ===

    pub fn city(&self, id: &CityId) -> Result<&City> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> GlobalMetrics {
        self.metrics
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn trackers(&self) -> ProgressTrackers {
        self.log.trackers()
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Check the session against the win/lose thresholds
    pub fn outcome(&self) -> SessionOutcome {
        if self.metrics.ipi <= self.config.victory_ipi_ceiling {
            SessionOutcome::PressureVictory
        } else if self.metrics.solidarity >= self.config.victory_solidarity_floor {
            SessionOutcome::SolidarityVictory
        } else if self.metrics.ipi >= self.config.defeat_ipi_floor
            && self.metrics.solidarity <= self.config.defeat_solidarity_ceiling
        {
            SessionOutcome::Defeat
        } else {
            SessionOutcome::Ongoing
        }
    }

    // === Commands ===

    /// Resolve one player action against one city.
    ///
    /// Exactly one `ActionPerformed` event per successful call, plus
    /// zero-or-one `RetaliationTriggered` appended immediately after it,
    /// plus any milestone events the resulting metrics crossed. All
    /// validation happens before the first mutation.
    pub fn perform_action(&mut self, id: &CityId, kind: ActionKind) -> Result<ActionReport> {
        if self.resolving {
            return Err(EngineError::ConcurrentResolutionRejected);
        }
        self.resolving = true;
        let result = self.resolve(id, kind);
        self.resolving = false;
        result
    }

    fn resolve(&mut self, id: &CityId, kind: ActionKind) -> Result<ActionReport> {
        // Validate everything up front: unknown city, unknown action
        // kind, and malformed baseline delta all fail with no mutation.
        if !self.registry.contains(id) {
            return Err(EngineError::CityNotFound(id.clone()));
        }
        let effect = self
            .config
            .effects
            .get(kind)
            .ok_or(EngineError::UnknownActionKind(kind))?;
        effect.delta.validate()?;
        let baseline = effect.delta.clone();

        let mut events = Vec::with_capacity(2);

        self.registry.apply(id, &baseline, self.tick)?;
        let seq = self.log.append(
            self.tick,
            EventKind::ActionPerformed {
                city: id.clone(),
                action: kind,
            },
        );
        events.push(self.log.events()[seq as usize].clone());

        // Retaliation is evaluated against the post-baseline city state
        if kind.retaliation_eligible() {
            let city = self.registry.get(id)?;
            let outcome =
                retaliation::evaluate(city, kind, &self.config.retaliation, &mut self.rng);
            if outcome.triggered {
                self.registry.apply(id, &outcome.delta, self.tick)?;
                let seq = self.log.append(
                    self.tick,
                    EventKind::RetaliationTriggered {
                        city: id.clone(),
                        severity: outcome.severity,
                    },
                );
                events.push(self.log.events()[seq as usize].clone());

                tracing::debug!(
                    city = %id,
                    severity = outcome.severity,
                    "retaliation triggered"
                );
            }
        }

        self.refresh_metrics(&mut events);

        let city = self.registry.get(id)?.clone();
        tracing::debug!(city = %id, action = %kind, ipi = self.metrics.ipi, "action resolved");

        Ok(ActionReport { city, events })
    }

    /// Advance the session clock by one tick.
    ///
    /// Applies the per-tick retaliation risk decay to every city, fires a
    /// scripted incident when the interval elapses, and refreshes the
    /// metrics snapshot. Returns the events appended by this tick.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        self.tick += 1;
        let mut events = Vec::new();

        if self.config.risk_decay_per_tick > 0.0 {
            let decay = CityDelta {
                retaliation_risk: -self.config.risk_decay_per_tick,
                ..CityDelta::default()
            };
            for id in self.registry.ids() {
                // Decay is not a player action; keep the stamp as-is
                let stamp = self.registry.get(&id)?.last_action_tick;
                self.registry.apply(&id, &decay, stamp)?;
            }
        }

        if self.config.incident_interval > 0 && self.tick % self.config.incident_interval == 0 {
            if let Some((city, incident)) = incidents::roll_incident(
                &self.registry,
                self.config.crackdown_influence_floor,
                &mut self.rng,
            ) {
                let stamp = self.registry.get(&city)?.last_action_tick;
                self.registry.apply(&city, &incident.delta(), stamp)?;
                let seq = self
                    .log
                    .append(self.tick, EventKind::IncidentStruck { city, incident });
                events.push(self.log.events()[seq as usize].clone());
            }
        }

        self.refresh_metrics(&mut events);
        Ok(events)
    }

    /// Recompute metrics from scratch and log any newly crossed milestones
    fn refresh_metrics(&mut self, events: &mut Vec<Event>) {
        self.metrics = GlobalMetrics::recompute(&self.registry);

        for milestone in self.satisfied_milestones() {
            if self.reached.insert(milestone) {
                let seq = self
                    .log
                    .append(self.tick, EventKind::MilestoneReached { milestone });
                events.push(self.log.events()[seq as usize].clone());
                tracing::info!(%milestone, "milestone reached");
            }
        }
    }

    /// Milestone thresholds the current metrics satisfy
    fn satisfied_milestones(&self) -> Vec<MilestoneId> {
        let mut satisfied = Vec::new();
        for &t in &self.config.solidarity_milestones {
            if self.metrics.solidarity >= f64::from(t) {
                satisfied.push(MilestoneId::SolidarityReached(t));
            }
        }
        for &t in &self.config.pressure_milestones {
            if self.metrics.ipi <= t {
                satisfied.push(MilestoneId::PressureBroken(t));
            }
        }
        satisfied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CitySeed;

    fn cairo_seed() -> CitySeed {
        CitySeed {
            name: "Cairo".into(),
            lat: 30.04,
            lon: 31.24,
            influence: 10.0,
            stability: 60.0,
            unrest: 20.0,
            retaliation_risk: 15.0,
        }
    }

    fn lagos_seed() -> CitySeed {
        CitySeed {
            name: "Lagos".into(),
            lat: 6.52,
            lon: 3.38,
            influence: 5.0,
            stability: 70.0,
            unrest: 10.0,
            retaliation_risk: 5.0,
        }
    }

    fn test_engine() -> Engine {
        let catalog = CityCatalog::from_seeds(vec![cairo_seed(), lagos_seed()]);
        let mut config = EngineConfig::default();
        config.incident_interval = 0;
        Engine::new(&catalog, config, 12345).unwrap()
    }

    #[test]
    fn test_protest_applies_effect_table() {
        let mut engine = test_engine();
        let id = CityId::new("Cairo");

        let report = engine.perform_action(&id, ActionKind::Protest).unwrap();
        assert_eq!(report.city.influence, 12.0);
        assert_eq!(report.city.unrest, 23.0);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].seq, 0);
    }

    #[test]
    fn test_unknown_city_leaves_state_untouched() {
        let mut engine = test_engine();
        let before_metrics = engine.metrics();

        let err = engine
            .perform_action(&CityId::new("Atlantis"), ActionKind::Aid)
            .unwrap_err();
        assert!(matches!(err, EngineError::CityNotFound(_)));
        assert!(engine.log().is_empty());
        assert_eq!(engine.metrics(), before_metrics);
    }

    #[test]
    fn test_unknown_action_kind_leaves_state_untouched() {
        let catalog = CityCatalog::from_seeds(vec![cairo_seed()]);
        let mut config = EngineConfig::default();
        config.incident_interval = 0;
        config.effects = crate::actions::EffectTable::new();
        config
            .effects
            .set(ActionKind::Protest, CityDelta::default());

        let mut engine = Engine::new(&catalog, config, 1).unwrap();
        let before = engine.city(&CityId::new("Cairo")).unwrap().clone();

        let err = engine
            .perform_action(&CityId::new("Cairo"), ActionKind::Sabotage)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownActionKind(ActionKind::Sabotage)));
        assert!(engine.log().is_empty());
        assert_eq!(engine.city(&CityId::new("Cairo")).unwrap(), &before);
    }

    #[test]
    fn test_forced_retaliation_orders_events() {
        // Risk 96 + the sabotage baseline (+4) saturates at 100, which
        // with base_chance 1.0 makes the trigger draw certain.
        let catalog = CityCatalog::from_seeds(vec![CitySeed {
            retaliation_risk: 96.0,
            ..cairo_seed()
        }]);
        let mut config = EngineConfig::default();
        config.incident_interval = 0;
        config.retaliation.base_chance = 1.0;

        let mut engine = Engine::new(&catalog, config, 7).unwrap();
        let id = CityId::new("Cairo");
        let risk_before = engine.city(&id).unwrap().retaliation_risk;

        let report = engine.perform_action(&id, ActionKind::Sabotage).unwrap();
        assert!(report.events.len() >= 2);
        assert!(matches!(
            report.events[0].kind,
            EventKind::ActionPerformed { .. }
        ));
        assert!(matches!(
            report.events[1].kind,
            EventKind::RetaliationTriggered { .. }
        ));
        assert_eq!(report.events[0].seq, 0);
        assert_eq!(report.events[1].seq, 1);

        // Ratchet: risk strictly increases despite nothing decaying it
        assert!(report.city.retaliation_risk > risk_before);
        assert_eq!(report.city.sabotage_count, 1);
    }

    #[test]
    fn test_zero_base_chance_never_retaliates() {
        let catalog = CityCatalog::from_seeds(vec![CitySeed {
            retaliation_risk: 100.0,
            ..cairo_seed()
        }]);
        let mut config = EngineConfig::default();
        config.incident_interval = 0;
        config.retaliation.base_chance = 0.0;

        let mut engine = Engine::new(&catalog, config, 7).unwrap();
        let id = CityId::new("Cairo");

        for _ in 0..20 {
            let report = engine.perform_action(&id, ActionKind::Sabotage).unwrap();
            assert!(report
                .events
                .iter()
                .all(|e| !matches!(e.kind, EventKind::RetaliationTriggered { .. })));
        }
    }

    #[test]
    fn test_non_finite_retaliation_factor_rejected_at_construction() {
        // A non-finite factor would turn a triggered retaliation into an
        // InvalidDelta after the baseline was already applied; it has to
        // be rejected before a session ever exists.
        let catalog = CityCatalog::from_seeds(vec![cairo_seed()]);
        let mut config = EngineConfig::default();
        config.retaliation.base_chance = 1.0;
        config.retaliation.unrest_factor = f64::INFINITY;

        let err = Engine::new(&catalog, config, 1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_tick_decays_retaliation_risk() {
        let mut engine = test_engine();
        let id = CityId::new("Cairo");
        let before = engine.city(&id).unwrap().retaliation_risk;

        engine.tick().unwrap();
        let after = engine.city(&id).unwrap().retaliation_risk;
        assert!(after < before);

        // Decay saturates at zero
        for _ in 0..1000 {
            engine.tick().unwrap();
        }
        assert_eq!(engine.city(&id).unwrap().retaliation_risk, 0.0);
    }

    #[test]
    fn test_decay_preserves_last_action_tick() {
        let mut engine = test_engine();
        let id = CityId::new("Cairo");

        engine.perform_action(&id, ActionKind::Protest).unwrap();
        let stamp = engine.city(&id).unwrap().last_action_tick;

        engine.tick().unwrap();
        engine.tick().unwrap();
        assert_eq!(engine.city(&id).unwrap().last_action_tick, stamp);
    }

    #[test]
    fn test_outcome_thresholds() {
        let outcome_for = |influence: f64, unrest: f64, risk: f64| {
            let catalog = CityCatalog::from_seeds(vec![CitySeed {
                influence,
                unrest,
                retaliation_risk: risk,
                ..cairo_seed()
            }]);
            let mut config = EngineConfig::default();
            config.incident_interval = 0;
            Engine::new(&catalog, config, 1).unwrap().outcome()
        };

        // High pressure, low solidarity: still in play
        assert_eq!(outcome_for(4.0, 80.0, 86.0), SessionOutcome::Ongoing);
        // Pressure driven to the floor
        assert_eq!(outcome_for(4.0, 20.0, 20.0), SessionOutcome::PressureVictory);
        // Solidarity carried the session despite high pressure
        assert_eq!(outcome_for(80.0, 80.0, 86.0), SessionOutcome::SolidarityVictory);
        // Pressure consolidated while solidarity collapsed
        assert_eq!(outcome_for(0.0, 95.0, 95.0), SessionOutcome::Defeat);
    }

    #[test]
    fn test_baseline_milestones_not_logged() {
        // The fixture starts with ipi 13, below every pressure milestone,
        // but none of that is play progress: the log stays empty.
        let engine = test_engine();
        assert!(engine.log().is_empty());
        assert!(engine.trackers().milestones.is_empty());
    }

    #[test]
    fn test_earned_milestone_logged_once_and_sticky() {
        let catalog = CityCatalog::from_seeds(vec![CitySeed {
            influence: 24.0,
            ..cairo_seed()
        }]);
        let mut config = EngineConfig::default();
        config.incident_interval = 0;
        config.retaliation.base_chance = 0.0;
        let mut engine = Engine::new(&catalog, config, 1).unwrap();
        let id = CityId::new("Cairo");

        // Protest lifts influence to 26: solidarity crosses 25
        engine.perform_action(&id, ActionKind::Protest).unwrap();
        let milestone = MilestoneId::SolidarityReached(25);
        assert!(engine.trackers().milestone_reached(milestone));

        // Sabotage drags influence back below 25; the milestone stays
        for _ in 0..3 {
            engine.perform_action(&id, ActionKind::Sabotage).unwrap();
        }
        assert!(engine.metrics().solidarity < 25.0);
        assert!(engine.trackers().milestone_reached(milestone));

        let milestone_events = engine
            .log()
            .iter()
            .filter(|e| matches!(e.kind, EventKind::MilestoneReached { milestone: m } if m == milestone))
            .count();
        assert_eq!(milestone_events, 1);
    }
}
