//! Action kinds and the per-action effect table

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::registry::CityDelta;

/// Player action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Protest,
    Strike,
    Network,
    Sabotage,
    Aid,
    ExposeMedia,
}

impl ActionKind {
    /// Covert actions draw adversary retaliation checks
    pub fn retaliation_eligible(&self) -> bool {
        matches!(self, ActionKind::Sabotage)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Protest => "protest",
            ActionKind::Strike => "strike",
            ActionKind::Network => "network",
            ActionKind::Sabotage => "sabotage",
            ActionKind::Aid => "aid",
            ActionKind::ExposeMedia => "expose-media",
        };
        f.write_str(name)
    }
}

/// Baseline stat adjustment an action applies to its target city
#[derive(Debug, Clone)]
pub struct ActionEffect {
    pub delta: CityDelta,
}

/// Static per-action-kind effect table.
///
/// Kinds absent from the table are rejected as unknown by the resolution
/// engine, which keeps the set of playable actions a configuration concern
/// rather than a code change.
#[derive(Debug, Clone, Default)]
pub struct EffectTable {
    effects: AHashMap<ActionKind, ActionEffect>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard tuning used by live sessions
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.set(
            ActionKind::Protest,
            CityDelta {
                influence: 2.0,
                stability: -2.0,
                unrest: 3.0,
                retaliation_risk: 1.0,
                sabotage_increment: 0,
            },
        );
        table.set(
            ActionKind::Strike,
            CityDelta {
                influence: 3.0,
                stability: -4.0,
                unrest: 5.0,
                retaliation_risk: 2.0,
                sabotage_increment: 0,
            },
        );
        table.set(
            ActionKind::Network,
            CityDelta {
                influence: 5.0,
                stability: -1.0,
                unrest: 0.0,
                retaliation_risk: -2.0,
                sabotage_increment: 0,
            },
        );
        table.set(
            ActionKind::Sabotage,
            CityDelta {
                influence: -1.0,
                stability: -6.0,
                unrest: 8.0,
                retaliation_risk: 4.0,
                sabotage_increment: 1,
            },
        );
        table.set(
            ActionKind::Aid,
            CityDelta {
                influence: 2.0,
                stability: 3.0,
                unrest: -4.0,
                retaliation_risk: 0.0,
                sabotage_increment: 0,
            },
        );
        table.set(
            ActionKind::ExposeMedia,
            CityDelta {
                influence: 4.0,
                stability: -3.0,
                unrest: 2.0,
                retaliation_risk: 1.0,
                sabotage_increment: 0,
            },
        );
        table
    }

    pub fn set(&mut self, kind: ActionKind, delta: CityDelta) {
        self.effects.insert(kind, ActionEffect { delta });
    }

    pub fn get(&self, kind: ActionKind) -> Option<&ActionEffect> {
        self.effects.get(&kind)
    }

    pub fn contains(&self, kind: ActionKind) -> bool {
        self.effects.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
