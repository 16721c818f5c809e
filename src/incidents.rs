//! Scripted world incidents
//!
//! Background events that fire on a fixed tick interval: booms distract,
//! videos go viral, the state cracks down. Each incident targets one city
//! and is expressed as an ordinary registry delta, so incidents share the
//! same mutation path and clamping rules as player actions.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::CityId;
use crate::registry::{CityDelta, CityRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    /// A sudden boom distracts the populace, eroding the player's foothold
    EconomicBoom,
    /// A viral video exposing state corruption boosts influence
    ViralVideo,
    /// A state propaganda push shores up regime control
    PropagandaPush,
    /// International aid improves conditions, lifting influence and calm
    AidPackage,
    /// A crackdown on dissent in a high-influence city
    StateCrackdown,
}

impl IncidentKind {
    const ALL: [IncidentKind; 5] = [
        IncidentKind::EconomicBoom,
        IncidentKind::ViralVideo,
        IncidentKind::PropagandaPush,
        IncidentKind::AidPackage,
        IncidentKind::StateCrackdown,
    ];

    pub fn delta(&self) -> CityDelta {
        match self {
            IncidentKind::EconomicBoom => CityDelta {
                influence: -5.0,
                ..CityDelta::default()
            },
            IncidentKind::ViralVideo => CityDelta {
                influence: 5.0,
                ..CityDelta::default()
            },
            IncidentKind::PropagandaPush => CityDelta {
                stability: 5.0,
                ..CityDelta::default()
            },
            IncidentKind::AidPackage => CityDelta {
                influence: 3.0,
                unrest: -2.0,
                ..CityDelta::default()
            },
            IncidentKind::StateCrackdown => CityDelta {
                influence: -10.0,
                stability: 5.0,
                unrest: 3.0,
                ..CityDelta::default()
            },
        }
    }
}

impl std::fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IncidentKind::EconomicBoom => "economic-boom",
            IncidentKind::ViralVideo => "viral-video",
            IncidentKind::PropagandaPush => "propaganda-push",
            IncidentKind::AidPackage => "aid-package",
            IncidentKind::StateCrackdown => "state-crackdown",
        };
        f.write_str(name)
    }
}

/// Roll the next incident and pick its target city.
///
/// Crackdowns only target cities where the player has a real foothold
/// (influence above `crackdown_floor`); when none qualify the incident
/// fizzles and `None` is returned. Other kinds target any city.
pub fn roll_incident(
    registry: &CityRegistry,
    crackdown_floor: f64,
    rng: &mut ChaCha8Rng,
) -> Option<(CityId, IncidentKind)> {
    if registry.is_empty() {
        return None;
    }

    let kind = IncidentKind::ALL[rng.gen_range(0..IncidentKind::ALL.len())];

    let target = match kind {
        IncidentKind::StateCrackdown => {
            let candidates: Vec<&CityId> = registry
                .iter()
                .filter(|c| c.influence > crackdown_floor)
                .map(|c| &c.id)
                .collect();
            if candidates.is_empty() {
                return None;
            }
            candidates[rng.gen_range(0..candidates.len())].clone()
        }
        _ => {
            let i = rng.gen_range(0..registry.len());
            registry.iter().nth(i).map(|c| c.id.clone())?
        }
    };

    Some((target, kind))
}
