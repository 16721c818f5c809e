//! City registry - canonical per-city state and its sole mutation entry point

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::CityCatalog;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CityId, Tick};

/// Bounded stat fields are clamped to this range after every mutation
const STAT_MIN: f64 = 0.0;
const STAT_MAX: f64 = 100.0;

/// Per-city state record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,

    /// Player's foothold in the city (0-100)
    pub influence: f64,
    /// Regime control (0-100), inversely related to unrest
    pub stability: f64,
    /// Popular unrest (0-100)
    pub unrest: f64,
    /// Probability weight for adversary retaliation (0-100)
    pub retaliation_risk: f64,
    /// Lifetime count of sabotage actions resolved here
    pub sabotage_count: u32,
    /// Tick of the most recent action resolved against this city
    pub last_action_tick: Tick,
}

/// Signed adjustment applied to a city's stats.
///
/// Bounded fields saturate at [0, 100] rather than wrapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityDelta {
    pub influence: f64,
    pub stability: f64,
    pub unrest: f64,
    pub retaliation_risk: f64,
    pub sabotage_increment: u32,
}

impl CityDelta {
    /// Reject non-finite adjustments before they can reach city state
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("influence", self.influence),
            ("stability", self.stability),
            ("unrest", self.unrest),
            ("retaliation_risk", self.retaliation_risk),
        ] {
            if !value.is_finite() {
                return Err(EngineError::InvalidDelta(format!(
                    "{} adjustment is not finite: {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

fn clamp_stat(value: f64) -> f64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Owns every city record for one session.
///
/// Cities are created once from the catalog and never destroyed. The
/// backing `Vec` preserves catalog order so iteration (and therefore
/// float aggregation downstream) is deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct CityRegistry {
    cities: Vec<City>,
    #[serde(skip)]
    index: AHashMap<CityId, usize>,
}

impl CityRegistry {
    /// Build the registry from seed data, in catalog order
    pub fn from_catalog(catalog: &CityCatalog) -> Self {
        let cities: Vec<City> = catalog
            .seeds()
            .iter()
            .map(|seed| City {
                id: CityId::new(&seed.name),
                display_name: seed.name.clone(),
                lat: seed.lat,
                lon: seed.lon,
                influence: clamp_stat(seed.influence),
                stability: clamp_stat(seed.stability),
                unrest: clamp_stat(seed.unrest),
                retaliation_risk: clamp_stat(seed.retaliation_risk),
                sabotage_count: 0,
                last_action_tick: 0,
            })
            .collect();

        let index = cities
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Self { cities, index }
    }

    pub fn contains(&self, id: &CityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, id: &CityId) -> Result<&City> {
        self.index
            .get(id)
            .map(|&i| &self.cities[i])
            .ok_or_else(|| EngineError::CityNotFound(id.clone()))
    }

    /// Iterate cities in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn ids(&self) -> Vec<CityId> {
        self.cities.iter().map(|c| c.id.clone()).collect()
    }

    /// Apply a delta to one city. The only mutation entry point.
    ///
    /// The delta is validated before any field is touched, so a failed
    /// apply leaves the city unchanged. Bounded fields saturate at
    /// [0, 100]; `sabotage_count` only ever grows.
    pub fn apply(&mut self, id: &CityId, delta: &CityDelta, tick: Tick) -> Result<&City> {
        delta.validate()?;

        let &i = self
            .index
            .get(id)
            .ok_or_else(|| EngineError::CityNotFound(id.clone()))?;

        let city = &mut self.cities[i];
        city.influence = clamp_stat(city.influence + delta.influence);
        city.stability = clamp_stat(city.stability + delta.stability);
        city.unrest = clamp_stat(city.unrest + delta.unrest);
        city.retaliation_risk = clamp_stat(city.retaliation_risk + delta.retaliation_risk);
        city.sabotage_count += delta.sabotage_increment;
        city.last_action_tick = tick;

        Ok(&self.cities[i])
    }
}
