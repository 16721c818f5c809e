//! Static city catalog loading
//!
//! The catalog is collaborator-provided seed data: identifier, display
//! coordinates, and initial stat values for every city in a session.
//! It is read once at session start; the engine never writes it back.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;

/// Initial state for one city, as shipped in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySeed {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_influence")]
    pub influence: f64,
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default = "default_unrest")]
    pub unrest: f64,
    #[serde(default = "default_retaliation_risk")]
    pub retaliation_risk: f64,
}

fn default_influence() -> f64 {
    5.0
}

fn default_stability() -> f64 {
    70.0
}

fn default_unrest() -> f64 {
    15.0
}

fn default_retaliation_risk() -> f64 {
    10.0
}

/// The full city catalog for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityCatalog {
    seeds: Vec<CitySeed>,
}

impl CityCatalog {
    /// Build a catalog from seeds, dropping duplicate names.
    ///
    /// The first occurrence of a name wins, matching the merge behavior
    /// of the combined base + additional city lists the catalog is
    /// assembled from.
    pub fn from_seeds(seeds: Vec<CitySeed>) -> Self {
        let mut seen = AHashSet::new();
        let seeds = seeds
            .into_iter()
            .filter(|seed| seen.insert(seed.name.clone()))
            .collect();
        Self { seeds }
    }

    /// Parse a catalog from a JSON array of seeds
    pub fn from_json(json: &str) -> Result<Self> {
        let seeds: Vec<CitySeed> = serde_json::from_str(json)?;
        Ok(Self::from_seeds(seeds))
    }

    /// Load a catalog from a JSON file on disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn seeds(&self) -> &[CitySeed] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
