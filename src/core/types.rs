//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};

/// Session tick counter (simulation time unit)
pub type Tick = u64;

/// Stable identifier for a city (canonical catalog name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub String);

impl CityId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One-way threshold crossing recorded in the progress trackers.
///
/// Milestones are monotonic for the session: once crossed they stay
/// crossed even if the underlying metric later regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MilestoneId {
    /// Global solidarity climbed to or above the given percentage
    SolidarityReached(u32),
    /// Global IPI was driven down to or below the given percentage
    PressureBroken(u32),
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneId::SolidarityReached(t) => write!(f, "solidarity-reached-{}", t),
            MilestoneId::PressureBroken(t) => write!(f, "pressure-broken-{}", t),
        }
    }
}
