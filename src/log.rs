//! Event log and progress trackers
//!
//! Append-only ordered store of everything that happened in a session.
//! Sequence numbers are gapless and assigned at append time; the log is
//! never reordered or mutated after append, so replaying it from the
//! start always yields the same view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::actions::ActionKind;
use crate::core::types::{CityId, MilestoneId, Tick};
use crate::incidents::IncidentKind;

/// An immutable record of one thing that happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Strictly increasing, gapless, assigned at append time (from 0)
    pub seq: u64,
    pub tick: Tick,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    ActionPerformed { city: CityId, action: ActionKind },
    RetaliationTriggered { city: CityId, severity: f64 },
    IncidentStruck { city: CityId, incident: IncidentKind },
    /// Global milestone; carries no city
    MilestoneReached { milestone: MilestoneId },
}

/// Derived view over the log: counts per event kind plus the monotonic
/// set of milestones crossed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressTrackers {
    pub actions_performed: u64,
    pub retaliations: u64,
    pub incidents: u64,
    pub milestones: BTreeSet<MilestoneId>,
}

impl ProgressTrackers {
    pub fn milestone_reached(&self, milestone: MilestoneId) -> bool {
        self.milestones.contains(&milestone)
    }
}

/// The session event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its sequence number
    pub fn append(&mut self, tick: Tick, kind: EventKind) -> u64 {
        let seq = self.events.len() as u64;
        self.events.push(Event { seq, tick, kind });
        seq
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Ordered, restartable replay of the full log
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Fold the full log into progress trackers.
    ///
    /// Purely derived: replaying the same log always produces the same
    /// trackers, and milestones accumulate without ever un-crossing.
    pub fn trackers(&self) -> ProgressTrackers {
        let mut trackers = ProgressTrackers::default();
        for event in &self.events {
            match &event.kind {
                EventKind::ActionPerformed { .. } => trackers.actions_performed += 1,
                EventKind::RetaliationTriggered { .. } => trackers.retaliations += 1,
                EventKind::IncidentStruck { .. } => trackers.incidents += 1,
                EventKind::MilestoneReached { milestone } => {
                    trackers.milestones.insert(*milestone);
                }
            }
        }
        trackers
    }
}
