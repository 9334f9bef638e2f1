//! Deployment schedules and the external key/value representation.
//!
//! The in-memory [`DeploymentSchedule`] is what the planner produces; the
//! external form is the month-keyed build-count mapping consumed by the
//! simulator's templating layer. Converting between the two lives here so the
//! core can be tested independently of file formats.
use crate::catalog::UnitTypeID;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// A single unit deployment decision. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEvent {
    /// The catalog type of the deployed unit
    pub unit_type: UnitTypeID,
    /// The month the unit enters service
    pub build_month: u32,
}

/// The external representation of a schedule: for each build month, the number
/// of units of each type entering service that month. Months are ordered;
/// types keep their first-seen order within a month.
pub type ExternalSchedule = BTreeMap<u32, IndexMap<UnitTypeID, u32>>;

/// An ordered sequence of deployment events.
///
/// Multiple events may share a build month and multiplicity is meaningful, but
/// insertion order within a month is not: equality compares per-month per-type
/// counts.
#[derive(Debug, Clone, Default)]
pub struct DeploymentSchedule {
    events: Vec<DeploymentEvent>,
}

impl DeploymentSchedule {
    /// An empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deployment event
    pub fn push(&mut self, unit_type: UnitTypeID, build_month: u32) {
        self.events.push(DeploymentEvent {
            unit_type,
            build_month,
        });
    }

    /// The recorded events, in emission order
    pub fn events(&self) -> &[DeploymentEvent] {
        &self.events
    }

    /// The number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the schedule contains no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Convert to the external month-keyed build-count mapping
    pub fn to_external(&self) -> ExternalSchedule {
        let mut external = ExternalSchedule::new();
        for event in &self.events {
            *external
                .entry(event.build_month)
                .or_default()
                .entry(event.unit_type.clone())
                .or_insert(0) += 1;
        }

        external
    }

    /// Rebuild a schedule from the external mapping.
    ///
    /// Inverse of [`Self::to_external`]: a round trip through the external
    /// form yields an equal schedule.
    pub fn from_external(external: &ExternalSchedule) -> Self {
        let mut schedule = Self::new();
        for (&month, counts) in external {
            for (unit_type, &count) in counts {
                for _ in 0..count {
                    schedule.push(unit_type.clone(), month);
                }
            }
        }

        schedule
    }
}

impl PartialEq for DeploymentSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.to_external() == other.to_external()
    }
}
