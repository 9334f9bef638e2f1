//! The existing fleet of legacy units and its decommissioning behaviour.
use crate::id::define_id_type;
use crate::series::{Horizon, TimeSeries};
use crate::units::Capacity;
use itertools::Itertools;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use thiserror::Error;

define_id_type!(UnitID);

/// The default operating life applied to units with no retirement date
/// under [`RetirementPolicy::DefaultLife`] (80 years).
pub const DEFAULT_LIFE_MONTHS: u32 = 960;

/// An error arising from a malformed existing-unit record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidUnitError {
    /// A unit whose lifecycle dates are inverted or degenerate
    #[error("unit {id}: retirement month {retirement} must be after entry month {entry}")]
    RetirementBeforeEntry {
        /// The unit's ID
        id: UnitID,
        /// The unit's entry month
        entry: u32,
        /// The unit's retirement month
        retirement: u32,
    },
    /// A unit with a non-finite or non-positive capacity
    #[error("unit {id}: capacity must be a finite, positive number")]
    BadCapacity {
        /// The unit's ID
        id: UnitID,
    },
}

/// A legacy production unit with known lifecycle dates.
///
/// Immutable once constructed; the constructor rejects malformed lifecycle
/// dates so the rest of the pipeline never sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingUnit {
    /// A unique identifier for the unit
    pub id: UnitID,
    /// The month the unit entered service
    pub entry_month: u32,
    /// The month the unit retires, if known.
    ///
    /// `None` means the retirement date is open-ended; how such units are
    /// treated is governed by the ledger's [`RetirementPolicy`].
    pub retirement_month: Option<u32>,
    /// The unit's capacity contribution while online
    pub capacity: Capacity,
}

impl ExistingUnit {
    /// Create an existing-unit record, validating its lifecycle dates
    pub fn new(
        id: UnitID,
        entry_month: u32,
        retirement_month: Option<u32>,
        capacity: Capacity,
    ) -> Result<Self, InvalidUnitError> {
        if let Some(retirement) = retirement_month
            && retirement <= entry_month
        {
            return Err(InvalidUnitError::RetirementBeforeEntry {
                id,
                entry: entry_month,
                retirement,
            });
        }
        if !(capacity.is_finite() && capacity > Capacity(0.0)) {
            return Err(InvalidUnitError::BadCapacity { id });
        }

        Ok(Self {
            id,
            entry_month,
            retirement_month,
            capacity,
        })
    }
}

/// How units with no retirement date are treated.
///
/// The legacy data sources are inconsistent here, so the choice is an explicit
/// per-scenario option rather than an implicit behaviour.
#[derive(Debug, Clone, Copy, PartialEq, SerializeLabeledStringEnum, DeserializeLabeledStringEnum)]
pub enum RetirementPolicy {
    /// Open-ended units stay online through the full horizon
    #[string = "through_horizon"]
    ThroughHorizon,
    /// Open-ended units retire after a fixed default operating life
    #[string = "default_life"]
    DefaultLife,
}

impl Default for RetirementPolicy {
    fn default() -> Self {
        // Assuming units run forever silently overestimates long-run capacity
        Self::DefaultLife
    }
}

/// Holds the legacy fleet and produces its capacity and decommissioning curves.
#[derive(Debug, Clone)]
pub struct FleetLedger {
    units: Vec<ExistingUnit>,
    policy: RetirementPolicy,
    default_life_months: u32,
}

impl FleetLedger {
    /// Create a ledger from an explicit list of units.
    ///
    /// `default_life_months` only applies to units with no retirement date and
    /// only under [`RetirementPolicy::DefaultLife`].
    pub fn new(
        units: Vec<ExistingUnit>,
        policy: RetirementPolicy,
        default_life_months: u32,
    ) -> Self {
        Self {
            units,
            policy,
            default_life_months,
        }
    }

    /// The units held by the ledger
    pub fn units(&self) -> &[ExistingUnit] {
        &self.units
    }

    /// The month from which the unit no longer contributes capacity.
    ///
    /// For open-ended units this is derived from the retirement policy; it may
    /// lie beyond the horizon, in which case the unit never retires within it.
    fn effective_retirement(&self, unit: &ExistingUnit, horizon: Horizon) -> u32 {
        match (unit.retirement_month, self.policy) {
            (Some(month), _) => month,
            (None, RetirementPolicy::ThroughHorizon) => horizon.duration(),
            (None, RetirementPolicy::DefaultLife) => {
                unit.entry_month.saturating_add(self.default_life_months)
            }
        }
    }

    /// The total online capacity of the legacy fleet for each month.
    ///
    /// A unit contributes its full capacity from `entry_month` up to (but not
    /// including) its retirement month. Decommissioning is unconditional: the
    /// contribution drops to zero at the retirement month and never returns.
    pub fn online_capacity_curve(&self, horizon: Horizon) -> TimeSeries {
        let mut curve = TimeSeries::zeros(horizon);
        let duration = horizon.duration();
        for unit in &self.units {
            let start = unit.entry_month.min(duration);
            let end = self.effective_retirement(unit, horizon).min(duration);
            if start < end {
                curve
                    .add_range(start, end, unit.capacity)
                    .expect("range clamped to horizon");
            }
        }

        curve
    }

    /// The decommissioning events of units with a known retirement date,
    /// sorted by month.
    ///
    /// This is reporting output only; planning consumes the capacity curve.
    pub fn decommission_schedule(&self) -> Vec<(u32, UnitID)> {
        self.units
            .iter()
            .filter_map(|unit| Some((unit.retirement_month?, unit.id.clone())))
            .sorted_by_key(|&(month, _)| month)
            .collect()
    }
}
