//! Capacity-gap computation.
use crate::series::{RangeError, TimeSeries};

/// The gap between demand and online capacity for each month.
///
/// Positive values mean undersupply, negative values mean oversupply.
/// Oversupply is deliberately preserved (not clamped to zero) so the planner
/// can see it and avoid over-building.
pub fn capacity_gap(demand: &TimeSeries, online: &TimeSeries) -> Result<TimeSeries, RangeError> {
    demand.subtract(online)
}
