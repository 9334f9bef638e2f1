//! The greedy deployment planner.
//!
//! This is the core scheduling algorithm: a single deterministic forward sweep
//! over the horizon that deploys whole units to close each month's capacity
//! gap. It is a bin-covering greedy, not bin-packing: the objective is
//! minimising cumulative undersupply (the area where demand exceeds supply),
//! not minimising unit count or exact matching. It never revisits earlier
//! months, so it cannot recover from a gap the then-available unit sizes could
//! not cover; scenarios that want a global optimiser call one elsewhere.
use crate::catalog::{Catalog, ConfigurationError, UnitType, UnitTypeID};
use crate::demand::DemandCurve;
use crate::gap::capacity_gap;
use crate::schedule::DeploymentSchedule;
use crate::series::{Horizon, RangeError, TimeSeries};
use crate::units::Capacity;
use log::debug;
use std::rc::Rc;
use thiserror::Error;

/// The catalog contains no unit types while demand exceeds online capacity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the catalog has no deployable unit types but demand exceeds online capacity")]
pub struct EmptyCatalogError;

/// An error preventing a planning run from starting.
///
/// All of these are detected eagerly, before the forward sweep begins, so a
/// caller gets a single clear failure before any partial schedule is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Mismatched series lengths or out-of-horizon indices
    #[error(transparent)]
    Range(#[from] RangeError),
    /// A malformed catalog entry or planner restriction
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// No unit types to deploy while a gap exists
    #[error(transparent)]
    EmptyCatalog(#[from] EmptyCatalogError),
}

/// Per-scenario planner options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerConfig {
    /// Restrict deployment to a single named unit type.
    ///
    /// Used by scenarios that fix the unit mix; other catalog entries are
    /// ignored for the run.
    pub only_unit_type: Option<UnitTypeID>,
}

/// The result of a planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The deployment events, in build-month order
    pub schedule: DeploymentSchedule,
    /// The online capacity contributed by scheduled units, per month
    pub committed_online: TimeSeries,
    /// `demand - legacy - committed` per month (negative values = oversupply)
    pub residual_gap: TimeSeries,
    /// Total undersupply over the horizon, in capacity-months.
    ///
    /// Nonzero undersupply is a reportable scenario outcome, not an error:
    /// scenarios deliberately exploring undersupply are a primary use.
    pub undersupply: f64,
}

/// A catalog entry still eligible for deployment during the sweep
struct Candidate {
    unit_type: Rc<UnitType>,
    /// Deployments left under the type's share cap, if any
    remaining: Option<u32>,
}

impl Candidate {
    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }
}

/// Compute a deployment schedule that keeps online capacity tracking demand.
///
/// For each month in order, the effective gap is demand minus legacy and
/// committed capacity; while it is positive, the highest-priority unit type
/// whose effective power fits within `gap + tolerance` is deployed, where the
/// tolerance is one more unit of the smallest still-available type. A deployed
/// unit contributes its effective power for `lifetime_months` and drops out at
/// end of life, which the same sweep sees and may immediately cover with a
/// like-for-like replacement.
///
/// Residual undersupply (demand the catalog can never meet) is reported in the
/// outcome rather than raised as an error.
pub fn plan(
    horizon: Horizon,
    demand: &DemandCurve,
    legacy_online: &TimeSeries,
    catalog: &Catalog,
    config: &PlannerConfig,
) -> Result<PlanOutcome, PlanError> {
    let demand = demand.series();
    check_length(demand, horizon)?;
    check_length(legacy_online, horizon)?;

    let mut candidates = build_candidates(catalog, config)?;
    let initial_gap = capacity_gap(demand, legacy_online)?;
    if candidates.is_empty() {
        // Valid for scenarios where the legacy fleet alone covers demand
        if initial_gap.iter().any(|(_, g)| g > Capacity(0.0)) {
            return Err(EmptyCatalogError.into());
        }
        return Ok(PlanOutcome {
            schedule: DeploymentSchedule::new(),
            committed_online: TimeSeries::zeros(horizon),
            residual_gap: initial_gap,
            undersupply: 0.0,
        });
    }

    let mut schedule = DeploymentSchedule::new();
    let mut committed = TimeSeries::zeros(horizon);

    for month in horizon.months() {
        loop {
            // End-of-life capacity loss is already reflected here: a unit's
            // contribution spans [build, build + lifetime), so the month it
            // retires the gap reopens and may be covered in this iteration.
            let gap = initial_gap.get(month)? - committed.get(month)?;
            if gap <= Capacity(0.0) {
                break;
            }

            let Some(choice) = select_unit_type(&candidates, gap) else {
                // Every share cap is spent; the remaining gap stays as
                // reported undersupply
                break;
            };
            deploy(
                &mut candidates[choice],
                month,
                horizon,
                &mut schedule,
                &mut committed,
            )?;
        }
    }

    let residual_gap = initial_gap.subtract(&committed)?;
    let undersupply = residual_gap
        .iter()
        .map(|(_, g)| g.value().max(0.0))
        .sum();

    Ok(PlanOutcome {
        schedule,
        committed_online: committed,
        residual_gap,
        undersupply,
    })
}

/// Check a series spans the horizon
fn check_length(series: &TimeSeries, horizon: Horizon) -> Result<(), RangeError> {
    if series.len() == horizon.duration() {
        Ok(())
    } else {
        Err(RangeError::LengthMismatch {
            left: series.len(),
            right: horizon.duration(),
        })
    }
}

/// The candidate list in priority order, honouring any single-type restriction
fn build_candidates(
    catalog: &Catalog,
    config: &PlannerConfig,
) -> Result<Vec<Candidate>, ConfigurationError> {
    if let Some(id) = &config.only_unit_type
        && catalog.get(id).is_none()
    {
        return Err(ConfigurationError::UnknownUnitType { id: id.clone() });
    }

    let candidates = catalog
        .by_priority()
        .into_iter()
        .filter(|t| {
            config
                .only_unit_type
                .as_ref()
                .is_none_or(|only| &t.id == only)
        })
        .map(|unit_type| Candidate {
            remaining: unit_type.share,
            unit_type,
        })
        .collect();

    Ok(candidates)
}

/// Pick the candidate to deploy against a positive gap.
///
/// Returns the index of the first candidate (descending effective power) whose
/// effective power fits within `gap + tolerance`, where the tolerance is the
/// effective power of the smallest still-available type. If nothing fits, the
/// smallest available type is deployed anyway: temporary oversupply beats
/// permanent undersupply. Returns `None` once all share caps are spent.
fn select_unit_type(candidates: &[Candidate], gap: Capacity) -> Option<usize> {
    let smallest = candidates.iter().rposition(|c| !c.is_exhausted())?;
    let tolerance = candidates[smallest].unit_type.effective_power();

    let fitting = candidates
        .iter()
        .position(|c| !c.is_exhausted() && c.unit_type.effective_power() <= gap + tolerance);

    Some(fitting.unwrap_or(smallest))
}

/// Commit one unit of the candidate's type at the given month
fn deploy(
    candidate: &mut Candidate,
    month: u32,
    horizon: Horizon,
    schedule: &mut DeploymentSchedule,
    committed: &mut TimeSeries,
) -> Result<(), RangeError> {
    let unit_type = &candidate.unit_type;
    debug!("month {month}: deploying one {}", unit_type.id);

    schedule.push(unit_type.id.clone(), month);
    let end = month
        .saturating_add(unit_type.lifetime_months)
        .min(horizon.duration());
    committed.add_range(month, end, unit_type.effective_power())?;

    if let Some(remaining) = &mut candidate.remaining {
        *remaining -= 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{catalog, unit_type};
    use crate::schedule::DeploymentEvent;
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::rstest;

    fn flat_demand(horizon: Horizon, level: f64) -> DemandCurve {
        DemandCurve::step(horizon, Capacity(0.0), Capacity(level), 0).unwrap()
    }

    fn plan_simple(
        horizon: Horizon,
        demand: &DemandCurve,
        catalog: &Catalog,
    ) -> Result<PlanOutcome, PlanError> {
        plan(
            horizon,
            demand,
            &TimeSeries::zeros(horizon),
            catalog,
            &PlannerConfig::default(),
        )
    }

    /// Collect (unit type, build month) pairs from a schedule
    fn events(outcome: &PlanOutcome) -> Vec<(&str, u32)> {
        outcome
            .schedule
            .events()
            .iter()
            .map(|e| (e.unit_type.0.as_ref(), e.build_month))
            .collect()
    }

    #[rstest]
    fn test_exact_cover_with_two_types(catalog: Catalog) {
        // Gap of 100: big covers 80, small covers the remaining 20 exactly
        let horizon = Horizon(24);
        let outcome = plan_simple(horizon, &flat_demand(horizon, 100.0), &catalog).unwrap();

        assert_eq!(events(&outcome), [("big", 0), ("small", 0)]);
        assert_approx_eq!(f64, outcome.undersupply, 0.0);
        assert!(
            outcome
                .residual_gap
                .iter()
                .all(|(_, g)| g <= Capacity(0.0))
        );
    }

    #[rstest]
    fn test_monotonic_catalog_priority(catalog: Catalog) {
        // A gap of exactly 80 takes one big unit, never four smalls
        let horizon = Horizon(12);
        let outcome = plan_simple(horizon, &flat_demand(horizon, 80.0), &catalog).unwrap();
        assert_eq!(events(&outcome), [("big", 0)]);
    }

    #[test]
    fn test_minimal_count_cover_single_type() {
        // Demand jumps to 60 at month 5; three 25-power units cover it
        let horizon = Horizon(10);
        let demand = DemandCurve::step(horizon, Capacity(0.0), Capacity(60.0), 5).unwrap();
        let catalog = Catalog::new(vec![unit_type("unit", 25.0, 1.0, 10, None)]).unwrap();
        let outcome = plan_simple(horizon, &demand, &catalog).unwrap();

        assert_eq!(events(&outcome), [("unit", 5), ("unit", 5), ("unit", 5)]);
        assert_eq!(
            outcome.committed_online.get(5).unwrap(),
            Capacity(75.0) // 75 >= 60: one unit of temporary oversupply at most
        );
        assert_eq!(outcome.committed_online.get(4).unwrap(), Capacity(0.0));
    }

    #[test]
    fn test_end_of_life_replacement() {
        // A unit built at month 10 with a 240-month lifetime drops out of the
        // committed curve at month 250 and is replaced the same month
        let horizon = Horizon(260);
        let demand = DemandCurve::step(horizon, Capacity(0.0), Capacity(80.0), 10).unwrap();
        let catalog = Catalog::new(vec![unit_type("big", 80.0, 1.0, 240, None)]).unwrap();
        let outcome = plan_simple(horizon, &demand, &catalog).unwrap();

        assert_eq!(events(&outcome), [("big", 10), ("big", 250)]);
        assert_eq!(outcome.committed_online.get(249).unwrap(), Capacity(80.0));
        assert_eq!(outcome.committed_online.get(250).unwrap(), Capacity(80.0));
        assert_approx_eq!(f64, outcome.undersupply, 0.0);
    }

    #[test]
    fn test_availability_factor_derates_contribution() {
        // 100-power units at 0.5 availability contribute 50 each
        let horizon = Horizon(6);
        let catalog = Catalog::new(vec![unit_type("derated", 100.0, 0.5, 6, None)]).unwrap();
        let outcome = plan_simple(horizon, &flat_demand(horizon, 100.0), &catalog).unwrap();
        assert_eq!(outcome.schedule.len(), 2);
        assert_eq!(outcome.committed_online.get(0).unwrap(), Capacity(100.0));
    }

    #[test]
    fn test_share_cap_falls_through_to_next_type() {
        // Only one big unit allowed; the rest of the gap is filled with smalls
        let catalog = Catalog::new(vec![
            unit_type("big", 80.0, 1.0, 24, Some(1)),
            unit_type("small", 20.0, 1.0, 24, None),
        ])
        .unwrap();
        let horizon = Horizon(24);
        let outcome = plan_simple(horizon, &flat_demand(horizon, 160.0), &catalog).unwrap();

        let counts = events(&outcome).into_iter().counts();
        assert_eq!(counts[&("big", 0)], 1);
        assert_eq!(counts[&("small", 0)], 4);
        assert_approx_eq!(f64, outcome.undersupply, 0.0);
    }

    #[test]
    fn test_all_shares_spent_leaves_undersupply() {
        // One 20-power unit against a flat demand of 100: 80 short every month
        let horizon = Horizon(10);
        let catalog = Catalog::new(vec![unit_type("small", 20.0, 1.0, 120, Some(1))]).unwrap();
        let outcome = plan_simple(horizon, &flat_demand(horizon, 100.0), &catalog).unwrap();

        assert_eq!(outcome.schedule.len(), 1);
        assert_approx_eq!(f64, outcome.undersupply, 800.0);
    }

    #[rstest]
    fn test_only_unit_type_restriction(catalog: Catalog) {
        let horizon = Horizon(24);
        let config = PlannerConfig {
            only_unit_type: Some("small".into()),
        };
        let outcome = plan(
            horizon,
            &flat_demand(horizon, 50.0),
            &TimeSeries::zeros(horizon),
            &catalog,
            &config,
        )
        .unwrap();

        // Big is ignored; three smalls cover the 50 MW gap
        assert_eq!(events(&outcome), [("small", 0); 3]);
    }

    #[rstest]
    fn test_only_unit_type_unknown(catalog: Catalog) {
        let horizon = Horizon(24);
        let config = PlannerConfig {
            only_unit_type: Some("fusion".into()),
        };
        let result = plan(
            horizon,
            &flat_demand(horizon, 50.0),
            &TimeSeries::zeros(horizon),
            &catalog,
            &config,
        );
        assert_eq!(
            result.unwrap_err(),
            PlanError::Configuration(ConfigurationError::UnknownUnitType {
                id: "fusion".into()
            })
        );
    }

    #[test]
    fn test_empty_catalog_with_gap_is_fatal() {
        let horizon = Horizon(12);
        let catalog = Catalog::new(Vec::new()).unwrap();
        let result = plan_simple(horizon, &flat_demand(horizon, 10.0), &catalog);
        assert_eq!(result.unwrap_err(), PlanError::EmptyCatalog(EmptyCatalogError));
    }

    #[test]
    fn test_empty_catalog_without_gap_is_fine() {
        let horizon = Horizon(12);
        let catalog = Catalog::new(Vec::new()).unwrap();
        let legacy = TimeSeries::from_values(vec![Capacity(50.0); 12]);
        let outcome = plan(
            horizon,
            &flat_demand(horizon, 40.0),
            &legacy,
            &catalog,
            &PlannerConfig::default(),
        )
        .unwrap();
        assert!(outcome.schedule.is_empty());
        assert_approx_eq!(f64, outcome.undersupply, 0.0);
    }

    #[rstest]
    fn test_legacy_oversupply_blocks_deployment(catalog: Catalog) {
        // Legacy fleet oversupplies the early months; nothing is built until
        // it decommissions, and the oversupply is never "corrected"
        let horizon = Horizon(24);
        let mut legacy = TimeSeries::zeros(horizon);
        legacy.set_range(0, 12, Capacity(500.0)).unwrap();

        let outcome = plan(
            horizon,
            &flat_demand(horizon, 100.0),
            &legacy,
            &catalog,
            &PlannerConfig::default(),
        )
        .unwrap();

        let first_build = outcome
            .schedule
            .events()
            .iter()
            .map(|e| e.build_month)
            .min()
            .unwrap();
        assert_eq!(first_build, 12);
        assert_eq!(outcome.committed_online.get(11).unwrap(), Capacity(0.0));
    }

    #[rstest]
    fn test_demand_length_mismatch(catalog: Catalog) {
        let demand = flat_demand(Horizon(10), 100.0);
        let result = plan(
            Horizon(24),
            &demand,
            &TimeSeries::zeros(Horizon(24)),
            &catalog,
            &PlannerConfig::default(),
        );
        assert!(matches!(result.unwrap_err(), PlanError::Range(_)));
    }

    #[rstest]
    fn test_total_online_never_negative(catalog: Catalog) {
        let horizon = Horizon(36);
        let legacy = TimeSeries::from_values(vec![Capacity(30.0); 36]);
        let outcome = plan(
            horizon,
            &flat_demand(horizon, 100.0),
            &legacy,
            &catalog,
            &PlannerConfig::default(),
        )
        .unwrap();

        let total = outcome.committed_online.add(&legacy).unwrap();
        assert!(total.iter().all(|(_, v)| v >= Capacity(0.0)));
    }

    #[rstest]
    fn test_schedule_round_trips_through_external_form(catalog: Catalog) {
        let horizon = Horizon(24);
        let outcome = plan_simple(horizon, &flat_demand(horizon, 170.0), &catalog).unwrap();
        let external = outcome.schedule.to_external();
        assert_eq!(
            DeploymentSchedule::from_external(&external),
            outcome.schedule
        );
    }

    #[test]
    fn test_no_builds_past_horizon() {
        // Short-lived units retiring right at the end: the replacement chain
        // must stop at the horizon
        let horizon = Horizon(10);
        let catalog = Catalog::new(vec![unit_type("unit", 50.0, 1.0, 3, None)]).unwrap();
        let outcome = plan_simple(horizon, &flat_demand(horizon, 50.0), &catalog).unwrap();

        assert!(
            outcome
                .schedule
                .events()
                .iter()
                .all(|e| horizon.contains(e.build_month))
        );
        // Rebuilt every 3 months: 0, 3, 6, 9
        assert_eq!(events(&outcome), [("unit", 0), ("unit", 3), ("unit", 6), ("unit", 9)]);
    }

    #[test]
    fn test_events_are_immutable_values() {
        let event = DeploymentEvent {
            unit_type: "big".into(),
            build_month: 3,
        };
        let copy = event.clone();
        assert_eq!(event, copy);
    }
}
