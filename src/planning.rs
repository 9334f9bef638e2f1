//! The top-level planning pipeline.
//!
//! Wires the stages together in one direction: fleet ledger → gap → planner →
//! serializer → output files.
use crate::output::write_results;
use crate::planner::{PlanOutcome, plan};
use crate::scenario::Scenario;
use anyhow::Result;
use log::{info, warn};
use std::path::Path;

/// Run the planner for a scenario and write the results.
///
/// # Arguments
///
/// * `scenario` - The scenario to plan
/// * `output_path` - The folder to write output files to (must already exist)
///
/// # Returns
///
/// The planning outcome, or an error if the inputs are malformed.
pub fn run(scenario: &Scenario, output_path: &Path) -> Result<PlanOutcome> {
    let legacy_online = scenario.ledger.online_capacity_curve(scenario.horizon);
    let decommissioning = scenario.ledger.decommission_schedule();
    info!(
        "Legacy fleet: {} units, {} with known retirement dates",
        scenario.ledger.units().len(),
        decommissioning.len()
    );

    let outcome = plan(
        scenario.horizon,
        &scenario.demand,
        &legacy_online,
        &scenario.catalog,
        &scenario.planner_config,
    )?;
    info!(
        "Scheduled {} deployments over {} months",
        outcome.schedule.len(),
        scenario.horizon.duration()
    );
    if outcome.undersupply > 0.0 {
        warn!(
            "Demand is not fully met: {:.1} capacity-months of undersupply remain",
            outcome.undersupply
        );
    }

    write_results(
        output_path,
        scenario.demand.series(),
        &legacy_online,
        &decommissioning,
        &outcome,
    )?;

    Ok(outcome)
}
