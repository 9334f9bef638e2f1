//! Code for reading an explicit demand curve from a CSV file.
use super::*;
use crate::demand::DemandCurve;
use crate::series::Horizon;
use crate::units::Capacity;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const DEMAND_FILE_NAME: &str = "demand.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct DemandRaw {
    month: u32,
    demand: Capacity,
}

/// Whether the scenario directory provides an explicit demand file
pub fn demand_file_exists(scenario_dir: &Path) -> bool {
    scenario_dir.join(DEMAND_FILE_NAME).is_file()
}

/// Read the explicit demand CSV file from the scenario directory.
///
/// The file must contain one row per month of the horizon, in order, starting
/// at month zero.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
/// * `horizon` - The planning horizon the curve must span
pub fn read_demand(scenario_dir: &Path, horizon: Horizon) -> Result<DemandCurve> {
    let file_path = scenario_dir.join(DEMAND_FILE_NAME);
    let demand_csv = read_csv(&file_path)?;
    read_demand_from_iter(demand_csv, horizon).with_context(|| input_err_msg(&file_path))
}

/// Process demand rows from an iterator, checking coverage and ordering.
fn read_demand_from_iter<I>(iter: I, horizon: Horizon) -> Result<DemandCurve>
where
    I: Iterator<Item = DemandRaw>,
{
    let values: Vec<Capacity> = iter
        .enumerate()
        .map(|(index, raw)| {
            ensure!(
                raw.month == index as u32,
                "Expected month {index} but found {} (rows must start at month 0 and be in order)",
                raw.month
            );
            Ok(raw.demand)
        })
        .try_collect()?;

    ensure!(
        values.len() as u32 == horizon.duration(),
        "Demand file has {} rows but the horizon is {} months",
        values.len(),
        horizon.duration()
    );

    DemandCurve::explicit(horizon, values)
}
