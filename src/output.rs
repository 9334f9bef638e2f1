//! The module responsible for writing planning results to disk.
use crate::catalog::UnitTypeID;
use crate::fleet::UnitID;
use crate::planner::PlanOutcome;
use crate::schedule::ExternalSchedule;
use crate::series::TimeSeries;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The root folder in which scenario-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "fleetplan_results";

/// The output file name for the deployment schedule
const SCHEDULE_FILE_NAME: &str = "deployment_schedule.csv";

/// The output file name for legacy decommissioning events
const DECOMMISSIONING_FILE_NAME: &str = "decommissioning.csv";

/// The output file name for the capacity curves
const CAPACITY_FILE_NAME: &str = "capacity.csv";

/// Get the default output folder for the scenario at the specified path
pub fn get_output_dir(scenario_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let scenario_dir = scenario_dir
        .canonicalize()
        .context("Could not resolve path to scenario")?;

    let scenario_name = scenario_dir
        .file_name()
        .context("Scenario cannot be in root folder")?
        .to_str()
        .context("Invalid chars in scenario dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, scenario_name].iter().collect())
}

/// Create a new output directory, optionally replacing an existing one.
///
/// # Returns
///
/// Whether an existing directory was overwritten.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    let existed = output_dir.is_dir();
    if existed {
        ensure!(
            overwrite,
            "Output directory {} already exists (pass --overwrite to replace it)",
            output_dir.display()
        );
        fs::remove_dir_all(output_dir)?;
    }

    fs::create_dir_all(output_dir)?;
    Ok(existed)
}

/// A row of the deployment schedule CSV file.
///
/// This is the external key/value time-series block consumed by the
/// simulator's templating layer: for each build month, the number of units of
/// each type entering service.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ScheduleRow {
    build_month: u32,
    unit_type_id: UnitTypeID,
    count: u32,
}

/// A row of the decommissioning CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DecommissioningRow {
    month: u32,
    unit_id: UnitID,
}

/// A row of the capacity curves CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CapacityRow {
    month: u32,
    demand: f64,
    legacy_online: f64,
    committed_online: f64,
    gap: f64,
}

/// Write the deployment schedule in its external form
fn write_schedule(output_dir: &Path, external: &ExternalSchedule) -> Result<()> {
    let file_path = output_dir.join(SCHEDULE_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (&build_month, counts) in external {
        for (unit_type_id, &count) in counts {
            writer.serialize(ScheduleRow {
                build_month,
                unit_type_id: unit_type_id.clone(),
                count,
            })?;
        }
    }
    writer.flush()?;

    Ok(())
}

/// Write the legacy decommissioning events
fn write_decommissioning(output_dir: &Path, events: &[(u32, UnitID)]) -> Result<()> {
    let file_path = output_dir.join(DECOMMISSIONING_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (month, unit_id) in events {
        writer.serialize(DecommissioningRow {
            month: *month,
            unit_id: unit_id.clone(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the demand, online-capacity and gap curves
fn write_capacity_curves(
    output_dir: &Path,
    demand: &TimeSeries,
    legacy_online: &TimeSeries,
    outcome: &PlanOutcome,
) -> Result<()> {
    let file_path = output_dir.join(CAPACITY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for (month, demand) in demand.iter() {
        writer.serialize(CapacityRow {
            month,
            demand: demand.value(),
            legacy_online: legacy_online.get(month)?.value(),
            committed_online: outcome.committed_online.get(month)?.value(),
            gap: outcome.residual_gap.get(month)?.value(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write all planning results for a scenario run.
///
/// # Arguments
///
/// * `output_dir` - The output directory (must already exist)
/// * `demand` - The demand curve that was planned against
/// * `legacy_online` - The legacy fleet's online capacity curve
/// * `decommissioning` - The legacy decommissioning events
/// * `outcome` - The planner's result
pub fn write_results(
    output_dir: &Path,
    demand: &TimeSeries,
    legacy_online: &TimeSeries,
    decommissioning: &[(u32, UnitID)],
    outcome: &PlanOutcome,
) -> Result<()> {
    write_schedule(output_dir, &outcome.schedule.to_external())?;
    write_decommissioning(output_dir, decommissioning)?;
    write_capacity_curves(output_dir, demand, legacy_online, outcome)?;

    Ok(())
}
