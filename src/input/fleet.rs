//! Code for reading existing-unit records from a CSV file.
use super::*;
use crate::fleet::ExistingUnit;
use crate::units::Capacity;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::warn;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const FLEET_FILE_NAME: &str = "fleet.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct ExistingUnitRaw {
    unit_id: String,
    entry_month: u32,
    /// Empty field means the retirement date is open-ended
    retirement_month: Option<u32>,
    capacity: Capacity,
}

/// Read the legacy fleet CSV file from the scenario directory.
///
/// Scenarios without a legacy fleet may omit the file entirely.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
pub fn read_fleet(scenario_dir: &Path) -> Result<Vec<ExistingUnit>> {
    let file_path = scenario_dir.join(FLEET_FILE_NAME);
    if !file_path.is_file() {
        warn!("No fleet CSV file provided; assuming an empty legacy fleet");
        return Ok(Vec::new());
    }

    let fleet_csv = read_csv(&file_path)?;
    read_fleet_from_iter(fleet_csv).with_context(|| input_err_msg(&file_path))
}

/// Process existing-unit records from an iterator, validating each one.
fn read_fleet_from_iter<I>(iter: I) -> Result<Vec<ExistingUnit>>
where
    I: Iterator<Item = ExistingUnitRaw>,
{
    let mut ids = HashSet::new();
    iter.map(|raw| {
        ensure!(
            ids.insert(raw.unit_id.clone()),
            "Duplicate unit ID: {}",
            raw.unit_id
        );

        let unit = ExistingUnit::new(
            raw.unit_id.into(),
            raw.entry_month,
            raw.retirement_month,
            raw.capacity,
        )?;
        Ok(unit)
    })
    .try_collect()
}
