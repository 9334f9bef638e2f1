//! Code for reading the unit-type catalog from a CSV file.
use super::*;
use crate::catalog::{Catalog, UnitType};
use crate::units::{Capacity, Dimensionless};
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;

const CATALOG_FILE_NAME: &str = "catalog.csv";

#[derive(Debug, Deserialize, PartialEq)]
struct UnitTypeRaw {
    unit_type_id: String,
    power: Capacity,
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    availability_factor: Dimensionless,
    lifetime_months: u32,
    /// Empty field means no deployment cap for this type
    share: Option<u32>,
}

impl From<UnitTypeRaw> for UnitType {
    fn from(raw: UnitTypeRaw) -> Self {
        UnitType {
            id: raw.unit_type_id.into(),
            power: raw.power,
            availability_factor: raw.availability_factor,
            lifetime_months: raw.lifetime_months,
            share: raw.share,
        }
    }
}

/// Read the unit-type catalog CSV file from the scenario directory.
///
/// # Arguments
///
/// * `scenario_dir` - Folder containing scenario configuration files
pub fn read_catalog(scenario_dir: &Path) -> Result<Catalog> {
    let file_path = scenario_dir.join(CATALOG_FILE_NAME);
    let catalog_csv = read_csv::<UnitTypeRaw>(&file_path)?;
    let catalog = Catalog::new(catalog_csv.map_into().collect())
        .with_context(|| input_err_msg(&file_path))?;

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_catalog_file(dir_path: &Path, contents: &str) {
        let mut file = File::create(dir_path.join(CATALOG_FILE_NAME)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_read_catalog() {
        let dir = tempdir().unwrap();
        create_catalog_file(
            dir.path(),
            "unit_type_id,power,availability_factor,lifetime_months,share
big,80,1.0,240,
small,20,0.9,120,4",
        );

        let catalog = read_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);

        let big = catalog.get(&"big".into()).unwrap();
        assert_eq!(big.power, Capacity(80.0));
        assert_eq!(big.share, None);

        let small = catalog.get(&"small".into()).unwrap();
        assert_eq!(small.availability_factor, Dimensionless(0.9));
        assert_eq!(small.share, Some(4));
    }

    #[test]
    fn test_read_catalog_bad_availability() {
        let dir = tempdir().unwrap();
        create_catalog_file(
            dir.path(),
            "unit_type_id,power,availability_factor,lifetime_months,share
big,80,1.5,240,",
        );
        assert!(read_catalog(dir.path()).is_err());
    }

    #[test]
    fn test_read_catalog_bad_lifetime() {
        let dir = tempdir().unwrap();
        create_catalog_file(
            dir.path(),
            "unit_type_id,power,availability_factor,lifetime_months,share
big,80,1.0,0,",
        );
        assert!(read_catalog(dir.path()).is_err());
    }
}
