//! Common routines for handling input data.
use crate::units::Dimensionless;
use anyhow::{Context, Result};
use itertools::Itertools;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

pub mod catalog;
pub mod demand;
pub mod fleet;

/// Generate the standard error message prefix for a problem input file
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<impl Iterator<Item = T>> {
    let reader = csv::Reader::from_path(file_path).with_context(|| input_err_msg(file_path))?;
    let records: Vec<T> = reader
        .into_deserialize()
        .try_collect()
        .with_context(|| input_err_msg(file_path))?;

    Ok(records.into_iter())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let contents = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    toml::from_str(&contents).with_context(|| input_err_msg(file_path))
}

/// Read a proportion, checking that it is greater than zero and at most one
pub fn deserialise_proportion_nonzero<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(value > 0.0 && value <= 1.0) {
        Err(serde::de::Error::custom("Value must be > 0 and <= 1"))?;
    }

    Ok(Dimensionless(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize as DeserializeDerive;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[derive(Debug, DeserializeDerive, PartialEq)]
    struct Record {
        id: String,
        value: u32,
    }

    #[test]
    fn test_read_csv() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("records.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "id,value\na,1\nb,2").unwrap();
        }

        let records: Vec<Record> = read_csv(&file_path).unwrap().collect();
        assert_eq!(
            records,
            vec![
                Record {
                    id: "a".into(),
                    value: 1
                },
                Record {
                    id: "b".into(),
                    value: 2
                }
            ]
        );
    }

    #[test]
    fn test_read_csv_bad_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nonexistent.csv");
        assert!(read_csv::<Record>(&file_path).is_err());
    }

    #[test]
    fn test_read_toml() {
        #[derive(DeserializeDerive)]
        struct Table {
            value: u32,
        }

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("table.toml");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = 42").unwrap();
        }

        let table: Table = read_toml(&file_path).unwrap();
        assert_eq!(table.value, 42);

        // Invalid TOML
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "value = ").unwrap();
        }
        assert!(read_toml::<Table>(&file_path).is_err());
    }

    #[derive(DeserializeDerive)]
    struct Proportion {
        #[serde(deserialize_with = "deserialise_proportion_nonzero")]
        value: Dimensionless,
    }

    #[test]
    fn test_deserialise_proportion_nonzero() {
        let valid: Proportion = toml::from_str("value = 0.9").unwrap();
        assert_eq!(valid.value, Dimensionless(0.9));
        assert!(toml::from_str::<Proportion>("value = 0.0").is_err());
        assert!(toml::from_str::<Proportion>("value = 1.1").is_err());
    }
}
