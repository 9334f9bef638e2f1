//! Fixtures for tests

use crate::catalog::{Catalog, UnitType};
use crate::units::{Capacity, Dimensionless};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Build a unit type with the given parameters
pub fn unit_type(id: &str, power: f64, af: f64, lifetime: u32, share: Option<u32>) -> UnitType {
    UnitType {
        id: id.into(),
        power: Capacity(power),
        availability_factor: Dimensionless(af),
        lifetime_months: lifetime,
        share,
    }
}

/// A two-type catalog: an 80 MW unit and a 20 MW unit, both 24-month life
#[fixture]
pub fn catalog() -> Catalog {
    Catalog::new(vec![
        unit_type("big", 80.0, 1.0, 24, None),
        unit_type("small", 20.0, 1.0, 24, None),
    ])
    .unwrap()
}
