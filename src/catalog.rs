//! The catalog of deployable unit types.
use crate::id::{IDCollection, define_id_type};
use crate::units::{Capacity, Dimensionless};
use indexmap::IndexMap;
use std::rc::Rc;
use thiserror::Error;

define_id_type!(UnitTypeID);

/// An error arising from a malformed unit-type catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A unit type whose power rating is not a positive finite number
    #[error("unit type {id}: power must be a finite, positive number")]
    NonPositivePower {
        /// The unit type's ID
        id: UnitTypeID,
    },
    /// A unit type with a zero operating lifetime
    #[error("unit type {id}: lifetime_months must be greater than zero")]
    NonPositiveLifetime {
        /// The unit type's ID
        id: UnitTypeID,
    },
    /// An availability factor outside (0, 1]
    #[error("unit type {id}: availability_factor must be in the range (0, 1]")]
    BadAvailabilityFactor {
        /// The unit type's ID
        id: UnitTypeID,
    },
    /// Two catalog entries sharing the same ID
    #[error("duplicate unit type {id} in catalog")]
    DuplicateUnitType {
        /// The duplicated ID
        id: UnitTypeID,
    },
    /// A planner restriction naming a type the catalog doesn't contain
    #[error("unit type {id} not present in catalog")]
    UnknownUnitType {
        /// The missing ID
        id: UnitTypeID,
    },
}

/// A deployable unit type from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitType {
    /// A unique identifier for the unit type
    pub id: UnitTypeID,
    /// The nameplate power rating of one unit
    pub power: Capacity,
    /// The fraction of the power rating actually delivered, in (0, 1]
    pub availability_factor: Dimensionless,
    /// The operating lifetime of a deployed unit, in months
    pub lifetime_months: u32,
    /// An optional cap on how many units of this type a scenario may deploy
    pub share: Option<u32>,
}

impl UnitType {
    /// The capacity one deployed unit contributes while online
    pub fn effective_power(&self) -> Capacity {
        self.power * self.availability_factor
    }

    /// Validate the unit type's parameters
    fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.power.is_finite() && self.power > Capacity(0.0)) {
            return Err(ConfigurationError::NonPositivePower {
                id: self.id.clone(),
            });
        }
        if self.lifetime_months == 0 {
            return Err(ConfigurationError::NonPositiveLifetime {
                id: self.id.clone(),
            });
        }
        let af = self.availability_factor;
        if !(af.is_finite() && af > Dimensionless(0.0) && af <= Dimensionless(1.0)) {
            return Err(ConfigurationError::BadAvailabilityFactor {
                id: self.id.clone(),
            });
        }

        Ok(())
    }
}

/// A map of [`UnitType`]s, keyed and iterated in declaration order
pub type UnitTypeMap = IndexMap<UnitTypeID, Rc<UnitType>>;

/// The validated unit-type catalog.
///
/// Types are consumed by the planner in a fixed priority order: descending
/// effective power, with ties broken by declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    types: UnitTypeMap,
}

impl Catalog {
    /// Create a catalog, validating every entry eagerly
    pub fn new(types: Vec<UnitType>) -> Result<Self, ConfigurationError> {
        let mut map = UnitTypeMap::new();
        for unit_type in types {
            unit_type.validate()?;
            let id = unit_type.id.clone();
            if map.insert(id.clone(), unit_type.into()).is_some() {
                return Err(ConfigurationError::DuplicateUnitType { id });
            }
        }

        Ok(Self { types: map })
    }

    /// Whether the catalog contains no unit types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The number of unit types in the catalog
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Look up a unit type by ID
    pub fn get(&self, id: &UnitTypeID) -> Option<&Rc<UnitType>> {
        self.types.get(id)
    }

    /// Get the ID of a unit type in the catalog by its string representation
    pub fn get_id_by_str(&self, id: &str) -> anyhow::Result<UnitTypeID> {
        self.types.get_id_by_str(id)
    }

    /// The unit types in planner priority order.
    ///
    /// Sorted by descending effective power; the sort is stable, so types with
    /// equal effective power keep their declaration order.
    pub fn by_priority(&self) -> Vec<Rc<UnitType>> {
        let mut types: Vec<_> = self.types.values().cloned().collect();
        types.sort_by(|a, b| {
            b.effective_power()
                .partial_cmp(&a.effective_power())
                .expect("effective powers are finite")
        });
        types
    }
}
