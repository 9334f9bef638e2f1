//! Scenario configuration: `scenario.toml` plus the tabular input files.
//!
//! A scenario directory contains:
//!
//! * `scenario.toml` - horizon, demand shape and policy options (see
//!   [`ScenarioParameters`])
//! * `catalog.csv` - the deployable unit types
//! * `fleet.csv` - the legacy fleet (optional; omit for an empty fleet)
//! * `demand.csv` - an explicit demand curve (optional; overrides the
//!   `[demand]` section)
use crate::catalog::Catalog;
use crate::demand::DemandCurve;
use crate::fleet::{DEFAULT_LIFE_MONTHS, FleetLedger, RetirementPolicy};
use crate::input::catalog::read_catalog;
use crate::input::demand::{demand_file_exists, read_demand};
use crate::input::fleet::read_fleet;
use crate::input::{input_err_msg, read_toml};
use crate::planner::PlannerConfig;
use crate::series::Horizon;
use crate::units::Capacity;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const SCENARIO_FILE_NAME: &str = "scenario.toml";

fn default_life_months() -> u32 {
    DEFAULT_LIFE_MONTHS
}

fn zero_capacity() -> Capacity {
    Capacity(0.0)
}

/// The `[demand]` section: a step-shaped demand curve
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DemandStepParameters {
    /// The month the demand target takes effect
    pub start_month: u32,
    /// The flat demand target from `start_month` onwards
    pub level: Capacity,
    /// The demand level before `start_month` (defaults to zero)
    #[serde(default = "zero_capacity")]
    pub base: Capacity,
}

/// The `[fleet]` section: how the legacy fleet is interpreted
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FleetParameters {
    /// How units with no retirement date are treated
    #[serde(default)]
    pub retirement_policy: RetirementPolicy,
    /// The operating life applied under the `default_life` policy, in months
    #[serde(default = "default_life_months")]
    pub default_life_months: u32,
}

impl Default for FleetParameters {
    fn default() -> Self {
        Self {
            retirement_policy: RetirementPolicy::default(),
            default_life_months: DEFAULT_LIFE_MONTHS,
        }
    }
}

/// The `[planner]` section: planner options
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PlannerParameters {
    /// Restrict deployment to this unit type for the whole run
    pub only_unit_type: Option<String>,
}

/// Represents the contents of the entire scenario file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioParameters {
    /// The planning horizon, in months
    pub duration: u32,
    /// The demand step, if no explicit demand.csv is provided
    pub demand: Option<DemandStepParameters>,
    /// Legacy fleet options
    #[serde(default)]
    pub fleet: FleetParameters,
    /// Planner options
    #[serde(default)]
    pub planner: PlannerParameters,
}

impl ScenarioParameters {
    /// Read a scenario file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario configuration files
    pub fn from_path<P: AsRef<Path>>(scenario_dir: P) -> Result<ScenarioParameters> {
        let file_path = scenario_dir.as_ref().join(SCENARIO_FILE_NAME);
        let params: ScenarioParameters = read_toml(&file_path)?;
        params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        ensure!(self.duration > 0, "duration must be greater than zero");
        ensure!(
            self.fleet.default_life_months > 0,
            "default_life_months must be greater than zero"
        );

        if let Some(demand) = &self.demand {
            ensure!(
                demand.start_month < self.duration,
                "demand start_month must lie within the planning horizon"
            );
        }

        Ok(())
    }
}

/// A fully loaded, immutable planning scenario.
///
/// Safe to share across concurrent runs; each run keeps its own planner state.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// The planning horizon
    pub horizon: Horizon,
    /// The demand curve the planner tracks
    pub demand: DemandCurve,
    /// The legacy fleet
    pub ledger: FleetLedger,
    /// The deployable unit types
    pub catalog: Catalog,
    /// Planner options
    pub planner_config: PlannerConfig,
}

impl Scenario {
    /// Load a scenario from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `scenario_dir` - Folder containing scenario configuration files
    pub fn from_path(scenario_dir: &Path) -> Result<Scenario> {
        let params = ScenarioParameters::from_path(scenario_dir)?;
        let horizon = Horizon(params.duration);

        let demand = if demand_file_exists(scenario_dir) {
            if params.demand.is_some() {
                warn!("Both demand.csv and a [demand] section are present; using demand.csv");
            }
            read_demand(scenario_dir, horizon)?
        } else {
            let step = params
                .demand
                .as_ref()
                .context("No demand.csv found and no [demand] section in scenario.toml")?;
            DemandCurve::step(horizon, step.base, step.level, step.start_month)?
        };

        let units = read_fleet(scenario_dir)?;
        let ledger = FleetLedger::new(
            units,
            params.fleet.retirement_policy,
            params.fleet.default_life_months,
        );
        let catalog = read_catalog(scenario_dir)?;

        // Resolve the restriction against the catalog so a bad type name fails
        // at load time rather than mid-run
        let only_unit_type = params
            .planner
            .only_unit_type
            .as_deref()
            .map(|id| catalog.get_id_by_str(id))
            .transpose()
            .with_context(|| input_err_msg(scenario_dir.join(SCENARIO_FILE_NAME)))?;
        let planner_config = PlannerConfig { only_unit_type };

        Ok(Scenario {
            horizon,
            demand,
            ledger,
            catalog,
            planner_config,
        })
    }
}
