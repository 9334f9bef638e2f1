//! Demand curves: the capacity target the planner tracks.
use crate::series::{Horizon, TimeSeries};
use crate::units::Capacity;
use anyhow::{Result, ensure};

/// A non-negative capacity target for every month of the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCurve {
    series: TimeSeries,
}

impl DemandCurve {
    /// A piecewise-constant demand curve: `base` before `start_month`, `level`
    /// from `start_month` onwards.
    ///
    /// This is the common "transition" shape: little or no demand on the new
    /// fleet until a start month, then a flat target.
    pub fn step(
        horizon: Horizon,
        base: Capacity,
        level: Capacity,
        start_month: u32,
    ) -> Result<Self> {
        ensure!(
            horizon.contains(start_month),
            "demand start_month {start_month} is outside the planning horizon"
        );
        check_level(base)?;
        check_level(level)?;

        let mut series = TimeSeries::zeros(horizon);
        series.set_range(0, start_month, base)?;
        series.set_range(start_month, horizon.duration(), level)?;
        Ok(Self { series })
    }

    /// A demand curve from explicit per-month values
    pub fn explicit(horizon: Horizon, values: Vec<Capacity>) -> Result<Self> {
        ensure!(
            values.len() as u32 == horizon.duration(),
            "demand curve has {} entries but the horizon is {} months",
            values.len(),
            horizon.duration()
        );
        for &value in &values {
            check_level(value)?;
        }

        Ok(Self {
            series: TimeSeries::from_values(values),
        })
    }

    /// The demand values as a time series
    pub fn series(&self) -> &TimeSeries {
        &self.series
    }
}

/// Check that a demand level is a non-negative finite number
fn check_level(level: Capacity) -> Result<()> {
    ensure!(
        level.is_finite() && level >= Capacity(0.0),
        "demand must be a finite, non-negative number (got {level})"
    );

    Ok(())
}
