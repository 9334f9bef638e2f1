//! Month-indexed capacity series over a fixed planning horizon.
//!
//! Every curve the planner works with (demand, legacy online capacity,
//! committed capacity, gaps) is a [`TimeSeries`] of the same length. Series
//! are plain values passed between pipeline stages; there is no shared state.
use crate::units::Capacity;
use serde::Deserialize;
use thiserror::Error;

/// The planning horizon, in months.
///
/// All time series share this length and are indexed by month `0..duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Horizon(pub u32);

impl Horizon {
    /// The number of months in the horizon
    pub fn duration(&self) -> u32 {
        self.0
    }

    /// Iterate over the month indices of the horizon
    pub fn months(&self) -> impl Iterator<Item = u32> {
        0..self.0
    }

    /// Whether the given month falls within the horizon
    pub fn contains(&self, month: u32) -> bool {
        month < self.0
    }
}

/// An error arising from indexing outside the planning horizon
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// A month index beyond the end of the horizon
    #[error("month {month} is outside the planning horizon of {duration} months")]
    OutOfRange {
        /// The offending month index
        month: u32,
        /// The length of the horizon
        duration: u32,
    },
    /// Arithmetic between series of different lengths
    #[error("time series lengths differ: {left} vs {right} months")]
    LengthMismatch {
        /// Length of the left-hand series
        left: u32,
        /// Length of the right-hand series
        right: u32,
    },
}

/// A fixed-length series of capacity values, one per month of the horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<Capacity>,
}

impl TimeSeries {
    /// A series of zeros spanning the given horizon
    pub fn zeros(horizon: Horizon) -> Self {
        Self {
            values: vec![Capacity(0.0); horizon.duration() as usize],
        }
    }

    /// Create a series from explicit per-month values
    pub fn from_values(values: Vec<Capacity>) -> Self {
        Self { values }
    }

    /// The length of the series in months
    pub fn len(&self) -> u32 {
        self.values.len() as u32
    }

    /// Whether the series spans zero months
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value for the given month
    pub fn get(&self, month: u32) -> Result<Capacity, RangeError> {
        self.values
            .get(month as usize)
            .copied()
            .ok_or(RangeError::OutOfRange {
                month,
                duration: self.len(),
            })
    }

    /// Check that two series span the same horizon
    fn check_same_length(&self, other: &TimeSeries) -> Result<(), RangeError> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(RangeError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            })
        }
    }

    /// Element-wise sum of two series
    pub fn add(&self, other: &TimeSeries) -> Result<TimeSeries, RangeError> {
        self.check_same_length(other)?;
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| a + b)
            .collect();
        Ok(TimeSeries { values })
    }

    /// Element-wise difference of two series
    pub fn subtract(&self, other: &TimeSeries) -> Result<TimeSeries, RangeError> {
        self.check_same_length(other)?;
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| a - b)
            .collect();
        Ok(TimeSeries { values })
    }

    /// Running total of the series
    pub fn cumulative_sum(&self) -> TimeSeries {
        let mut total = Capacity(0.0);
        let values = self
            .values
            .iter()
            .map(|&v| {
                total = total + v;
                total
            })
            .collect();
        TimeSeries { values }
    }

    /// Overwrite the months in `start..end` with `value`
    pub fn set_range(&mut self, start: u32, end: u32, value: Capacity) -> Result<(), RangeError> {
        self.slice_range(start, end)?.fill(value);
        Ok(())
    }

    /// Add `delta` to every month in `start..end`
    pub fn add_range(&mut self, start: u32, end: u32, delta: Capacity) -> Result<(), RangeError> {
        for v in self.slice_range(start, end)? {
            *v = *v + delta;
        }
        Ok(())
    }

    /// A mutable view of the months in `start..end`
    fn slice_range(&mut self, start: u32, end: u32) -> Result<&mut [Capacity], RangeError> {
        let duration = self.len();
        let month = if start > end { start } else { end };
        if start > end || end > duration {
            return Err(RangeError::OutOfRange { month, duration });
        }
        Ok(&mut self.values[start as usize..end as usize])
    }

    /// Iterate over `(month, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, Capacity)> + '_ {
        self.values.iter().enumerate().map(|(m, &v)| (m as u32, v))
    }

    /// The per-month values as a slice
    pub fn values(&self) -> &[Capacity] {
        &self.values
    }
}
