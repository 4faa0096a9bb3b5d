//! Validation errors for grid construction.

use std::error::Error;
use std::fmt;

/// Errors detected when building a grid or calculator.
///
/// All variants are setup-time failures: a grid that constructs
/// successfully is valid for the lifetime of the run.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// Fewer than two grid points.
    TooFewPoints {
        /// The offending point count.
        size: usize,
    },
    /// Energy bounds are not positive and strictly increasing.
    InvalidBounds {
        /// Lower energy bound.
        emin: f64,
        /// Upper energy bound.
        emax: f64,
    },
    /// The value table length does not match the energy grid.
    SizeMismatch {
        /// Number of energy grid points.
        grid: usize,
        /// Number of tabulated values.
        values: usize,
    },
    /// A tabulated value is NaN, infinite, or negative.
    InvalidValue {
        /// Index of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// The scaled-region start index lies beyond the grid.
    InvalidPrimeIndex {
        /// The offending index.
        index: usize,
        /// Number of grid points.
        size: usize,
    },
    /// Interpolation order must be >= 1 and below the grid size.
    InvalidOrder {
        /// The requested order.
        order: usize,
        /// Number of grid points.
        size: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { size } => {
                write!(f, "grid needs at least 2 points, got {size}")
            }
            Self::InvalidBounds { emin, emax } => {
                write!(f, "energy bounds must satisfy 0 < emin < emax, got [{emin}, {emax}]")
            }
            Self::SizeMismatch { grid, values } => {
                write!(f, "value table length {values} does not match grid size {grid}")
            }
            Self::InvalidValue { index, value } => {
                write!(f, "tabulated value at index {index} is invalid: {value}")
            }
            Self::InvalidPrimeIndex { index, size } => {
                write!(f, "prime index {index} exceeds grid size {size}")
            }
            Self::InvalidOrder { order, size } => {
                write!(f, "interpolation order {order} invalid for grid of {size} points")
            }
        }
    }
}

impl Error for GridError {}
