//! Cross-section tables and the interpolating calculator.
//!
//! A cross-section table stores one value per energy grid point. Beyond a
//! "prime" index the table stores `xs * E` instead of `xs`: at high energy
//! most cross sections approach a 1/E shape, and storing the product keeps
//! the interpolated quantity slowly varying. The calculator undoes the
//! scaling transparently, including for queries clamped past the grid ends,
//! which is where the 1/E asymptote actually applies.

use crate::error::GridError;
use crate::uniform::UniformLogGrid;

/// Immutable tabulated values on a [`UniformLogGrid`] energy axis.
///
/// Entries at indices `>= prime_index` are stored as `value * E`; a prime
/// index equal to the grid size disables scaling entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct XsGrid {
    loge: UniformLogGrid,
    values: Vec<f64>,
    prime_index: usize,
}

impl XsGrid {
    /// Build a table from an energy axis, per-point values, and an optional
    /// index where 1/E scaling begins.
    ///
    /// `values` are the stored representation: callers tabulating a scaled
    /// region must pre-multiply those entries by the grid-point energy.
    pub fn new(
        loge: UniformLogGrid,
        values: Vec<f64>,
        prime_index: Option<usize>,
    ) -> Result<Self, GridError> {
        if values.len() != loge.size() {
            return Err(GridError::SizeMismatch {
                grid: loge.size(),
                values: values.len(),
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::InvalidValue { index, value });
            }
        }
        let prime_index = prime_index.unwrap_or(loge.size());
        if prime_index > loge.size() {
            return Err(GridError::InvalidPrimeIndex {
                index: prime_index,
                size: loge.size(),
            });
        }
        Ok(Self {
            loge,
            values,
            prime_index,
        })
    }

    /// Convenience constructor from energy bounds and values, unscaled.
    pub fn from_bounds(emin: f64, emax: f64, values: Vec<f64>) -> Result<Self, GridError> {
        let loge = UniformLogGrid::from_bounds(emin, emax, values.len())?;
        Self::new(loge, values, None)
    }

    /// The energy axis.
    pub fn axis(&self) -> &UniformLogGrid {
        &self.loge
    }

    /// Stored (possibly scaled) value at a grid point.
    pub fn raw(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Index where 1/E scaling begins (grid size if disabled).
    pub fn prime_index(&self) -> usize {
        self.prime_index
    }

    /// Lowest tabulated energy [MeV].
    pub fn energy_min(&self) -> f64 {
        self.loge.front().exp()
    }

    /// Highest tabulated energy [MeV].
    pub fn energy_max(&self) -> f64 {
        self.loge.back().exp()
    }
}

/// Clamped Lagrange interpolation over an [`XsGrid`].
///
/// The interpolation order is chosen at construction: order 1 is linear
/// between the bracketing points, higher orders widen the stencil
/// symmetrically around the query (clipped at the grid ends, which reduces
/// the effective order there). Queries outside the grid clamp to the end
/// values, with 1/E scaling still applied past the prime index.
#[derive(Clone, Copy, Debug)]
pub struct XsCalculator<'a> {
    grid: &'a XsGrid,
    order: usize,
}

impl<'a> XsCalculator<'a> {
    /// Construct for a table and interpolation order.
    pub fn new(grid: &'a XsGrid, order: usize) -> Result<Self, GridError> {
        let size = grid.axis().size();
        if order < 1 || order >= size {
            return Err(GridError::InvalidOrder { order, size });
        }
        Ok(Self { grid, order })
    }

    /// Interpolated value at `energy` [MeV].
    pub fn value(&self, energy: f64) -> f64 {
        debug_assert!(energy > 0.0 && energy.is_finite());
        let axis = self.grid.axis();
        let loge = energy.ln();

        // Snap out-of-bounds queries to the closest grid point. The query
        // energy (not the grid-point energy) divides scaled values, which
        // is what produces the 1/E asymptote past the table ends.
        if loge <= axis.front() {
            return self.clamped(0, energy);
        }
        if loge >= axis.back() {
            return self.clamped(axis.size() - 1, energy);
        }

        let lower_idx = axis.find(loge);
        let order_steps = self.order / 2 + 1;
        let mut low = lower_idx.saturating_sub(order_steps - 1);
        let mut high = (lower_idx + order_steps + 1).min(axis.size());

        if self.order % 2 == 0 && high - low > self.order + 1 {
            // Even order: drop the stencil point farthest from the query.
            let low_dist = (loge - axis.get(lower_idx)).abs();
            let high_dist = (axis.get(lower_idx + 1) - loge).abs();
            if low_dist > high_dist {
                low += 1;
            } else {
                high -= 1;
            }
        }

        self.interpolate(energy, low, high)
    }

    /// Unscaled value at a grid point.
    pub fn value_at(&self, index: usize) -> f64 {
        self.clamped(index, self.grid.axis().energy(index))
    }

    /// Lowest tabulated energy [MeV].
    pub fn energy_min(&self) -> f64 {
        self.grid.energy_min()
    }

    /// Highest tabulated energy [MeV].
    pub fn energy_max(&self) -> f64 {
        self.grid.energy_max()
    }

    fn clamped(&self, index: usize, energy: f64) -> f64 {
        let mut result = self.grid.raw(index);
        if index >= self.grid.prime_index() {
            result /= energy;
        }
        result
    }

    fn interpolate(&self, energy: f64, low: usize, high: usize) -> f64 {
        let axis = self.grid.axis();
        let mut result = 0.0;
        for outer in low..high {
            let outer_e = axis.energy(outer);
            let mut num = 1.0;
            let mut denom = 1.0;
            for inner in low..high {
                if inner != outer {
                    let inner_e = axis.energy(inner);
                    num *= energy - inner_e;
                    denom *= outer_e - inner_e;
                }
            }
            let mut weighted = (num / denom) * self.grid.raw(outer);
            if outer >= self.grid.prime_index() {
                weighted /= outer_e;
            }
            result += weighted;
        }
        result
    }
}
