//! Continuous energy loss and multiple scattering for the along-step phase.
//!
//! Charged tracks lose energy continuously at the tabulated restricted
//! stopping power and pick up a condensed-history angular deflection per
//! step. Both are deliberately local models: the loss is `dE/dx · ℓ`
//! evaluated at the step's starting energy (no range integral), and the
//! deflection is the Highland form of the multiple-scattering width.

use indexmap::IndexMap;
use rand::{Rng, RngCore};

use cascade_core::constants::PI;
use cascade_core::vec3::{from_spherical, rotate};
use cascade_core::{MaterialId, ParticleId, Real3};
use cascade_grid::{XsCalculator, XsGrid};

use crate::error::ParamsError;

/// Restricted stopping-power tables, one per (particle, material).
///
/// Values are `dE/dx` [MeV/cm] on the standard log-energy grid. Particles
/// with no table (neutrals) lose nothing continuously.
#[derive(Debug, Default)]
pub struct EnergyLossTables {
    tables: IndexMap<(ParticleId, MaterialId), XsGrid>,
    order: usize,
}

impl EnergyLossTables {
    /// Build from per-(particle, material) tables.
    ///
    /// An empty table set is valid: transport is then purely discrete.
    pub fn new(
        entries: Vec<(ParticleId, MaterialId, XsGrid)>,
        order: usize,
    ) -> Result<Self, ParamsError> {
        let mut tables = IndexMap::with_capacity(entries.len());
        for (particle, material, grid) in entries {
            XsCalculator::new(&grid, order)?;
            tables.insert((particle, material), grid);
        }
        Ok(Self { tables, order })
    }

    /// Stopping power [MeV/cm] at an energy; zero without a table.
    pub fn dedx(&self, particle: ParticleId, material: MaterialId, energy: f64) -> f64 {
        match self.tables.get(&(particle, material)) {
            Some(grid) => XsCalculator::new(grid, self.order)
                .expect("order validated at construction")
                .value(energy),
            None => 0.0,
        }
    }

    /// Energy lost over a step [MeV], clamped at the remaining energy.
    pub fn energy_loss(
        &self,
        particle: ParticleId,
        material: MaterialId,
        energy: f64,
        step: f64,
    ) -> f64 {
        (self.dedx(particle, material, energy) * step).min(energy)
    }
}

/// Highland-width condensed-history multiple scattering.
///
/// The polar deflection over a step is Rayleigh-distributed with width
/// `θ0 = 13.6 MeV / (β c p) · |z| · √(ℓ/X0) · (1 + 0.038 ln(ℓ/X0))`,
/// the azimuth uniform. Neutral particles and zero-length steps deflect
/// by nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighlandMsc;

impl HighlandMsc {
    /// Create the sampler.
    pub fn new() -> Self {
        Self
    }

    /// Width parameter θ0 [rad] for one step.
    pub fn theta0(&self, energy: f64, mass: f64, charge: f64, step: f64, rad_length: f64) -> f64 {
        if charge == 0.0 || step <= 0.0 || energy <= 0.0 {
            return 0.0;
        }
        let thickness = step / rad_length;
        let p_sq = energy * (energy + 2.0 * mass);
        // beta * p = p^2 / E_total
        let beta_p = p_sq / (energy + mass);
        let theta0 =
            13.6 / beta_p * charge.abs() * thickness.sqrt() * (1.0 + 0.038 * thickness.ln());
        theta0.max(0.0)
    }

    /// Sample the deflected direction after a step.
    pub fn deflect(
        &self,
        direction: &Real3,
        energy: f64,
        mass: f64,
        charge: f64,
        step: f64,
        rad_length: f64,
        rng: &mut dyn RngCore,
    ) -> Real3 {
        let theta0 = self.theta0(energy, mass, charge, step, rad_length);
        if theta0 <= 0.0 {
            return *direction;
        }
        // Rayleigh magnitude of a 2D Gaussian in the transverse plane.
        let u: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
        let theta = (theta0 * (-2.0 * u.ln()).sqrt()).min(PI);
        let phi = 2.0 * PI * rng.random::<f64>();
        rotate(&from_spherical(theta.cos(), phi), direction)
    }
}
