//! Compton scattering of photons off atomic electrons.
//!
//! Samples the scattered-photon energy fraction from the Klein-Nishina
//! cross section with the standard two-branch rejection method: the
//! envelope splits into a `1/ε` piece and a flat-in-`ε²` piece, and the
//! residual shape `1 − ε sin²θ / (1 + ε²)` rejects. The acceptance is
//! bounded well away from zero over the whole energy range, so the loop
//! terminates with a small, stable expected draw count.

use indexmap::IndexMap;
use rand::{Rng, RngCore};

use cascade_core::constants::{ELECTRON_MASS, PI};
use cascade_core::vec3::{added, from_spherical, is_soft_unit, make_unit_vector, rotate, scaled};
use cascade_core::{MaterialId, ParticleId};
use cascade_grid::{XsCalculator, XsGrid};
use cascade_track::Secondary;

use crate::applicability::Applicability;
use crate::error::ParamsError;
use crate::interaction::Interaction;
use crate::model::{InteractionModel, SampleContext};
use crate::params::ParticleParams;

/// Iteration bound for the rejection loop, asserted in debug builds.
///
/// The Klein-Nishina acceptance never falls below ~1/3, so hitting this
/// bound indicates a broken envelope, not bad luck.
const MAX_REJECTION_ITERATIONS: u32 = 1000;

/// Particle IDs the model needs from the registry.
#[derive(Clone, Copy, Debug)]
pub struct KleinNishinaIds {
    /// Incident photon.
    pub gamma: ParticleId,
    /// Recoil electron.
    pub electron: ParticleId,
}

/// Discrete model for `γ e− → γ e−` on quasi-free electrons.
///
/// The recoil electron is always emitted as a secondary; electrons below
/// the tracking cutoff are killed by the tracking-cut action on their
/// first step, depositing their energy where they were born.
#[derive(Debug)]
pub struct KleinNishinaModel {
    ids: KleinNishinaIds,
    tables: IndexMap<MaterialId, XsGrid>,
    order: usize,
    energy_min: f64,
    energy_max: f64,
}

impl KleinNishinaModel {
    /// Construct from particle IDs, per-material macroscopic cross-section
    /// tables [1/cm], and the incident-energy validity range.
    pub fn new(
        ids: KleinNishinaIds,
        particles: &ParticleParams,
        tables: Vec<(MaterialId, XsGrid)>,
        order: usize,
        energy_limits: (f64, f64),
    ) -> Result<Self, ParamsError> {
        for id in [ids.gamma, ids.electron] {
            if !particles.contains(id) {
                return Err(ParamsError::UnknownParticle { particle: id });
            }
        }
        if tables.is_empty() {
            return Err(ParamsError::NoTables {
                model: "klein-nishina".into(),
            });
        }
        let mut map = IndexMap::with_capacity(tables.len());
        for (material, grid) in tables {
            XsCalculator::new(&grid, order)?;
            map.insert(material, grid);
        }
        Ok(Self {
            ids,
            tables: map,
            order,
            energy_min: energy_limits.0,
            energy_max: energy_limits.1,
        })
    }

    /// Lowest possible scattered-photon energy for an incident energy.
    pub fn min_scattered_energy(&self, energy: f64) -> f64 {
        energy / (1.0 + 2.0 * energy / ELECTRON_MASS)
    }
}

impl InteractionModel for KleinNishinaModel {
    fn label(&self) -> &str {
        "klein-nishina"
    }

    fn applicability(&self) -> Vec<Applicability> {
        vec![Applicability {
            particle: self.ids.gamma,
            energy_min: self.energy_min,
            energy_max: self.energy_max,
        }]
    }

    fn macroscopic_xs(&self, material: MaterialId, energy: f64) -> f64 {
        match self.tables.get(&material) {
            Some(grid) => XsCalculator::new(grid, self.order)
                .expect("order validated at construction")
                .value(energy),
            None => 0.0,
        }
    }

    fn sample(&self, ctx: &SampleContext<'_>, rng: &mut dyn RngCore) -> Interaction {
        debug_assert!(ctx.particle == self.ids.gamma);
        debug_assert!(is_soft_unit(&ctx.direction));

        let Some(range) = ctx.secondaries.reserve(1) else {
            return Interaction::failed();
        };

        let k = ctx.energy / ELECTRON_MASS;
        let eps0 = 1.0 / (1.0 + 2.0 * k);
        let eps0_sq = eps0 * eps0;
        let alpha1 = -eps0.ln();
        let alpha2 = 0.5 * (1.0 - eps0_sq);

        let mut iterations = 0u32;
        let (eps, one_minus_cos) = loop {
            iterations += 1;
            debug_assert!(
                iterations <= MAX_REJECTION_ITERATIONS,
                "klein-nishina rejection loop exceeded {MAX_REJECTION_ITERATIONS} iterations"
            );

            // Branch between the 1/eps and flat-in-eps^2 envelope pieces.
            // eps stays strictly below one so the recoil momentum never
            // degenerates to a zero vector.
            let eps = if alpha1 > (alpha1 + alpha2) * rng.random::<f64>() {
                (-alpha1 * rng.random::<f64>()).exp()
            } else {
                (eps0_sq + (1.0 - eps0_sq) * rng.random::<f64>()).sqrt()
            }
            .min(1.0 - f64::EPSILON);

            let one_minus_cos = (1.0 - eps) / (k * eps);
            let sin_sq = one_minus_cos * (2.0 - one_minus_cos);
            let reject = 1.0 - eps * sin_sq / (1.0 + eps * eps);
            if reject >= rng.random::<f64>() {
                break (eps, one_minus_cos);
            }
        };

        // Roundoff at the backscatter edge can push 1 - t a hair past -1.
        let costheta = (1.0 - one_minus_cos).clamp(-1.0, 1.0);
        let phi = 2.0 * PI * rng.random::<f64>();
        let scattered_energy = eps * ctx.energy;
        let scattered_dir = rotate(&from_spherical(costheta, phi), &ctx.direction);

        // Recoil electron from conservation: photon momentum equals its
        // energy in these units.
        let electron_momentum = added(
            &scaled(&ctx.direction, ctx.energy),
            &scaled(&scattered_dir, -scattered_energy),
        );
        let electron = Secondary {
            particle_id: self.ids.electron,
            energy: ctx.energy - scattered_energy,
            direction: make_unit_vector(&electron_momentum),
        };
        ctx.secondaries.fill(range, 0, electron);

        Interaction::scattered(scattered_energy, scattered_dir, range)
    }
}
