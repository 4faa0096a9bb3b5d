//! Electron-positron pair production by muons.
//!
//! Kinematics follow the Geant4 muon pair-production model: the energy ε
//! transferred to the pair lies between `4 m_e` and
//! `ε_max = T + m_μ (1 − ¾ √e · Z^{1/3})`, the asymmetry between electron
//! and positron is uniform within a kinematically-limited band, and polar
//! angles follow the modified-Mephi distribution. The transfer spectrum is
//! sampled by direct inversion of a `1/ε` shape on that support — the
//! spectrum's leading behavior — rather than from an imported CDF table;
//! physics-data import is a collaborator concern.

use indexmap::IndexMap;
use rand::{Rng, RngCore};

use cascade_core::constants::{ELECTRON_MASS, EULER, PI};
use cascade_core::vec3::{added, from_spherical, is_soft_unit, make_unit_vector, rotate, scaled};
use cascade_core::{MaterialId, ParticleId};
use cascade_grid::{XsCalculator, XsGrid};
use cascade_track::{Secondary, SecondaryRange};

use crate::applicability::Applicability;
use crate::error::ParamsError;
use crate::interaction::Interaction;
use crate::model::{InteractionModel, SampleContext};
use crate::params::ParticleParams;

/// Particle IDs the model needs from the registry.
#[derive(Clone, Copy, Debug)]
pub struct MuPairIds {
    /// Negative muon (eligible incident particle).
    pub mu_minus: ParticleId,
    /// Positive muon (eligible incident particle).
    pub mu_plus: ParticleId,
    /// Produced electron.
    pub electron: ParticleId,
    /// Produced positron.
    pub positron: ParticleId,
}

/// Discrete model for `μ± → μ± e+ e−` in the field of a nucleus.
#[derive(Debug)]
pub struct MuPairProductionModel {
    ids: MuPairIds,
    muon_mass: f64,
    tables: IndexMap<MaterialId, XsGrid>,
    order: usize,
    energy_min: f64,
    energy_max: f64,
}

impl MuPairProductionModel {
    /// Construct from particle IDs, per-material macroscopic cross-section
    /// tables [1/cm], and the incident-energy validity range.
    pub fn new(
        ids: MuPairIds,
        particles: &ParticleParams,
        tables: Vec<(MaterialId, XsGrid)>,
        order: usize,
        energy_limits: (f64, f64),
    ) -> Result<Self, ParamsError> {
        for id in [ids.mu_minus, ids.mu_plus, ids.electron, ids.positron] {
            if !particles.contains(id) {
                return Err(ParamsError::UnknownParticle { particle: id });
            }
        }
        if tables.is_empty() {
            return Err(ParamsError::NoTables {
                model: "mu-pair-production".into(),
            });
        }
        let mut map = IndexMap::with_capacity(tables.len());
        for (material, grid) in tables {
            // Validate the order against each table up front so lookups
            // cannot fail mid-run.
            XsCalculator::new(&grid, order)?;
            map.insert(material, grid);
        }
        let muon_mass = particles.get(ids.mu_minus).mass;
        Ok(Self {
            ids,
            muon_mass,
            tables: map,
            order,
            energy_min: energy_limits.0,
            energy_max: energy_limits.1,
        })
    }

    /// Minimum energy transfer to the pair [MeV].
    pub fn min_pair_energy(&self) -> f64 {
        4.0 * ELECTRON_MASS
    }

    /// Maximum energy transfer to the pair [MeV] for an incident kinetic
    /// energy and target `Z^{1/3}`.
    pub fn max_pair_energy(&self, energy: f64, cbrt_z: f64) -> f64 {
        energy + self.muon_mass * (1.0 - 0.75 * EULER.sqrt() * cbrt_z)
    }
}

impl InteractionModel for MuPairProductionModel {
    fn label(&self) -> &str {
        "mu-pair-production"
    }

    fn applicability(&self) -> Vec<Applicability> {
        vec![
            Applicability {
                particle: self.ids.mu_minus,
                energy_min: self.energy_min,
                energy_max: self.energy_max,
            },
            Applicability {
                particle: self.ids.mu_plus,
                energy_min: self.energy_min,
                energy_max: self.energy_max,
            },
        ]
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
        debug_assert!(ctx.particle == self.ids.mu_minus || ctx.particle == self.ids.mu_plus);
        debug_assert!(is_soft_unit(&ctx.direction));
        debug_assert!((self.energy_min..=self.energy_max).contains(&ctx.energy));

        let total_energy = ctx.energy + self.muon_mass;

        // Pair-energy support for the sampled target element.
        let element = ctx
            .materials
            .get(ctx.material)
            .select_element(rng.random::<f64>());
        let max_pair = self.max_pair_energy(ctx.energy, element.cbrt_z());
        let min_pair = self.min_pair_energy();
        let min_energy = min_pair.max(ctx.cutoffs.energy(self.ids.positron, ctx.material));
        debug_assert!(max_pair > min_energy, "no pair phase space at this energy");
        if max_pair <= min_energy {
            // Below threshold: nothing to do. Applicability limits should
            // make this unreachable.
            return Interaction::scattered(ctx.energy, ctx.direction, SecondaryRange::empty());
        }

        let Some(range) = ctx.secondaries.reserve(2) else {
            return Interaction::failed();
        };

        // Invert the 1/eps spectrum on [min_energy, max_pair].
        let u: f64 = rng.random();
        let eps = min_energy * (max_pair / min_energy).powf(u);

        // Uniform asymmetry within the kinematic band.
        let r_max = (1.0
            - 6.0 * self.muon_mass * self.muon_mass / (total_energy * (total_energy - eps)))
            .max(0.0)
            * (1.0 - min_pair / eps).sqrt();
        let r = (2.0 * rng.random::<f64>() - 1.0) * r_max;

        let half_energy = 0.5 * eps;
        let electron_energy = (1.0 - r) * half_energy - ELECTRON_MASS;
        let positron_energy = (1.0 + r) * half_energy - ELECTRON_MASS;
        debug_assert!(electron_energy > 0.0 && positron_energy > 0.0);

        // Secondary directions: shared azimuth, back-to-back in phi,
        // polar angles from the modified-Mephi distribution.
        let pair_energy = electron_energy + positron_energy;
        let sample_costheta = PolarAngleSampler::new(ctx.energy, self.muon_mass, pair_energy);
        let phi = 2.0 * PI * rng.random::<f64>();

        let electron = Secondary {
            particle_id: self.ids.electron,
            energy: electron_energy,
            direction: rotate(
                &from_spherical(sample_costheta.sample(rng), phi),
                &ctx.direction,
            ),
        };
        let positron = Secondary {
            particle_id: self.ids.positron,
            energy: positron_energy,
            direction: rotate(
                &from_spherical(sample_costheta.sample(rng), phi + PI),
                &ctx.direction,
            ),
        };
        ctx.secondaries.fill(range, 0, electron);
        ctx.secondaries.fill(range, 1, positron);

        // Exiting muon: kinetic bookkeeping plus momentum balance.
        let momentum = |kinetic: f64, mass: f64| (kinetic * (kinetic + 2.0 * mass)).sqrt();
        let inc_momentum = momentum(ctx.energy, self.muon_mass);
        let mut balance = scaled(&ctx.direction, inc_momentum);
        for s in [&electron, &positron] {
            let p = momentum(s.energy, ELECTRON_MASS);
            balance = added(&balance, &scaled(&s.direction, -p));
        }

        Interaction::scattered(
            ctx.energy - pair_energy,
            make_unit_vector(&balance),
            range,
        )
    }
}

/// Polar-angle sampler for muon bremsstrahlung and pair production.
///
/// Samples `cos θ` with `θ = r m/E`, `r = √(a/(1−a))`,
/// `a ~ U(0, r²_max/(1+r²_max))`, and
/// `r_max = ½π γ min(1, γ m/ε − 1)` — the modified-Mephi shape.
#[derive(Clone, Copy, Debug)]
pub struct PolarAngleSampler {
    gamma: f64,
    a_max: f64,
}

impl PolarAngleSampler {
    /// Construct for an incident (kinetic energy, mass) and emitted energy.
    pub fn new(inc_energy: f64, inc_mass: f64, energy: f64) -> Self {
        let gamma = 1.0 + inc_energy / inc_mass;
        let r_max = 0.5 * PI * gamma * f64::min(1.0, gamma * inc_mass / energy - 1.0);
        let r_max_sq = r_max * r_max;
        Self {
            gamma,
            a_max: r_max_sq / (1.0 + r_max_sq),
        }
    }

    /// Largest polar angle this sampler can produce [rad].
    pub fn max_angle(&self) -> f64 {
        (self.a_max / (1.0 - self.a_max)).sqrt() / self.gamma
    }

    /// Sample the cosine of the polar angle.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let a = self.a_max * rng.random::<f64>();
        ((a / (1.0 - a)).sqrt() / self.gamma).cos()
    }
}
