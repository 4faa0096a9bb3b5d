//! Stepper configuration and validation.

use std::error::Error;
use std::fmt;

use cascade_core::{MaterialId, ParticleId, VolumeId};
use cascade_geo::Navigator;
use cascade_phys::{
    CutoffParams, EnergyLossTables, HighlandMsc, InteractionModel, MaterialParams, ParticleParams,
};

/// Errors detected during [`StepperConfig::validate()`].
///
/// All fatal: a stepper is never constructed from an invalid
/// configuration, and nothing here can occur once stepping has begun.
#[derive(Debug)]
pub enum ConfigError {
    /// The track state vector must hold at least one slot.
    ZeroTrackCapacity,
    /// The initializer stack must hold at least one pending track.
    ZeroInitializerCapacity,
    /// The per-track step limit must be at least one.
    ZeroMaxSteps,
    /// The step-length limiter is NaN, infinite, zero, or negative.
    InvalidMaxStepLength {
        /// The invalid value.
        value: f64,
    },
    /// The navigator reports no volumes.
    EmptyWorld,
    /// A volume references a material missing from the material table.
    UnknownVolumeMaterial {
        /// The offending volume.
        volume: VolumeId,
        /// The missing material.
        material: MaterialId,
    },
    /// Two actions (or models) share a label.
    DuplicateAction {
        /// The repeated label.
        label: String,
    },
    /// A model's applicability references an unregistered particle.
    ModelParticleUnknown {
        /// The model's label.
        model: String,
        /// The missing particle.
        particle: ParticleId,
    },
    /// A model's applicability energy range is empty or not finite.
    InvalidModelEnergyRange {
        /// The model's label.
        model: String,
        /// Lower bound [MeV].
        min: f64,
        /// Upper bound [MeV].
        max: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTrackCapacity => write!(f, "track capacity is zero"),
            Self::ZeroInitializerCapacity => write!(f, "initializer capacity is zero"),
            Self::ZeroMaxSteps => write!(f, "max steps per track is zero"),
            Self::InvalidMaxStepLength { value } => {
                write!(f, "max step length must be finite and positive, got {value}")
            }
            Self::EmptyWorld => write!(f, "navigator has no volumes"),
            Self::UnknownVolumeMaterial { volume, material } => {
                write!(f, "volume {volume} references unknown material {material}")
            }
            Self::DuplicateAction { label } => write!(f, "duplicate action label '{label}'"),
            Self::ModelParticleUnknown { model, particle } => {
                write!(f, "model '{model}' references unknown particle {particle}")
            }
            Self::InvalidModelEnergyRange { model, min, max } => {
                write!(f, "model '{model}' has invalid energy range [{min}, {max}]")
            }
        }
    }
}

impl Error for ConfigError {}

/// Everything needed to build a [`Stepper`](crate::Stepper).
///
/// Owns its collaborators; `Stepper::new` consumes the config after
/// [`validate()`](Self::validate) passes. Parameter tables must already be
/// internally valid (their own constructors enforce that); validation here
/// checks cross-references between collaborators.
pub struct StepperConfig {
    /// Geometry navigation.
    pub navigator: Box<dyn Navigator>,
    /// Particle registry.
    pub particles: ParticleParams,
    /// Material registry.
    pub materials: MaterialParams,
    /// Tracking cutoffs.
    pub cutoffs: CutoffParams,
    /// Discrete interaction models, in registration order.
    pub models: Vec<Box<dyn InteractionModel>>,
    /// Restricted stopping-power tables for continuous loss.
    pub eloss: EnergyLossTables,
    /// Multiple-scattering sampler.
    pub msc: HighlandMsc,
    /// Number of concurrent track slots.
    pub capacity: usize,
    /// Capacity of the pending-track stack.
    pub initializer_capacity: usize,
    /// Capacity of the per-step secondary stack.
    pub secondary_capacity: usize,
    /// Kill tracks after this many steps (numerical-runaway guard).
    pub max_steps: u32,
    /// User step limiter [cm]; every step is at most this long.
    pub max_step_length: f64,
    /// Base seed from which per-track RNG streams derive.
    pub seed: u64,
}

impl StepperConfig {
    /// Check structural invariants across collaborators.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroTrackCapacity);
        }
        if self.initializer_capacity == 0 {
            return Err(ConfigError::ZeroInitializerCapacity);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if !(self.max_step_length.is_finite() && self.max_step_length > 0.0) {
            return Err(ConfigError::InvalidMaxStepLength {
                value: self.max_step_length,
            });
        }
        if self.navigator.num_volumes() == 0 {
            return Err(ConfigError::EmptyWorld);
        }
        for v in 0..self.navigator.num_volumes() {
            let volume = VolumeId(v as u32);
            let material = self.navigator.volume(volume).material;
            if !self.materials.contains(material) {
                return Err(ConfigError::UnknownVolumeMaterial { volume, material });
            }
        }
        for model in &self.models {
            for applicability in model.applicability() {
                if !self.particles.contains(applicability.particle) {
                    return Err(ConfigError::ModelParticleUnknown {
                        model: model.label().to_string(),
                        particle: applicability.particle,
                    });
                }
                let (min, max) = (applicability.energy_min, applicability.energy_max);
                if !(min.is_finite() && max.is_finite() && 0.0 <= min && min < max) {
                    return Err(ConfigError::InvalidModelEnergyRange {
                        model: model.label().to_string(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}
