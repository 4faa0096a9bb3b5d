//! The interaction-sampler capability.

use rand::RngCore;

use cascade_core::{MaterialId, ParticleId, Real3};
use cascade_track::SecondaryStack;

use crate::applicability::Applicability;
use crate::interaction::Interaction;
use crate::params::{CutoffParams, MaterialParams};

/// Everything a sampler may read while sampling one interaction.
///
/// Borrowed views only: the sampler's sole side effect is allocation into
/// the secondary stack.
pub struct SampleContext<'a> {
    /// Incident kinetic energy [MeV].
    pub energy: f64,
    /// Incident direction (unit vector).
    pub direction: Real3,
    /// Incident particle type.
    pub particle: ParticleId,
    /// Material at the interaction point.
    pub material: MaterialId,
    /// Material table.
    pub materials: &'a MaterialParams,
    /// Production cutoffs.
    pub cutoffs: &'a CutoffParams,
    /// Bounded allocator for new particles.
    pub secondaries: &'a SecondaryStack,
}

/// A discrete physics process as the dispatcher sees it.
///
/// # Contract
///
/// - Registered once at setup; immutable during transport (`&self`).
/// - `sample()` preconditions: the track satisfies
///   [`applicability()`](Self::applicability) and the context direction is
///   a unit vector. Violations are setup bugs checked by debug assertions.
/// - The only recoverable failure inside `sample()` is secondary-stack
///   exhaustion, reported as [`Interaction::failed()`].
/// - Energy must be conserved between incident and products within the
///   model's documented approximation; produced directions are unit
///   vectors. Rejection loops must have bounded expected iteration counts.
///
/// # Object safety
///
/// The registry stores models as `Box<dyn InteractionModel>`; the RNG is
/// taken as `&mut dyn RngCore` to keep the trait object-safe.
pub trait InteractionModel: Send + Sync {
    /// Stable name for diagnostics and registry labels.
    fn label(&self) -> &str;

    /// Which tracks this model may act on.
    ///
    /// One entry per eligible particle type; called at setup, not in the
    /// per-step hot path (the dispatcher caches the result).
    fn applicability(&self) -> Vec<Applicability>;

    /// Macroscopic cross section [1/cm] in a material at an energy.
    ///
    /// Zero for materials the model has no table for; the pre-step
    /// distance sampling treats zero as "cannot happen here".
    fn macroscopic_xs(&self, material: MaterialId, energy: f64) -> f64;

    /// Sample one interaction.
    fn sample(&self, ctx: &SampleContext<'_>, rng: &mut dyn RngCore) -> Interaction;
}
