//! The sampled outcome of a discrete interaction.

use cascade_core::Real3;
use cascade_track::SecondaryRange;

/// What happened to the incident particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    /// The primary survives with updated energy and direction.
    Scattered,
    /// The primary was absorbed; its state fields are meaningless.
    Absorbed,
    /// Secondary allocation was exhausted; nothing was applied. The track
    /// stays alive and the sampler runs again next step.
    Failed,
}

/// Result of applying a discrete interaction model to one track.
///
/// Secondaries live in the step's secondary stack; `secondaries` is the
/// range this interaction claimed there. A `Failed` result claims nothing
/// and must be surfaced by the stepper, never dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interaction {
    /// Outcome tag.
    pub kind: InteractionKind,
    /// Exiting kinetic energy of the primary [MeV] (`Scattered` only).
    pub energy: f64,
    /// Exiting direction of the primary (`Scattered` only).
    pub direction: Real3,
    /// Range of cells claimed in the secondary stack.
    pub secondaries: SecondaryRange,
}

impl Interaction {
    /// A scattered primary with secondaries.
    pub fn scattered(energy: f64, direction: Real3, secondaries: SecondaryRange) -> Self {
        Self {
            kind: InteractionKind::Scattered,
            energy,
            direction,
            secondaries,
        }
    }

    /// The primary was absorbed.
    pub fn absorbed(secondaries: SecondaryRange) -> Self {
        Self {
            kind: InteractionKind::Absorbed,
            energy: 0.0,
            direction: [0.0, 0.0, 1.0],
            secondaries,
        }
    }

    /// Secondary allocation failed; retry next step.
    pub fn failed() -> Self {
        Self {
            kind: InteractionKind::Failed,
            energy: 0.0,
            direction: [0.0, 0.0, 1.0],
            secondaries: SecondaryRange::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_tag_correctly() {
        let s = Interaction::scattered(5.0, [0.0, 0.0, 1.0], SecondaryRange::empty());
        assert_eq!(s.kind, InteractionKind::Scattered);
        assert_eq!(s.energy, 5.0);

        let a = Interaction::absorbed(SecondaryRange::empty());
        assert_eq!(a.kind, InteractionKind::Absorbed);

        let f = Interaction::failed();
        assert_eq!(f.kind, InteractionKind::Failed);
        assert!(f.secondaries.is_empty());
    }
}
