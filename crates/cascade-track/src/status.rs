//! Per-slot lifecycle status.

use std::fmt;

/// Lifecycle state of one track slot.
///
/// Transitions per stepping iteration:
/// `Inactive → Initializing → Alive ⇄ Alive → Killed | Errored → Inactive`.
/// Only `Alive` and `Initializing` slots are eligible for dispatch; `Killed`
/// slots are recycled to `Inactive` at the start of the next iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TrackStatus {
    /// Empty slot available for a pending track.
    #[default]
    Inactive,
    /// Freshly filled from the initializer stack; becomes alive in pre-step.
    Initializing,
    /// In flight and participating in the current step.
    Alive,
    /// Terminated this step (absorbed, cut, or escaped); recycled next step.
    Killed,
    /// Hit an unrecoverable per-track condition; killed by the tracking cut.
    Errored,
}

impl TrackStatus {
    /// Whether the slot occupies a live track (alive or initializing).
    pub fn is_occupied(self) -> bool {
        matches!(self, Self::Initializing | Self::Alive)
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inactive => "inactive",
            Self::Initializing => "initializing",
            Self::Alive => "alive",
            Self::Killed => "killed",
            Self::Errored => "errored",
        };
        write!(f, "{s}")
    }
}
