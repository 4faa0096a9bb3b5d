//! The navigation interface consumed by the stepper.

use cascade_core::{MaterialId, Real3, VolumeId};

/// Static description of one geometry volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeDef {
    /// Human-readable name for records and diagnostics.
    pub label: String,
    /// Material filling the volume.
    pub material: MaterialId,
    /// Whether steps ending in this volume produce step records.
    pub sensitive: bool,
}

/// Result of a boundary query along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NextBoundary {
    /// Distance to the boundary, or the queried maximum if none is hit.
    pub distance: f64,
    /// Whether a boundary lies within the queried maximum distance.
    pub crossed: bool,
    /// Volume on the far side of the boundary; `None` means the ray exits
    /// the world. Only meaningful when `crossed` is true.
    pub next_volume: Option<VolumeId>,
}

impl NextBoundary {
    /// A query that ran out of `max_distance` before hitting anything.
    pub fn unbounded(max_distance: f64) -> Self {
        Self {
            distance: max_distance,
            crossed: false,
            next_volume: None,
        }
    }
}

/// Geometry navigation as the stepper sees it.
///
/// Implementations must be pure: identical queries return identical
/// answers, and nothing is mutated by navigation (per-track navigation
/// state, if any, belongs to the caller).
pub trait Navigator: Send + Sync {
    /// The volume containing `position`, or `None` outside the world.
    fn locate(&self, position: &Real3) -> Option<VolumeId>;

    /// Distance from `position` along unit `direction` to the next volume
    /// boundary, capped at `max_distance`.
    fn find_next_boundary(
        &self,
        position: &Real3,
        direction: &Real3,
        max_distance: f64,
    ) -> NextBoundary;

    /// Static description of a volume.
    fn volume(&self, id: VolumeId) -> &VolumeDef;

    /// Number of volumes in the world.
    fn num_volumes(&self) -> usize;
}
