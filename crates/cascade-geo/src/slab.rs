//! Reference geometries: an infinite medium and a stack of z-slabs.

use std::error::Error;
use std::fmt;

use cascade_core::{Real3, VolumeId};

use crate::navigator::{Navigator, NextBoundary, VolumeDef};

/// Errors from reference-geometry construction.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoError {
    /// No volumes were given.
    NoVolumes,
    /// Slab boundaries are not strictly increasing.
    UnsortedBoundaries {
        /// Index of the first out-of-order boundary.
        index: usize,
    },
    /// Boundary count must be one more than volume count.
    SizeMismatch {
        /// Number of boundary planes.
        boundaries: usize,
        /// Number of volumes.
        volumes: usize,
    },
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVolumes => write!(f, "geometry has no volumes"),
            Self::UnsortedBoundaries { index } => {
                write!(f, "slab boundary {index} is not strictly increasing")
            }
            Self::SizeMismatch {
                boundaries,
                volumes,
            } => write!(
                f,
                "{boundaries} boundary planes cannot delimit {volumes} volumes"
            ),
        }
    }
}

impl Error for GeoError {}

/// A single volume filling all of space.
///
/// Tracks never cross a boundary or escape; every step is limited by
/// physics or the step limiter. The workhorse geometry for sampler tests.
#[derive(Clone, Debug)]
pub struct Homogeneous {
    volume: VolumeDef,
}

impl Homogeneous {
    /// Create from a single volume definition.
    pub fn new(volume: VolumeDef) -> Self {
        Self { volume }
    }
}

impl Navigator for Homogeneous {
    fn locate(&self, _position: &Real3) -> Option<VolumeId> {
        Some(VolumeId(0))
    }

    fn find_next_boundary(
        &self,
        _position: &Real3,
        _direction: &Real3,
        max_distance: f64,
    ) -> NextBoundary {
        NextBoundary::unbounded(max_distance)
    }

    fn volume(&self, id: VolumeId) -> &VolumeDef {
        assert_eq!(id, VolumeId(0), "homogeneous world has a single volume");
        &self.volume
    }

    fn num_volumes(&self) -> usize {
        1
    }
}

/// A stack of axis-aligned slabs along z, infinite in x and y.
///
/// `boundaries[i] <= z < boundaries[i+1]` is volume i; positions outside
/// the stack are outside the world. Rays parallel to the slabs never cross
/// a boundary.
#[derive(Clone, Debug)]
pub struct SlabStack {
    boundaries: Vec<f64>,
    volumes: Vec<VolumeDef>,
}

impl SlabStack {
    /// Build from boundary planes and the volumes between them.
    pub fn new(boundaries: Vec<f64>, volumes: Vec<VolumeDef>) -> Result<Self, GeoError> {
        if volumes.is_empty() {
            return Err(GeoError::NoVolumes);
        }
        if boundaries.len() != volumes.len() + 1 {
            return Err(GeoError::SizeMismatch {
                boundaries: boundaries.len(),
                volumes: volumes.len(),
            });
        }
        for (i, pair) in boundaries.windows(2).enumerate() {
            if !(pair[0] < pair[1]) {
                return Err(GeoError::UnsortedBoundaries { index: i + 1 });
            }
        }
        Ok(Self {
            boundaries,
            volumes,
        })
    }
}

impl Navigator for SlabStack {
    fn locate(&self, position: &Real3) -> Option<VolumeId> {
        let z = position[2];
        if z < self.boundaries[0] || z >= *self.boundaries.last().expect("nonempty") {
            return None;
        }
        // Upper bound over a short sorted list.
        let index = self.boundaries.partition_point(|&b| b <= z) - 1;
        Some(VolumeId(index as u32))
    }

    fn find_next_boundary(
        &self,
        position: &Real3,
        direction: &Real3,
        max_distance: f64,
    ) -> NextBoundary {
        let Some(VolumeId(current)) = self.locate(position) else {
            return NextBoundary::unbounded(max_distance);
        };
        let i = current as usize;
        let dz = direction[2];
        if dz == 0.0 {
            return NextBoundary::unbounded(max_distance);
        }

        let (plane, next) = if dz > 0.0 {
            let next = if i + 1 < self.volumes.len() {
                Some(VolumeId((i + 1) as u32))
            } else {
                None
            };
            (self.boundaries[i + 1], next)
        } else {
            let next = if i > 0 { Some(VolumeId((i - 1) as u32)) } else { None };
            (self.boundaries[i], next)
        };

        let distance = (plane - position[2]) / dz;
        debug_assert!(distance >= 0.0);
        if distance >= max_distance {
            NextBoundary::unbounded(max_distance)
        } else {
            NextBoundary {
                distance,
                crossed: true,
                next_volume: next,
            }
        }
    }

    fn volume(&self, id: VolumeId) -> &VolumeDef {
        &self.volumes[id.0 as usize]
    }

    fn num_volumes(&self) -> usize {
        self.volumes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::MaterialId;

    fn vol(label: &str) -> VolumeDef {
        VolumeDef {
            label: label.to_string(),
            material: MaterialId(0),
            sensitive: false,
        }
    }

    fn two_slabs() -> SlabStack {
        SlabStack::new(vec![0.0, 1.0, 3.0], vec![vol("a"), vol("b")]).unwrap()
    }

    #[test]
    fn locate_inside_and_outside() {
        let g = two_slabs();
        assert_eq!(g.locate(&[0.0, 0.0, 0.5]), Some(VolumeId(0)));
        assert_eq!(g.locate(&[5.0, -2.0, 2.0]), Some(VolumeId(1)));
        assert_eq!(g.locate(&[0.0, 0.0, -0.1]), None);
        assert_eq!(g.locate(&[0.0, 0.0, 3.0]), None);
        // Lower boundary is inclusive.
        assert_eq!(g.locate(&[0.0, 0.0, 0.0]), Some(VolumeId(0)));
        assert_eq!(g.locate(&[0.0, 0.0, 1.0]), Some(VolumeId(1)));
    }

    #[test]
    fn forward_ray_hits_internal_boundary() {
        let g = two_slabs();
        let b = g.find_next_boundary(&[0.0, 0.0, 0.25], &[0.0, 0.0, 1.0], 10.0);
        assert!(b.crossed);
        assert!((b.distance - 0.75).abs() < 1e-12);
        assert_eq!(b.next_volume, Some(VolumeId(1)));
    }

    #[test]
    fn forward_ray_exits_world() {
        let g = two_slabs();
        let b = g.find_next_boundary(&[0.0, 0.0, 2.0], &[0.0, 0.0, 1.0], 10.0);
        assert!(b.crossed);
        assert!((b.distance - 1.0).abs() < 1e-12);
        assert_eq!(b.next_volume, None);
    }

    #[test]
    fn backward_ray_finds_lower_plane() {
        let g = two_slabs();
        let b = g.find_next_boundary(&[0.0, 0.0, 2.0], &[0.0, 0.0, -1.0], 10.0);
        assert!(b.crossed);
        assert!((b.distance - 1.0).abs() < 1e-12);
        assert_eq!(b.next_volume, Some(VolumeId(0)));
    }

    #[test]
    fn oblique_ray_scales_distance() {
        let g = two_slabs();
        // 60 degrees from z: dz = 0.5, so path length doubles.
        let dir = [0.75f64.sqrt(), 0.0, 0.5];
        let b = g.find_next_boundary(&[0.0, 0.0, 0.5], &dir, 10.0);
        assert!(b.crossed);
        assert!((b.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_ray_never_crosses() {
        let g = two_slabs();
        let b = g.find_next_boundary(&[0.0, 0.0, 0.5], &[1.0, 0.0, 0.0], 10.0);
        assert!(!b.crossed);
        assert_eq!(b.distance, 10.0);
    }

    #[test]
    fn boundary_beyond_max_distance_is_not_crossed() {
        let g = two_slabs();
        let b = g.find_next_boundary(&[0.0, 0.0, 0.25], &[0.0, 0.0, 1.0], 0.5);
        assert!(!b.crossed);
        assert_eq!(b.distance, 0.5);
    }

    #[test]
    fn homogeneous_world_is_boundless() {
        let g = Homogeneous::new(vol("world"));
        assert_eq!(g.locate(&[1e9, -1e9, 0.0]), Some(VolumeId(0)));
        let b = g.find_next_boundary(&[0.0; 3], &[0.0, 0.0, 1.0], 1e6);
        assert!(!b.crossed);
        assert_eq!(g.num_volumes(), 1);
    }

    #[test]
    fn construction_rejects_bad_input() {
        assert!(matches!(
            SlabStack::new(vec![0.0, 1.0], vec![]),
            Err(GeoError::NoVolumes)
        ));
        assert!(matches!(
            SlabStack::new(vec![0.0, 1.0], vec![vol("a"), vol("b")]),
            Err(GeoError::SizeMismatch { .. })
        ));
        assert!(matches!(
            SlabStack::new(vec![0.0, 2.0, 1.0], vec![vol("a"), vol("b")]),
            Err(GeoError::UnsortedBoundaries { index: 2 })
        ));
    }
}
