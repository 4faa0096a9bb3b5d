//! Strongly-typed identifiers used across the transport engine.

use std::fmt;

/// Identifies a particle type within the particle parameter table.
///
/// Particle types are registered at setup and assigned sequential IDs.
/// `ParticleId(n)` corresponds to the n-th entry in the particle params.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParticleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a material within the material parameter table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MaterialId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an element within a material's composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a geometry volume reported by the navigator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u32);

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VolumeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a registered step action.
///
/// Actions are registered once at setup and assigned dense sequential IDs;
/// `ActionId(n)` is the n-th action in registration order. The registry
/// order defines execution order within a step phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActionId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Dense index of a lane in the track state vector.
///
/// Slot IDs are stable only within a single stepping iteration: a slot is
/// recycled as soon as its occupant becomes inactive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackSlotId(pub u32);

impl TrackSlotId {
    /// The slot index as a `usize` for container indexing.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TrackSlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrackSlotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies an event (one primary and all of its descendants share it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EventId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Unique identifier of a track within one transported batch.
///
/// Allocated from a monotonic counter as tracks are created, so parent
/// links (`parent_id`) remain meaningful after the parent's slot has been
/// recycled. Also the key from which a track's independent RNG stream is
/// derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TrackId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
