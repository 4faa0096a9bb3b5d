//! Core types for the Cascade particle-transport engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! strongly-typed identifiers, the `Real3` vector helpers, and the physical
//! constants shared by every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod id;
pub mod vec3;

pub use id::{
    ActionId, ElementId, EventId, MaterialId, ParticleId, TrackId, TrackSlotId, VolumeId,
};
pub use vec3::Real3;
