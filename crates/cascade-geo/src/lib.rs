//! Geometry navigation for the transport loop.
//!
//! Navigation internals (ray-volume intersection, acceleration structures)
//! are an external collaborator: the stepper consumes them through the
//! [`Navigator`] trait, which answers exactly three questions — where am I,
//! how far to the next boundary, and what is on the far side. Two simple
//! reference geometries ([`Homogeneous`] and [`SlabStack`]) make the engine
//! testable without a real navigator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod navigator;
pub mod slab;

pub use navigator::{Navigator, NextBoundary, VolumeDef};
pub use slab::{GeoError, Homogeneous, SlabStack};
