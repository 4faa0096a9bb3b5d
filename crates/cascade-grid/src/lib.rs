//! Tabulated energy grids and cross-section calculators.
//!
//! Physics data reaches the transport core as immutable tables: values
//! tabulated on an energy axis uniform in log E. This crate provides the
//! grid type, construction-time validation, and the interpolating
//! calculator used for macroscopic cross sections and stopping powers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod uniform;
pub mod xs;

pub use error::GridError;
pub use uniform::UniformLogGrid;
pub use xs::{XsCalculator, XsGrid};
