//! Physical constants in the engine's native unit system.
//!
//! Native units: energies and masses in MeV, lengths in cm, times in s.
//! Values follow CODATA 2018 / PDG 2022.

/// Electron rest mass [MeV].
pub const ELECTRON_MASS: f64 = 0.510998950;

/// Muon rest mass [MeV].
pub const MUON_MASS: f64 = 105.6583755;

/// Speed of light [cm/s].
pub const C_LIGHT: f64 = 2.99792458e10;

/// Euler's number e.
pub const EULER: f64 = std::f64::consts::E;

/// Pi.
pub const PI: f64 = std::f64::consts::PI;
