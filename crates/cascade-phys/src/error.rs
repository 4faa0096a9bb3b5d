//! Setup-time validation errors for parameter tables and models.

use std::error::Error;
use std::fmt;

use cascade_core::{ElementId, MaterialId, ParticleId};
use cascade_grid::GridError;

/// Errors detected while building parameter tables or models.
///
/// All of these indicate a configuration bug and are fatal before any
/// stepping begins; nothing here is recoverable at transport time.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamsError {
    /// A table was built with no entries.
    Empty {
        /// Which table.
        what: &'static str,
    },
    /// Two entries share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// A particle mass is negative, NaN, or infinite.
    InvalidMass {
        /// The offending particle name.
        name: String,
        /// The offending mass [MeV].
        mass: f64,
    },
    /// A material references an element that was never defined.
    UnknownElement {
        /// The missing element.
        element: ElementId,
        /// The referencing material.
        material: String,
    },
    /// Element fractions are negative or do not sum to one.
    InvalidComposition {
        /// The offending material.
        material: String,
        /// The fraction sum found.
        sum: f64,
    },
    /// A material's number density or radiation length is not positive.
    InvalidMaterial {
        /// The offending material.
        material: String,
        /// Description of the bad quantity.
        reason: &'static str,
    },
    /// A cutoff references an unregistered particle.
    UnknownParticle {
        /// The missing particle.
        particle: ParticleId,
    },
    /// A cutoff energy is negative or non-finite.
    InvalidCutoff {
        /// The offending particle.
        particle: ParticleId,
        /// The offending cutoff [MeV].
        cutoff: f64,
    },
    /// A model was given no cross-section table for any material.
    NoTables {
        /// The model's label.
        model: String,
    },
    /// A model references a material with no table entry at lookup time.
    UnknownMaterial {
        /// The missing material.
        material: MaterialId,
    },
    /// A cross-section grid failed validation.
    Grid(GridError),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { what } => write!(f, "{what} table is empty"),
            Self::DuplicateName { name } => write!(f, "duplicate name '{name}'"),
            Self::InvalidMass { name, mass } => {
                write!(f, "particle '{name}' has invalid mass {mass}")
            }
            Self::UnknownElement { element, material } => {
                write!(f, "material '{material}' references unknown element {element}")
            }
            Self::InvalidComposition { material, sum } => {
                write!(f, "material '{material}' fractions sum to {sum}, expected 1")
            }
            Self::InvalidMaterial { material, reason } => {
                write!(f, "material '{material}': {reason}")
            }
            Self::UnknownParticle { particle } => {
                write!(f, "cutoff references unknown particle {particle}")
            }
            Self::InvalidCutoff { particle, cutoff } => {
                write!(f, "particle {particle} has invalid cutoff {cutoff}")
            }
            Self::NoTables { model } => {
                write!(f, "model '{model}' has no cross-section tables")
            }
            Self::UnknownMaterial { material } => {
                write!(f, "no table entry for material {material}")
            }
            Self::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl Error for ParamsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ParamsError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
