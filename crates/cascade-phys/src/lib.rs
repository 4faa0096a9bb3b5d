//! Physics parameter tables and interaction samplers.
//!
//! Everything the discrete-physics side of transport needs: immutable
//! particle/material/cutoff tables built once at setup, the
//! [`InteractionModel`] capability that every discrete process implements,
//! the [`Interaction`] result type, and the concrete models shipped with
//! the engine (muon pair production, Compton scattering), plus the
//! continuous-slowing-down tables and multiple-scattering sampler used by
//! the along-step phase.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod applicability;
pub mod compton;
pub mod eloss;
pub mod error;
pub mod interaction;
pub mod model;
pub mod mu_pair;
pub mod params;

pub use applicability::Applicability;
pub use compton::KleinNishinaModel;
pub use eloss::{EnergyLossTables, HighlandMsc};
pub use error::ParamsError;
pub use interaction::{Interaction, InteractionKind};
pub use model::{InteractionModel, SampleContext};
pub use mu_pair::MuPairProductionModel;
pub use params::{
    CutoffParams, ElementDef, ElementView, MaterialInput, MaterialParams, MaterialView,
    ParticleDef, ParticleParams,
};
