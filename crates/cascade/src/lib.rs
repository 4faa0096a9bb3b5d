//! Cascade: a Monte Carlo particle-transport engine core.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Cascade sub-crates. For most users, adding `cascade` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! Transport a muon through a homogeneous copper world with no discrete
//! physics registered — it free-streams until the step-count guard cuts
//! it:
//!
//! ```rust
//! use cascade::geo::{Homogeneous, VolumeDef};
//! use cascade::phys::{
//!     CutoffParams, ElementDef, EnergyLossTables, HighlandMsc, MaterialInput,
//!     MaterialParams, ParticleDef, ParticleParams,
//! };
//! use cascade::stepper::{NullCollector, Primary, Stepper, StepperConfig};
//! use cascade::types::{ElementId, EventId, MaterialId};
//!
//! let particles = ParticleParams::new(vec![ParticleDef {
//!     name: "mu-".into(),
//!     mass: 105.6583755,
//!     charge: -1.0,
//! }])
//! .unwrap();
//! let materials = MaterialParams::new(
//!     vec![ElementDef {
//!         symbol: "Cu".into(),
//!         atomic_number: 29,
//!         atomic_mass: 63.546,
//!     }],
//!     vec![MaterialInput {
//!         label: "Cu".into(),
//!         elements: [(ElementId(0), 1.0)].into_iter().collect(),
//!         number_density: 8.49e22,
//!         radiation_length: 1.436,
//!     }],
//! )
//! .unwrap();
//! let cutoffs = CutoffParams::new(&particles, vec![]).unwrap();
//!
//! let mu_minus = particles.find("mu-").unwrap();
//! let config = StepperConfig {
//!     navigator: Box::new(Homogeneous::new(VolumeDef {
//!         label: "world".into(),
//!         material: MaterialId(0),
//!         sensitive: false,
//!     })),
//!     particles,
//!     materials,
//!     cutoffs,
//!     models: vec![],
//!     eloss: EnergyLossTables::default(),
//!     msc: HighlandMsc::new(),
//!     capacity: 4,
//!     initializer_capacity: 16,
//!     secondary_capacity: 8,
//!     max_steps: 10,
//!     max_step_length: 1.0,
//!     seed: 42,
//! };
//! let mut stepper = Stepper::new(config).unwrap();
//!
//! let primary = Primary {
//!     particle_id: mu_minus,
//!     energy: 1000.0,
//!     position: [0.0, 0.0, 0.0],
//!     direction: [0.0, 0.0, 1.0],
//!     event_id: EventId(0),
//! };
//! let result = stepper.transport(&[primary], &mut NullCollector).unwrap();
//! assert_eq!(result.metrics.cut, 1);
//! assert_eq!(result.metrics.track_steps, 10);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cascade-core` | IDs, vector helpers, physical constants |
//! | [`grid`] | `cascade-grid` | Energy grids and cross-section calculators |
//! | [`track`] | `cascade-track` | Track state vector and particle stacks |
//! | [`geo`] | `cascade-geo` | Navigation interface and reference geometries |
//! | [`phys`] | `cascade-phys` | Parameter tables and interaction models |
//! | [`stepper`] | `cascade-stepper` | Action registry and the stepping loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and constants (`cascade-core`).
pub use cascade_core as types;

/// Energy grids and cross-section calculators (`cascade-grid`).
pub use cascade_grid as grid;

/// Track state vector and particle stacks (`cascade-track`).
pub use cascade_track as track;

/// Navigation interface and reference geometries (`cascade-geo`).
pub use cascade_geo as geo;

/// Parameter tables and interaction samplers (`cascade-phys`).
pub use cascade_phys as phys;

/// Action registry and the core stepping loop (`cascade-stepper`).
pub use cascade_stepper as stepper;
