//! Action dispatch and the core stepping loop.
//!
//! This crate wires the track state vector, the particle stacks, the
//! geometry navigator, and the physics models into the per-step state
//! machine: pre-step limit selection, along-step propagation, grouped
//! post-step dispatch, and the tracking cut. The single externally
//! callable operation is [`Stepper::transport`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod config;
pub mod metrics;
pub mod output;
pub mod stepper;

pub use action::{ActionKind, ActionRegistry, RegisteredAction, StepPhase};
pub use config::{ConfigError, StepperConfig};
pub use metrics::{StepMetrics, TransportMetrics};
pub use output::{NullCollector, StepCollector, StepRecord, VecCollector};
pub use stepper::{Primary, Stepper, TransportError, TransportResult};
