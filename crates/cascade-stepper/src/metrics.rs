//! Per-iteration and per-batch transport metrics.
//!
//! [`StepMetrics`] captures one stepping iteration; [`TransportMetrics`]
//! accumulates a whole batch. Filling them is the one deliberately serial
//! reduction in the loop — everything else is per-slot independent.

/// Timing and occupancy metrics for a single stepping iteration.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the whole iteration.
    pub total_us: u64,
    /// Time draining the initializer stack into empty slots.
    pub initialize_us: u64,
    /// Time computing step limits and selecting actions.
    pub pre_step_us: u64,
    /// Per-action execution times in registry order: `(label, us)`.
    pub action_us: Vec<(String, u64)>,
    /// Slots alive or initializing at the start of the iteration.
    pub active_tracks: u32,
    /// Per-track steps taken this iteration.
    pub track_steps: u32,
    /// Tracks pulled from the initializer stack this iteration.
    pub tracks_initialized: u32,
    /// Secondaries queued as initializers this iteration.
    pub secondaries_created: u32,
    /// Interactions that failed on allocation exhaustion this iteration.
    pub failed_interactions: u32,
}

/// Batch-level accumulation over all iterations of one `transport` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransportMetrics {
    /// Stepping iterations executed.
    pub iterations: u64,
    /// Total per-track steps taken.
    pub track_steps: u64,
    /// Primaries accepted into the batch.
    pub primaries: u64,
    /// Tracks created (primaries plus promoted secondaries).
    pub tracks_created: u64,
    /// Secondaries promoted to track slots.
    pub secondaries_created: u64,
    /// Interactions that failed on allocation exhaustion and were retried.
    pub failed_interactions: u64,
    /// Tracks killed by absorption.
    pub absorbed: u64,
    /// Tracks killed by the tracking cut (energy, step count, or error).
    pub cut: u64,
    /// Tracks that ended in the errored state before being cut.
    pub errored: u64,
    /// Tracks that left the world.
    pub escaped: u64,
    /// Energy deposited in the geometry [MeV].
    pub energy_deposited: f64,
    /// Energy carried out of the world by escaping tracks [MeV].
    pub energy_escaped: f64,
}
