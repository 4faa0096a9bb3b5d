//! Step records and the collector sink.
//!
//! After each step the stepper emits a record for every track whose step
//! began in a sensitive volume. Consumers (hit collectors, diagnostics)
//! receive them through an explicit [`StepCollector`] handle passed into
//! `transport` — there is no global or thread-local output state.

use cascade_core::{EventId, ParticleId, Real3, TrackId, VolumeId};

/// One track's step through a sensitive volume.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    /// Track that took the step.
    pub track_id: TrackId,
    /// Event the track belongs to.
    pub event_id: EventId,
    /// Particle type.
    pub particle_id: ParticleId,
    /// Volume the step started in.
    pub volume: VolumeId,
    /// Position at the start of the step [cm].
    pub pre_position: Real3,
    /// Position at the end of the step [cm].
    pub post_position: Real3,
    /// Kinetic energy at the start of the step [MeV].
    pub pre_energy: f64,
    /// Kinetic energy at the end of the step [MeV].
    pub post_energy: f64,
    /// Energy deposited locally during the step [MeV]: continuous loss
    /// plus any absorbed or cut remainder.
    pub energy_deposit: f64,
    /// Resolved step length [cm].
    pub step_length: f64,
    /// Global time at the end of the step [s].
    pub time: f64,
}

/// Consumer of step records.
pub trait StepCollector {
    /// Receive one step record.
    fn collect(&mut self, record: &StepRecord);
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollector;

impl StepCollector for NullCollector {
    fn collect(&mut self, _record: &StepRecord) {}
}

/// Buffers every record in memory.
#[derive(Debug, Default)]
pub struct VecCollector {
    records: Vec<StepRecord>,
}

impl VecCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records collected so far.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Consume the collector, returning its records.
    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }
}

impl StepCollector for VecCollector {
    fn collect(&mut self, record: &StepRecord) {
        self.records.push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StepRecord {
        StepRecord {
            track_id: TrackId(1),
            event_id: EventId(0),
            particle_id: ParticleId(2),
            volume: VolumeId(0),
            pre_position: [0.0; 3],
            post_position: [0.0, 0.0, 1.0],
            pre_energy: 10.0,
            post_energy: 8.0,
            energy_deposit: 2.0,
            step_length: 1.0,
            time: 1e-10,
        }
    }

    #[test]
    fn vec_collector_buffers_in_order() {
        let mut c = VecCollector::new();
        c.collect(&record());
        let mut second = record();
        second.track_id = TrackId(2);
        c.collect(&second);

        let records = c.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].track_id, TrackId(1));
        assert_eq!(records[1].track_id, TrackId(2));
    }

    #[test]
    fn null_collector_accepts_anything() {
        let mut c = NullCollector;
        c.collect(&record());
    }
}
