//! Fixed-capacity structure-of-arrays track state.

use rand_chacha::ChaCha8Rng;

use cascade_core::{ActionId, EventId, ParticleId, Real3, TrackId, TrackSlotId, VolumeId};

use crate::init::TrackInitializer;
use crate::status::TrackStatus;

/// Structure-of-arrays storage for all concurrently-live tracks.
///
/// One array per field, one lane per slot, allocated once at construction
/// and never resized. Fields touched by different step phases live in
/// separate arrays, so lanes processed by different actions in the same
/// phase never share a cache line through unrelated state.
///
/// Slot IDs index every array; a slot's contents are meaningful only while
/// its status is not [`TrackStatus::Inactive`].
#[derive(Debug)]
pub struct TrackStateVec {
    status: Vec<TrackStatus>,
    particle: Vec<ParticleId>,
    energy: Vec<f64>,
    position: Vec<Real3>,
    direction: Vec<Real3>,
    time: Vec<f64>,
    step_length: Vec<f64>,
    post_step_action: Vec<Option<ActionId>>,
    num_steps: Vec<u32>,
    track_id: Vec<TrackId>,
    parent_id: Vec<Option<TrackId>>,
    event_id: Vec<EventId>,
    volume: Vec<Option<VolumeId>>,
    rng: Vec<ChaCha8Rng>,
}

impl TrackStateVec {
    /// Allocate storage for `capacity` slots, all inactive.
    pub fn new(capacity: usize) -> Self {
        use rand::SeedableRng;
        Self {
            status: vec![TrackStatus::Inactive; capacity],
            particle: vec![ParticleId(0); capacity],
            energy: vec![0.0; capacity],
            position: vec![[0.0; 3]; capacity],
            direction: vec![[0.0, 0.0, 1.0]; capacity],
            time: vec![0.0; capacity],
            step_length: vec![0.0; capacity],
            post_step_action: vec![None; capacity],
            num_steps: vec![0; capacity],
            track_id: vec![TrackId(0); capacity],
            parent_id: vec![None; capacity],
            event_id: vec![EventId(0); capacity],
            volume: vec![None; capacity],
            rng: (0..capacity)
                .map(|_| ChaCha8Rng::seed_from_u64(0))
                .collect(),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.status.len()
    }

    /// All slot statuses, indexed by slot id.
    pub fn statuses(&self) -> &[TrackStatus] {
        &self.status
    }

    /// Number of slots currently alive or initializing.
    pub fn occupied(&self) -> usize {
        self.status.iter().filter(|s| s.is_occupied()).count()
    }

    /// Slot ids whose status is inactive.
    pub fn inactive_slots(&self) -> Vec<TrackSlotId> {
        self.status
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == TrackStatus::Inactive)
            .map(|(i, _)| TrackSlotId(i as u32))
            .collect()
    }

    /// Occupy a slot with a pending track.
    ///
    /// Sets every per-track field from the initializer, installs the
    /// track's RNG stream, and marks the slot `Initializing`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is not inactive — overwriting a live track is a
    /// dispatch bug.
    pub fn occupy(
        &mut self,
        slot: TrackSlotId,
        init: &TrackInitializer,
        track_id: TrackId,
        rng: ChaCha8Rng,
        volume: Option<VolumeId>,
    ) {
        let i = slot.get();
        assert_eq!(
            self.status[i],
            TrackStatus::Inactive,
            "occupying a non-inactive slot"
        );
        self.status[i] = TrackStatus::Initializing;
        self.particle[i] = init.particle_id;
        self.energy[i] = init.energy;
        self.position[i] = init.position;
        self.direction[i] = init.direction;
        self.time[i] = init.time;
        self.step_length[i] = 0.0;
        self.post_step_action[i] = None;
        self.num_steps[i] = 0;
        self.track_id[i] = track_id;
        self.parent_id[i] = init.parent_id;
        self.event_id[i] = init.event_id;
        self.volume[i] = volume;
        self.rng[i] = rng;
    }

    /// Slot status.
    pub fn status(&self, slot: TrackSlotId) -> TrackStatus {
        self.status[slot.get()]
    }

    /// Set slot status.
    pub fn set_status(&mut self, slot: TrackSlotId, status: TrackStatus) {
        self.status[slot.get()] = status;
    }

    /// Particle type.
    pub fn particle(&self, slot: TrackSlotId) -> ParticleId {
        self.particle[slot.get()]
    }

    /// Kinetic energy [MeV].
    pub fn energy(&self, slot: TrackSlotId) -> f64 {
        self.energy[slot.get()]
    }

    /// Set kinetic energy [MeV].
    pub fn set_energy(&mut self, slot: TrackSlotId, energy: f64) {
        self.energy[slot.get()] = energy;
    }

    /// Position [cm].
    pub fn position(&self, slot: TrackSlotId) -> Real3 {
        self.position[slot.get()]
    }

    /// Set position [cm].
    pub fn set_position(&mut self, slot: TrackSlotId, position: Real3) {
        self.position[slot.get()] = position;
    }

    /// Direction (unit vector).
    pub fn direction(&self, slot: TrackSlotId) -> Real3 {
        self.direction[slot.get()]
    }

    /// Set direction (unit vector).
    pub fn set_direction(&mut self, slot: TrackSlotId, direction: Real3) {
        debug_assert!(cascade_core::vec3::is_soft_unit(&direction));
        self.direction[slot.get()] = direction;
    }

    /// Global time [s].
    pub fn time(&self, slot: TrackSlotId) -> f64 {
        self.time[slot.get()]
    }

    /// Advance global time [s].
    pub fn add_time(&mut self, slot: TrackSlotId, dt: f64) {
        self.time[slot.get()] += dt;
    }

    /// Resolved step length for the current step [cm].
    pub fn step_length(&self, slot: TrackSlotId) -> f64 {
        self.step_length[slot.get()]
    }

    /// Set the resolved step length [cm].
    pub fn set_step_length(&mut self, slot: TrackSlotId, length: f64) {
        self.step_length[slot.get()] = length;
    }

    /// Action selected in pre-step to run post-step.
    pub fn post_step_action(&self, slot: TrackSlotId) -> Option<ActionId> {
        self.post_step_action[slot.get()]
    }

    /// Record the action selected for post-step.
    pub fn set_post_step_action(&mut self, slot: TrackSlotId, action: Option<ActionId>) {
        self.post_step_action[slot.get()] = action;
    }

    /// Number of steps this track has taken.
    pub fn num_steps(&self, slot: TrackSlotId) -> u32 {
        self.num_steps[slot.get()]
    }

    /// Count one more step.
    pub fn increment_num_steps(&mut self, slot: TrackSlotId) {
        self.num_steps[slot.get()] += 1;
    }

    /// Unique track id of the occupant.
    pub fn track_id(&self, slot: TrackSlotId) -> TrackId {
        self.track_id[slot.get()]
    }

    /// Parent track id, if any.
    pub fn parent_id(&self, slot: TrackSlotId) -> Option<TrackId> {
        self.parent_id[slot.get()]
    }

    /// Event the occupant belongs to.
    pub fn event_id(&self, slot: TrackSlotId) -> EventId {
        self.event_id[slot.get()]
    }

    /// Current geometry volume, if located.
    pub fn volume(&self, slot: TrackSlotId) -> Option<VolumeId> {
        self.volume[slot.get()]
    }

    /// Set the current geometry volume.
    pub fn set_volume(&mut self, slot: TrackSlotId, volume: Option<VolumeId>) {
        self.volume[slot.get()] = volume;
    }

    /// The occupant's independent RNG stream.
    pub fn rng_mut(&mut self, slot: TrackSlotId) -> &mut ChaCha8Rng {
        &mut self.rng[slot.get()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn init(energy: f64) -> TrackInitializer {
        TrackInitializer {
            particle_id: ParticleId(1),
            energy,
            direction: [0.0, 0.0, 1.0],
            position: [1.0, 2.0, 3.0],
            time: 0.5,
            parent_id: Some(TrackId(7)),
            event_id: EventId(3),
        }
    }

    #[test]
    fn new_slots_are_inactive() {
        let v = TrackStateVec::new(8);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.occupied(), 0);
        assert_eq!(v.inactive_slots().len(), 8);
    }

    #[test]
    fn occupy_installs_all_fields() {
        let mut v = TrackStateVec::new(2);
        let slot = TrackSlotId(1);
        v.occupy(
            slot,
            &init(10.0),
            TrackId(42),
            ChaCha8Rng::seed_from_u64(9),
            Some(VolumeId(0)),
        );

        assert_eq!(v.status(slot), TrackStatus::Initializing);
        assert_eq!(v.particle(slot), ParticleId(1));
        assert_eq!(v.energy(slot), 10.0);
        assert_eq!(v.position(slot), [1.0, 2.0, 3.0]);
        assert_eq!(v.time(slot), 0.5);
        assert_eq!(v.track_id(slot), TrackId(42));
        assert_eq!(v.parent_id(slot), Some(TrackId(7)));
        assert_eq!(v.event_id(slot), EventId(3));
        assert_eq!(v.volume(slot), Some(VolumeId(0)));
        assert_eq!(v.num_steps(slot), 0);
        assert_eq!(v.post_step_action(slot), None);

        // The other slot is untouched.
        assert_eq!(v.status(TrackSlotId(0)), TrackStatus::Inactive);
        assert_eq!(v.occupied(), 1);
        assert_eq!(v.inactive_slots(), vec![TrackSlotId(0)]);
    }

    #[test]
    #[should_panic(expected = "non-inactive slot")]
    fn occupy_rejects_live_slot() {
        let mut v = TrackStateVec::new(1);
        let slot = TrackSlotId(0);
        let rng = ChaCha8Rng::seed_from_u64(0);
        v.occupy(slot, &init(1.0), TrackId(0), rng.clone(), None);
        v.occupy(slot, &init(2.0), TrackId(1), rng, None);
    }

    #[test]
    fn recycled_slot_can_be_reoccupied() {
        let mut v = TrackStateVec::new(1);
        let slot = TrackSlotId(0);
        let rng = ChaCha8Rng::seed_from_u64(0);
        v.occupy(slot, &init(1.0), TrackId(0), rng.clone(), None);
        v.set_status(slot, TrackStatus::Killed);
        v.set_status(slot, TrackStatus::Inactive);
        v.occupy(slot, &init(2.0), TrackId(1), rng, None);
        assert_eq!(v.energy(slot), 2.0);
        assert_eq!(v.track_id(slot), TrackId(1));
    }

    #[test]
    fn per_slot_rng_streams_are_independent() {
        use rand::Rng;
        let mut v = TrackStateVec::new(2);
        let a = TrackSlotId(0);
        let b = TrackSlotId(1);
        v.occupy(a, &init(1.0), TrackId(0), ChaCha8Rng::seed_from_u64(1), None);
        v.occupy(b, &init(1.0), TrackId(1), ChaCha8Rng::seed_from_u64(2), None);

        let xa: f64 = v.rng_mut(a).random();
        let xb: f64 = v.rng_mut(b).random();
        assert_ne!(xa, xb);
    }
}
