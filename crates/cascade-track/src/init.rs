//! Pending-track stack feeding empty slots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use cascade_core::{EventId, ParticleId, Real3, TrackId};

/// A pending track: everything needed to occupy a slot.
///
/// Primaries and secondaries are both converted to initializers before
/// transport; a secondary inherits its parent's position, time, and event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackInitializer {
    /// Particle type.
    pub particle_id: ParticleId,
    /// Kinetic energy [MeV].
    pub energy: f64,
    /// Direction (unit vector).
    pub direction: Real3,
    /// Position [cm].
    pub position: Real3,
    /// Global time [s].
    pub time: f64,
    /// Track that produced this one; `None` for primaries.
    pub parent_id: Option<TrackId>,
    /// Event this track belongs to.
    pub event_id: EventId,
}

/// Bounded LIFO stack of pending tracks.
///
/// Two phases alternate, never overlapping: a *push* phase during post-step
/// (atomic bump allocation, one cell per push) and a *drain* phase at the
/// start of the next iteration ([`begin_drain`](Self::begin_drain), then
/// compare-and-swap [`claim`](Self::claim)s from the top, then a serial
/// [`compact`](Self::compact)). Draining newest-first bounds the buffer:
/// deep interaction chains are finished before broad ones are widened.
///
/// Pushes that land during a drain (secondaries produced in the same
/// iteration) fall outside the drain snapshot and become claimable on the
/// next iteration.
#[derive(Debug)]
pub struct InitializerStack {
    cells: Vec<OnceLock<TrackInitializer>>,
    /// Raw push cursor; may overshoot capacity after rejected pushes.
    cursor: AtomicUsize,
    /// Top of the claimable region during a drain phase.
    remaining: AtomicUsize,
    /// Size of the drain snapshot; entries at or above it are new pushes.
    drain_base: AtomicUsize,
}

impl InitializerStack {
    /// Create a stack with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: (0..capacity).map(|_| OnceLock::new()).collect(),
            cursor: AtomicUsize::new(0),
            remaining: AtomicUsize::new(0),
            drain_base: AtomicUsize::new(0),
        }
    }

    /// Total capacity in pending tracks.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of stored pending tracks (valid between phases).
    pub fn len(&self) -> usize {
        self.cursor.load(Ordering::Acquire).min(self.cells.len())
    }

    /// Whether no tracks are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push a pending track, returning it back on overflow.
    ///
    /// Overflow never corrupts stored entries; the caller decides whether
    /// the rejection is a failed interaction (secondaries) or a deferred
    /// feed (primaries).
    pub fn push(&self, init: TrackInitializer) -> Result<(), TrackInitializer> {
        let index = self.cursor.fetch_add(1, Ordering::AcqRel);
        if index >= self.cells.len() {
            return Err(init);
        }
        self.cells[index]
            .set(init)
            .expect("initializer cell filled twice");
        Ok(())
    }

    /// Free cells left before pushes start overflowing.
    pub fn available(&self) -> usize {
        self.cells.len().saturating_sub(self.len())
    }

    /// Open the drain phase: snapshot the claimable region.
    pub fn begin_drain(&self) {
        let base = self.len();
        self.drain_base.store(base, Ordering::Release);
        self.remaining.store(base, Ordering::Release);
    }

    /// Claim the newest unclaimed pending track from the drain snapshot.
    ///
    /// CAS-pops the top of the claimable region; returns `None` once the
    /// region is exhausted. Only meaningful between `begin_drain` and
    /// `compact`.
    pub fn claim(&self) -> Option<TrackInitializer> {
        let mut top = self.remaining.load(Ordering::Acquire);
        loop {
            if top == 0 {
                return None;
            }
            match self.remaining.compare_exchange_weak(
                top,
                top - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return self.cells[top - 1].get().copied();
                }
                Err(actual) => top = actual,
            }
        }
    }

    /// Close the drain phase: drop claimed cells, shift mid-drain pushes
    /// down, and re-pack the cursor.
    pub fn compact(&mut self) {
        let keep = self.remaining.load(Ordering::Acquire);
        let base = self.drain_base.load(Ordering::Acquire);
        let filled = self.len();

        // Release the claimed region [keep, base).
        for cell in &mut self.cells[keep..base] {
            cell.take();
        }
        // Shift pushes that landed during the drain down onto it.
        let mut write = keep;
        for read in base..filled {
            let value = self.cells[read].take().expect("pushed cell is filled");
            self.cells[write]
                .set(value)
                .expect("compacted cell is empty");
            write += 1;
        }
        self.cursor.store(write, Ordering::Release);
        self.remaining.store(0, Ordering::Release);
        self.drain_base.store(0, Ordering::Release);
    }
}
