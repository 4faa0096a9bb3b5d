//! Per-step stack of secondaries produced by interaction samplers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use cascade_core::{ParticleId, Real3};

/// A new particle created by an interaction.
///
/// Converted into a track initializer using the parent track's position,
/// time, and event before occupying a slot of its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Secondary {
    /// New particle type.
    pub particle_id: ParticleId,
    /// New kinetic energy [MeV]; must be positive to be valid.
    pub energy: f64,
    /// New direction (unit vector).
    pub direction: Real3,
}

/// A contiguous range of cells claimed from the [`SecondaryStack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecondaryRange {
    start: usize,
    len: usize,
}

impl SecondaryRange {
    /// An empty range.
    pub fn empty() -> Self {
        Self { start: 0, len: 0 }
    }

    /// Index of the first cell.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the range holds no cells.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over the absolute cell indices in this range.
    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Bounded lock-free stack that samplers allocate secondaries into.
///
/// Allocation bump-advances an atomic cursor; a reservation that would
/// exceed capacity returns `None` and writes nothing, leaving every earlier
/// entry intact. The cursor stays overshot after a failed reservation, so
/// all subsequent reservations in the same step also fail — exhaustion is
/// sticky until [`clear`](Self::clear), which runs once per step after the
/// stepper has drained the filled cells.
///
/// Cell writes go through `OnceLock` so that `fill` needs only `&self`:
/// holders of disjoint reservations never contend.
#[derive(Debug)]
pub struct SecondaryStack {
    cells: Vec<OnceLock<Secondary>>,
    cursor: AtomicUsize,
    committed: AtomicUsize,
}

impl SecondaryStack {
    /// Create a stack with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: (0..capacity).map(|_| OnceLock::new()).collect(),
            cursor: AtomicUsize::new(0),
            committed: AtomicUsize::new(0),
        }
    }

    /// Total capacity in secondaries.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Number of successfully reserved cells.
    pub fn len(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    /// Whether no cells have been reserved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserve `count` contiguous cells.
    ///
    /// Returns `None` when the remaining capacity is insufficient; the
    /// caller must surface this as a failed interaction, never drop it.
    pub fn reserve(&self, count: usize) -> Option<SecondaryRange> {
        let start = self.cursor.fetch_add(count, Ordering::AcqRel);
        let end = start.checked_add(count)?;
        if end > self.cells.len() {
            return None;
        }
        self.committed.fetch_max(end, Ordering::AcqRel);
        Some(SecondaryRange { start, len: count })
    }

    /// Store a secondary into slot `offset` of a reservation.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is outside the reservation or the cell was
    /// already filled — both are programming errors in the sampler.
    pub fn fill(&self, range: SecondaryRange, offset: usize, secondary: Secondary) {
        assert!(offset < range.len, "fill outside reservation");
        self.cells[range.start + offset]
            .set(secondary)
            .expect("secondary cell filled twice");
    }

    /// Read back a filled cell.
    pub fn get(&self, index: usize) -> Option<&Secondary> {
        self.cells.get(index)?.get()
    }

    /// Reset the stack for the next step.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.take();
        }
        self.cursor.store(0, Ordering::Release);
        self.committed.store(0, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sec(energy: f64) -> Secondary {
        Secondary {
            particle_id: ParticleId(0),
            energy,
            direction: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn reserve_and_fill_round_trip() {
        let stack = SecondaryStack::new(4);
        let r = stack.reserve(2).unwrap();
        stack.fill(r, 0, sec(1.0));
        stack.fill(r, 1, sec(2.0));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.get(r.start()).unwrap().energy, 1.0);
        assert_eq!(stack.get(r.start() + 1).unwrap().energy, 2.0);
    }

    #[test]
    fn exhaustion_returns_none_and_preserves_entries() {
        let stack = SecondaryStack::new(3);
        let a = stack.reserve(2).unwrap();
        stack.fill(a, 0, sec(1.0));
        stack.fill(a, 1, sec(2.0));

        // Only one cell left: a pair reservation must fail...
        assert!(stack.reserve(2).is_none());
        // ...and exhaustion is sticky for the rest of the step.
        assert!(stack.reserve(1).is_none());

        // Earlier entries are untouched.
        assert_eq!(stack.get(0).unwrap().energy, 1.0);
        assert_eq!(stack.get(1).unwrap().energy, 2.0);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn clear_restores_capacity() {
        let mut stack = SecondaryStack::new(2);
        assert!(stack.reserve(2).is_some());
        assert!(stack.reserve(1).is_none());
        stack.clear();
        assert!(stack.is_empty());
        let r = stack.reserve(2).unwrap();
        assert_eq!(r.start(), 0);
    }

    #[test]
    fn zero_reservation_is_free() {
        let stack = SecondaryStack::new(1);
        let r = stack.reserve(0).unwrap();
        assert!(r.is_empty());
        assert!(stack.reserve(1).is_some());
    }

    #[test]
    #[should_panic(expected = "outside reservation")]
    fn fill_outside_reservation_panics() {
        let stack = SecondaryStack::new(4);
        let r = stack.reserve(1).unwrap();
        stack.fill(r, 1, sec(1.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn capacity_is_never_exceeded(
                capacity in 1usize..32,
                requests in proptest::collection::vec(1usize..5, 1..20),
            ) {
                let stack = SecondaryStack::new(capacity);
                let mut granted = 0usize;
                for count in requests {
                    if let Some(r) = stack.reserve(count) {
                        prop_assert!(r.start() + r.len() <= capacity);
                        granted += count;
                    }
                }
                prop_assert!(granted <= capacity);
                prop_assert_eq!(stack.len(), granted);
            }
        }
    }
}
