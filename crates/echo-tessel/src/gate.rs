// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Admission gate: a blocking counting semaphore.
//!
//! `acquire` blocks while `capacity` permits are outstanding. Dropping a
//! [`Permit`] releases it and wakes one waiter. Release happens in `Drop`,
//! so a panicking action still returns its slot while unwinding.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct GateState {
    in_flight: usize,
    peak: usize,
}

/// Counting semaphore bounding how many actions run at once.
#[derive(Debug)]
pub struct AdmissionGate {
    state: Mutex<GateState>,
    released: Condvar,
    capacity: usize,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `capacity` holders.
    ///
    /// A zero-capacity gate would block forever; it is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            released: Condvar::new(),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of simultaneous holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Highest number of permits ever held at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.lock().peak
    }

    /// Blocks until a slot is free, then takes it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut state = self.lock();
        while state.in_flight >= self.capacity {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.admit(&mut state);
        Permit { gate: self }
    }

    /// Takes a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut state = self.lock();
        if state.in_flight >= self.capacity {
            return None;
        }
        self.admit(&mut state);
        Some(Permit { gate: self })
    }

    fn admit(&self, state: &mut GateState) {
        state.in_flight += 1;
        state.peak = state.peak.max(state.in_flight);
        debug_assert!(state.in_flight <= self.capacity);
    }

    fn release(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);
        self.released.notify_one();
    }

    // Poisoning only means some holder panicked; the counters stay valid
    // because every mutation completes before the guard is dropped.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One admitted slot. Released on drop.
#[derive(Debug)]
#[must_use = "dropping a permit releases its slot immediately"]
pub struct Permit<'g> {
    gate: &'g AdmissionGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
