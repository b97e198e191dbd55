//! Generation-tagged one-shot timer queue
//!
//! The hazard chain and the elapsed-seconds counter are one-shot delayed
//! callbacks in the host model. Here each scheduled step is plain data
//! tagged with the session generation it belongs to: ending a session bumps
//! the generation, so an already-scheduled step that comes due afterwards
//! is a silent no-op even if it was never explicitly cancelled.

use serde::{Deserialize, Serialize};

use crate::sim::state::HazardId;

/// A scheduled piece of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Advance the displayed elapsed-seconds counter
    ElapsedSecond,
    /// Arm a new hazard and reschedule the chain
    HazardSpawn,
    /// A hazard's fuse ran out
    HazardFuse(HazardId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    fire_at_ms: f64,
    /// Insertion order; breaks deadline ties FIFO
    seq: u64,
    generation: u64,
    event: TimerEvent,
}

/// One-shot timers popped in strict deadline order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at_ms: f64, generation: u64, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            fire_at_ms,
            seq,
            generation,
            event,
        });
    }

    /// Earliest deadline among live-generation entries.
    pub fn peek_deadline(&self, current_gen: u64) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| e.generation == current_gen)
            .map(|e| e.fire_at_ms)
            .reduce(f64::min)
    }

    /// Pop the earliest entry due at `now_ms` (FIFO among equal deadlines).
    /// Stale-generation entries encountered on the way are dropped silently.
    pub fn pop_due(&mut self, now_ms: f64, current_gen: u64) -> Option<(f64, TimerEvent)> {
        loop {
            let idx = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.fire_at_ms <= now_ms)
                .min_by(|(_, a), (_, b)| {
                    a.fire_at_ms
                        .total_cmp(&b.fire_at_ms)
                        .then(a.seq.cmp(&b.seq))
                })
                .map(|(i, _)| i)?;

            let entry = self.entries.swap_remove(idx);
            if entry.generation == current_gen {
                return Some((entry.fire_at_ms, entry.event));
            }
            log::debug!(
                "Dropping stale timer {:?} (generation {} superseded by {})",
                entry.event,
                entry.generation,
                current_gen
            );
        }
    }

    /// Drop every pending entry (session end).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
