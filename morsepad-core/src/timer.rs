//! Named one-shot timers
//!
//! A timer is identified by a key. Arming a key that is already pending
//! replaces it, so no stale timer can fire after a re-arm. Timers do not run
//! by themselves: the owner asks for expired keys with [`Scheduler::pop_expired`]
//! and dispatches them, which keeps every keyer drivable from a virtual clock.

use heapless::Vec;
use crate::hal::{duration_from_ms, Duration, Instant};
use crate::timing::{char_gap_delay, word_gap_delay, Timings};

/// Timers used by the keyers
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerTimer {
    /// Squeeze look-ahead, shortly before an element ends
    IambicCheck,
    /// End of an element plus its inter-element gap
    ElementEnd,
    /// Silence long enough to commit the pending character
    CharGap,
    /// Silence long enough to start a new word
    WordGap,
}

impl KeyerTimer {
    /// Number of distinct keyer timers
    pub const COUNT: usize = 4;
}

/// Scheduling interface the keyers are driven through
pub trait Scheduler<K> {
    /// Arm `key` to expire `delay` after `now`, replacing any pending timer with that key
    fn schedule(&mut self, key: K, now: Instant, delay: Duration);

    /// Cancel `key`; no-op if it is not pending
    fn cancel(&mut self, key: K);

    /// Cancel every pending timer
    fn cancel_all(&mut self);

    /// Is `key` pending
    fn is_scheduled(&self, key: K) -> bool;

    /// Number of pending timers
    fn pending(&self) -> usize;

    /// Earliest pending deadline
    fn next_deadline(&self) -> Option<Instant>;

    /// Remove and return the earliest timer due at or before `now`, with its deadline
    fn pop_expired(&mut self, now: Instant) -> Option<(K, Instant)>;
}

/// Arm the character and word commit timers after the last element at `now`.
///
/// Both are cancelled as soon as a new element starts.
pub fn arm_commit_timers<S>(timers: &mut S, now: Instant, timings: &Timings)
where
    S: Scheduler<KeyerTimer> + ?Sized,
{
    timers.schedule(KeyerTimer::CharGap, now, duration_from_ms(char_gap_delay(timings)));
    timers.schedule(KeyerTimer::WordGap, now, duration_from_ms(word_gap_delay(timings)));
}

#[derive(Copy, Clone, Debug)]
struct Slot<K> {
    key: K,
    deadline: Instant,
    seq: u32,
}

/// Fixed-capacity timer table.
///
/// `N` must be at least the number of distinct keys in use. Timers with equal
/// deadlines expire in the order they were armed.
#[derive(Debug)]
pub struct TimerManager<K, const N: usize = { KeyerTimer::COUNT }> {
    slots: Vec<Slot<K>, N>,
    next_seq: u32,
}

impl<K, const N: usize> TimerManager<K, N>
where
    K: Copy + PartialEq,
{
    /// Create an empty timer table
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_seq: 0,
        }
    }

    /// Cancel any timer named `key`, then arm a new one
    pub fn set(&mut self, key: K, now: Instant, delay: Duration) {
        self.clear(key);
        let slot = Slot {
            key,
            deadline: now + delay,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        if self.slots.push(slot).is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("timer table full, dropping timer");
            debug_assert!(false, "timer table capacity exceeded");
        }
    }

    /// Cancel and forget `key`
    pub fn clear(&mut self, key: K) {
        self.slots.retain(|slot| slot.key != key);
    }

    /// Cancel every pending timer
    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    pub fn has(&self, key: K) -> bool {
        self.slots.iter().any(|slot| slot.key == key)
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Deadline of `key`, if pending
    pub fn deadline(&self, key: K) -> Option<Instant> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| slot.deadline)
    }

    fn earliest(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .min_by_key(|(_, slot)| (slot.deadline, slot.seq))
            .map(|(index, _)| index)
    }
}

impl<K, const N: usize> Default for TimerManager<K, N>
where
    K: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, const N: usize> Scheduler<K> for TimerManager<K, N>
where
    K: Copy + PartialEq,
{
    fn schedule(&mut self, key: K, now: Instant, delay: Duration) {
        self.set(key, now, delay);
    }

    fn cancel(&mut self, key: K) {
        self.clear(key);
    }

    fn cancel_all(&mut self) {
        self.clear_all();
    }

    fn is_scheduled(&self, key: K) -> bool {
        self.has(key)
    }

    fn pending(&self) -> usize {
        self.count()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.earliest().map(|index| self.slots[index].deadline)
    }

    fn pop_expired(&mut self, now: Instant) -> Option<(K, Instant)> {
        let index = self.earliest()?;
        if self.slots[index].deadline > now {
            return None;
        }
        let slot = self.slots.remove(index);
        Some((slot.key, slot.deadline))
    }
}
