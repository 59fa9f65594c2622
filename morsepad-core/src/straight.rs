//! Single-lever (straight / vertical) key
//!
//! The operator times every element by hand. On release the press duration is
//! classified as a dot or dash and appended to the sequence; silence after the
//! release commits the character and then the word.

use crate::buffer::{SequenceBuffer, BUFFER_CAPACITY, SEQUENCE_CAPACITY};
use crate::evaluator::{evaluate, SpacingRecord, TimingRecord};
use crate::hal::Instant;
use crate::observer::KeyerObserver;
use crate::timer::{arm_commit_timers, KeyerTimer, Scheduler, TimerManager};
use crate::timing::{classify_straight_element, Timings};
use crate::types::{Element, KeyerConfig, KeyerError};

/// Straight key state machine: idle, or pressed since an instant.
///
/// `SEQ` and `BUF` size the pending sequence and the committed buffer.
pub struct StraightKeyer<
    O = (),
    S = TimerManager<KeyerTimer>,
    const SEQ: usize = SEQUENCE_CAPACITY,
    const BUF: usize = BUFFER_CAPACITY,
> {
    config: KeyerConfig,
    timings: Timings,
    buffer: SequenceBuffer<SEQ, BUF>,
    timers: S,
    observer: O,
    pressed_at: Option<Instant>,
    released_at: Option<Instant>,
}

impl<O: KeyerObserver> StraightKeyer<O> {
    /// Create a keyer with the built-in timer table
    pub fn new(config: KeyerConfig, observer: O) -> Result<Self, KeyerError> {
        Self::with_scheduler(config, observer, TimerManager::new())
    }
}

impl<O: KeyerObserver, const SEQ: usize, const BUF: usize>
    StraightKeyer<O, TimerManager<KeyerTimer>, SEQ, BUF>
{
    /// Create a keyer with the built-in timer table and custom buffer sizes
    pub fn with_capacity(config: KeyerConfig, observer: O) -> Result<Self, KeyerError> {
        Self::with_scheduler(config, observer, TimerManager::new())
    }
}

impl<O, S, const SEQ: usize, const BUF: usize> StraightKeyer<O, S, SEQ, BUF>
where
    O: KeyerObserver,
    S: Scheduler<KeyerTimer>,
{
    /// Create a keyer driven through `timers`
    pub fn with_scheduler(config: KeyerConfig, observer: O, timers: S) -> Result<Self, KeyerError> {
        let timings = config.timings()?;
        Ok(Self {
            config,
            timings,
            buffer: SequenceBuffer::new(),
            timers,
            observer,
            pressed_at: None,
            released_at: None,
        })
    }

    /// Key closed. Ignored if already pressed.
    pub fn key_press(&mut self, now: Instant) {
        self.poll(now);
        if self.pressed_at.is_some() {
            return;
        }

        // A new element is starting; the pending character stays open
        self.timers.cancel_all();

        if let Some(released) = self.released_at {
            let gap_ms = now.saturating_duration_since(released).as_millis() as f64;
            let evaluation = evaluate(SpacingRecord::classify(gap_ms, &self.timings, now));
            self.observer.spacing_evaluated(&evaluation);
        }

        self.pressed_at = Some(now);
        self.observer.key_down();
    }

    /// Key opened. Ignored if not pressed.
    pub fn key_release(&mut self, now: Instant) {
        self.poll(now);
        let Some(pressed) = self.pressed_at.take() else {
            return;
        };

        let held = now.saturating_duration_since(pressed);
        let held_ms = held.as_millis() as f64;
        let element = classify_straight_element(held_ms, self.timings.dot);

        #[cfg(feature = "defmt")]
        defmt::debug!("straight key held {} ms -> {}", held.as_millis(), element);

        self.buffer.push_element(element, &mut self.observer);
        self.observer.key_up(held);
        let evaluation = evaluate(TimingRecord::new(element, held_ms, &self.timings, pressed));
        self.observer.element_evaluated(&evaluation);
        self.observer.sequence_updated(self.buffer.sequence());

        self.released_at = Some(now);
        arm_commit_timers(&mut self.timers, now, &self.timings);
    }

    /// Fire every timer due at or before `now`
    pub fn poll(&mut self, now: Instant) {
        while let Some((timer, _at)) = self.timers.pop_expired(now) {
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: KeyerTimer) {
        match timer {
            KeyerTimer::CharGap => {
                self.buffer.commit_character(&mut self.observer);
            }
            KeyerTimer::WordGap => self.buffer.commit_word(&mut self.observer),
            KeyerTimer::IambicCheck | KeyerTimer::ElementEnd => {}
        }
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Apply a new configuration; takes effect from the next element
    pub fn reconfigure(&mut self, config: KeyerConfig) -> Result<(), KeyerError> {
        self.timings = config.timings()?;
        self.config = config;
        Ok(())
    }

    /// Clear the sequence and buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.observer.sequence_updated(self.buffer.sequence());
        self.buffer.notify_buffer(&mut self.observer);
    }

    /// Cancel every pending timer and return to idle.
    ///
    /// No notification is delivered after this returns unless new input arrives.
    pub fn destroy(&mut self) {
        self.timers.cancel_all();
        self.pressed_at = None;
        self.released_at = None;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Elements keyed since the last commit
    pub fn sequence(&self) -> &str {
        self.buffer.sequence()
    }

    /// Committed Morse groups
    pub fn buffer(&self) -> &str {
        self.buffer.buffer()
    }

    pub fn decoded(&self) -> heapless::String<BUF> {
        self.buffer.decoded()
    }

    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn scheduler(&self) -> &S {
        &self.timers
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Element a press of `held_ms` would produce at the current speed
    pub fn classify(&self, held_ms: f64) -> Element {
        classify_straight_element(held_ms, self.timings.dot)
    }
}
