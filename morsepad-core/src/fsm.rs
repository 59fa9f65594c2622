//! Iambic (dual paddle) keyer state machine
//!
//! Each element runs a two-phase cycle driven by two timers:
//!
//! - `IambicCheck`, [`IAMBIC_CHECK_LEAD_MS`] before the element stops sounding,
//!   decides whether an alternated element must follow.
//! - `ElementEnd`, one dot after the element stops sounding, commits that
//!   decision and starts the next element or falls idle.
//!
//! Mode B additionally remembers a squeeze that happened at any time during
//! the current element and sends one more alternated element for it, even if
//! both paddles are released before that element begins.

use crate::buffer::{SequenceBuffer, BUFFER_CAPACITY, SEQUENCE_CAPACITY};
use crate::controller::PaddleState;
use crate::evaluator::{evaluate, SpacingRecord};
use crate::hal::{Duration, Instant};
use crate::observer::KeyerObserver;
use crate::timer::{arm_commit_timers, KeyerTimer, Scheduler, TimerManager};
use crate::timing::Timings;
use crate::types::{Element, IambicMode, KeyerConfig, KeyerError, PaddleLayout, PaddleSide};

/// How long before the end of an element the squeeze look-ahead runs
pub const IAMBIC_CHECK_LEAD_MS: u64 = 5;

/// Paddle keyer with Mode A/B squeeze semantics.
///
/// `SEQ` and `BUF` size the pending sequence and the committed buffer.
pub struct IambicKeyer<
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
    paddles: PaddleState,
    /// An element and its trailing gap are in progress
    sending: bool,
    current: Option<Element>,
    last_sent: Option<Element>,
    /// Squeeze memory: element that must be sent next
    force_next: Option<Element>,
    /// Mode B: a squeeze happened during the current element
    squeeze_detected: bool,
    last_element_end: Option<Instant>,
}

impl<O: KeyerObserver> IambicKeyer<O> {
    /// Create a keyer with the built-in timer table
    pub fn new(config: KeyerConfig, observer: O) -> Result<Self, KeyerError> {
        Self::with_scheduler(config, observer, TimerManager::new())
    }
}

impl<O: KeyerObserver, const SEQ: usize, const BUF: usize>
    IambicKeyer<O, TimerManager<KeyerTimer>, SEQ, BUF>
{
    /// Create a keyer with the built-in timer table and custom buffer sizes
    pub fn with_capacity(config: KeyerConfig, observer: O) -> Result<Self, KeyerError> {
        Self::with_scheduler(config, observer, TimerManager::new())
    }
}

impl<O, S, const SEQ: usize, const BUF: usize> IambicKeyer<O, S, SEQ, BUF>
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
            paddles: PaddleState::new(config.paddle_layout),
            sending: false,
            current: None,
            last_sent: None,
            force_next: None,
            squeeze_detected: false,
            last_element_end: None,
        })
    }

    /// Paddle closed. Redundant presses are ignored.
    pub fn paddle_press(&mut self, side: PaddleSide, now: Instant) {
        self.poll(now);
        if !self.paddles.press(side) {
            return;
        }
        self.update_squeeze();

        let element = self.paddles.element_for(side);
        if self.config.iambic_mode.has_memory() && self.sending && self.paddles.is_down(side.opposite()) {
            #[cfg(feature = "defmt")]
            defmt::trace!("squeeze during element, memory {}", element);
            self.force_next = Some(element);
            self.squeeze_detected = true;
        }

        if !self.sending {
            self.send_element(element, now);
        }
    }

    /// Paddle opened. Redundant releases are ignored.
    pub fn paddle_release(&mut self, side: PaddleSide, now: Instant) {
        self.poll(now);
        if self.paddles.release(side) {
            self.update_squeeze();
        }
    }

    pub fn left_paddle_press(&mut self, now: Instant) {
        self.paddle_press(PaddleSide::Left, now);
    }

    pub fn left_paddle_release(&mut self, now: Instant) {
        self.paddle_release(PaddleSide::Left, now);
    }

    pub fn right_paddle_press(&mut self, now: Instant) {
        self.paddle_press(PaddleSide::Right, now);
    }

    pub fn right_paddle_release(&mut self, now: Instant) {
        self.paddle_release(PaddleSide::Right, now);
    }

    /// Fire every timer due at or before `now`.
    ///
    /// Timers fire at their own deadline, so elements chained from a late
    /// poll keep their nominal spacing.
    pub fn poll(&mut self, now: Instant) {
        while let Some((timer, at)) = self.timers.pop_expired(now) {
            self.fire(timer, at);
        }
    }

    fn fire(&mut self, timer: KeyerTimer, at: Instant) {
        match timer {
            KeyerTimer::IambicCheck => self.iambic_check(),
            KeyerTimer::ElementEnd => self.element_end(at),
            KeyerTimer::CharGap => {
                self.buffer.commit_character(&mut self.observer);
            }
            KeyerTimer::WordGap => self.buffer.commit_word(&mut self.observer),
        }
    }

    fn send_element(&mut self, element: Element, now: Instant) {
        if self.sending {
            return;
        }
        self.sending = true;
        self.timers.cancel_all();

        // Memory from an earlier squeeze must not carry into a fresh cycle
        if !self.paddles.both_down() {
            self.squeeze_detected = false;
        }

        if let Some(end) = self.last_element_end {
            let gap_ms = now.saturating_duration_since(end).as_millis() as f64;
            let evaluation = evaluate(SpacingRecord::classify(gap_ms, &self.timings, now));
            self.observer.spacing_evaluated(&evaluation);
        }

        self.buffer.push_element(element, &mut self.observer);
        self.last_sent = Some(element);
        self.current = Some(element);

        #[cfg(feature = "defmt")]
        defmt::debug!("send {}", element);

        self.observer.sequence_updated(self.buffer.sequence());
        self.buffer.notify_buffer(&mut self.observer);

        let duration = self.timings.element_duration(element);
        self.observer.element_started(element, duration);

        let lead = Duration::from_millis(IAMBIC_CHECK_LEAD_MS);
        let check_delay = duration.checked_sub(lead).unwrap_or(Duration::from_millis(0));
        self.timers.schedule(KeyerTimer::IambicCheck, now, check_delay);
        self.timers
            .schedule(KeyerTimer::ElementEnd, now, duration + self.timings.dot_duration());
    }

    fn iambic_check(&mut self) {
        let Some(current) = self.current else {
            return;
        };
        if self.force_next.is_some() {
            return;
        }
        let memory = self.config.iambic_mode.has_memory() && self.squeeze_detected;
        if self.paddles.both_down() || memory {
            self.force_next = Some(current.opposite());
        }
    }

    fn element_end(&mut self, at: Instant) {
        self.sending = false;
        if let Some(element) = self.current.take() {
            self.observer.element_ended(element);
        }
        self.last_element_end = Some(at);

        if let Some(next) = self.force_next.take() {
            self.send_element(next, at);
        } else if self.paddles.any_down() {
            self.schedule_next(at);
        } else {
            #[cfg(feature = "defmt")]
            defmt::trace!("paddles idle, arming commit timers");
            arm_commit_timers(&mut self.timers, at, &self.timings);
        }
    }

    fn schedule_next(&mut self, now: Instant) {
        let next = if let Some(forced) = self.force_next.take() {
            Some(forced)
        } else if self.paddles.both_down() {
            let last = self.last_sent.unwrap_or(Element::Dash);
            Some(last.opposite())
        } else {
            self.paddles.single_element()
        };

        if let Some(element) = next {
            self.send_element(element, now);
        }
    }

    fn update_squeeze(&mut self) {
        if let Some(squeezing) = self.paddles.refresh_squeeze() {
            self.observer.squeeze_changed(squeezing);
        }
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Apply a new configuration.
    ///
    /// Speed changes take effect from the next element; layout and mode apply
    /// immediately.
    pub fn reconfigure(&mut self, config: KeyerConfig) -> Result<(), KeyerError> {
        self.timings = config.timings()?;
        self.paddles.set_layout(config.paddle_layout);
        if !config.iambic_mode.has_memory() {
            self.squeeze_detected = false;
            self.force_next = None;
        }
        self.config = config;
        Ok(())
    }

    /// Switch iambic mode. Leaving Mode B drops any pending squeeze memory.
    pub fn set_mode(&mut self, mode: IambicMode) {
        self.config.iambic_mode = mode;
        if !mode.has_memory() {
            self.squeeze_detected = false;
            self.force_next = None;
        }
    }

    pub fn set_layout(&mut self, layout: PaddleLayout) {
        self.config.paddle_layout = layout;
        self.paddles.set_layout(layout);
    }

    /// Clear the sequence and buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.observer.sequence_updated(self.buffer.sequence());
        self.buffer.notify_buffer(&mut self.observer);
    }

    /// Cancel every pending timer and reset keying state.
    ///
    /// The buffer is kept. No notification is delivered after this returns
    /// unless new input arrives.
    pub fn destroy(&mut self) {
        self.timers.cancel_all();
        self.paddles.reset();
        self.sending = false;
        self.current = None;
        self.force_next = None;
        self.squeeze_detected = false;
        self.last_element_end = None;
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn is_squeezing(&self) -> bool {
        self.paddles.is_squeezing()
    }

    pub fn paddles(&self) -> &PaddleState {
        &self.paddles
    }

    pub fn last_sent(&self) -> Option<Element> {
        self.last_sent
    }

    /// Element queued by squeeze memory, if any
    pub fn pending_element(&self) -> Option<Element> {
        self.force_next
    }

    pub fn sequence(&self) -> &str {
        self.buffer.sequence()
    }

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
}
