//! Test utilities: virtual clock, scripted input, recording observer

use crate::evaluator::{ElementEvaluation, SpacingEvaluation};
use crate::hal::{Duration, Instant};
use crate::keyer::Keyer;
use crate::observer::KeyerObserver;
use crate::types::{Element, InputEvent, PaddleSide};

/// Upper bound on timer firings in [`VirtualClock::run_until_idle`]
const MAX_IDLE_STEPS: usize = 10_000;

/// Deterministic clock for driving a keyer without real time.
///
/// Time only moves when the test says so; every move polls the keyer at each
/// deadline on the way, like a scheduler waking up on time.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: u64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Instant {
        Instant::from_millis(self.now)
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now
    }

    /// Move to `ms`, firing every deadline that falls before it
    pub fn advance_to<K: Keyer + ?Sized>(&mut self, keyer: &mut K, ms: u64) {
        while let Some(deadline) = keyer.next_deadline() {
            let deadline = deadline.as_millis();
            if deadline > ms {
                break;
            }
            self.now = self.now.max(deadline);
            keyer.poll(Instant::from_millis(self.now));
        }
        self.now = self.now.max(ms);
        keyer.poll(self.now());
    }

    pub fn advance<K: Keyer + ?Sized>(&mut self, keyer: &mut K, by: Duration) {
        let target = self.now + by.as_millis();
        self.advance_to(keyer, target);
    }

    /// Deliver an event at the current time
    pub fn send<K: Keyer + ?Sized>(&self, keyer: &mut K, event: InputEvent) {
        keyer.handle(event, self.now());
    }

    /// Fire deadlines until the keyer has nothing pending.
    ///
    /// Returns false if the keyer was still busy after a bounded number of steps.
    pub fn run_until_idle<K: Keyer + ?Sized>(&mut self, keyer: &mut K) -> bool {
        for _ in 0..MAX_IDLE_STEPS {
            match keyer.next_deadline() {
                Some(deadline) => {
                    self.now = self.now.max(deadline.as_millis());
                    keyer.poll(self.now());
                }
                None => return true,
            }
        }
        false
    }
}

/// Timed sequence of input edges
#[derive(Clone, Debug, Default)]
pub struct Script {
    events: Vec<(u64, InputEvent)>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event at `ms`
    pub fn at(mut self, ms: u64, event: InputEvent) -> Self {
        self.events.push((ms, event));
        self
    }

    /// Straight key held from `down` to `up`
    pub fn key(self, down: u64, up: u64) -> Self {
        self.at(down, InputEvent::KeyDown).at(up, InputEvent::KeyUp)
    }

    /// Paddle held from `down` to `up`
    pub fn paddle(self, side: PaddleSide, down: u64, up: u64) -> Self {
        self.at(down, InputEvent::paddle(side, true))
            .at(up, InputEvent::paddle(side, false))
    }

    pub fn events(&self) -> &[(u64, InputEvent)] {
        &self.events
    }

    /// Play the script against `keyer`, then let it run idle.
    ///
    /// Events are delivered in time order; ties keep insertion order.
    pub fn run<K: Keyer + ?Sized>(&self, keyer: &mut K) -> VirtualClock {
        let mut events = self.events.clone();
        events.sort_by_key(|(ms, _)| *ms);

        let mut clock = VirtualClock::new();
        for (ms, event) in events {
            clock.advance_to(keyer, ms);
            clock.send(keyer, event);
        }
        clock.run_until_idle(keyer);
        clock
    }
}

/// One observer notification, with owned data
#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    /// Element and its duration in ms
    ElementStarted(Element, u64),
    ElementEnded(Element),
    SequenceUpdated(String),
    CharacterCommitted(String, char),
    WordSeparator,
    BufferUpdated(String, String),
    SqueezeChanged(bool),
    SpacingEvaluated(SpacingEvaluation),
    KeyDown,
    /// Held duration in ms
    KeyUp(u64),
    ElementEvaluated(ElementEvaluation),
}

/// Observer that records every notification in order
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<Recorded>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, predicate: impl Fn(&Recorded) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    /// Elements in the order they started sounding
    pub fn started(&self) -> Vec<Element> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::ElementStarted(element, _) => Some(*element),
                _ => None,
            })
            .collect()
    }

    /// Committed characters concatenated
    pub fn characters(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::CharacterCommitted(_, c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn squeeze_changes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::SqueezeChanged(squeezing) => Some(*squeezing),
                _ => None,
            })
            .collect()
    }

    pub fn element_scores(&self) -> Vec<ElementEvaluation> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::ElementEvaluated(evaluation) => Some(*evaluation),
                _ => None,
            })
            .collect()
    }

    pub fn spacing_scores(&self) -> Vec<SpacingEvaluation> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Recorded::SpacingEvaluated(evaluation) => Some(*evaluation),
                _ => None,
            })
            .collect()
    }

    /// Most recent buffer notification as `(buffer, decoded)`
    pub fn last_buffer(&self) -> Option<(&str, &str)> {
        self.events.iter().rev().find_map(|event| match event {
            Recorded::BufferUpdated(buffer, decoded) => Some((buffer.as_str(), decoded.as_str())),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl KeyerObserver for EventRecorder {
    fn element_started(&mut self, element: Element, duration: Duration) {
        self.events
            .push(Recorded::ElementStarted(element, duration.as_millis()));
    }

    fn element_ended(&mut self, element: Element) {
        self.events.push(Recorded::ElementEnded(element));
    }

    fn sequence_updated(&mut self, sequence: &str) {
        self.events.push(Recorded::SequenceUpdated(sequence.into()));
    }

    fn character_committed(&mut self, morse: &str, decoded: char) {
        self.events
            .push(Recorded::CharacterCommitted(morse.into(), decoded));
    }

    fn word_separator_added(&mut self) {
        self.events.push(Recorded::WordSeparator);
    }

    fn buffer_updated(&mut self, buffer: &str, decoded: &str) {
        self.events
            .push(Recorded::BufferUpdated(buffer.into(), decoded.into()));
    }

    fn squeeze_changed(&mut self, squeezing: bool) {
        self.events.push(Recorded::SqueezeChanged(squeezing));
    }

    fn spacing_evaluated(&mut self, evaluation: &SpacingEvaluation) {
        self.events.push(Recorded::SpacingEvaluated(*evaluation));
    }

    fn key_down(&mut self) {
        self.events.push(Recorded::KeyDown);
    }

    fn key_up(&mut self, held: Duration) {
        self.events.push(Recorded::KeyUp(held.as_millis()));
    }

    fn element_evaluated(&mut self, evaluation: &ElementEvaluation) {
        self.events.push(Recorded::ElementEvaluated(*evaluation));
    }
}
