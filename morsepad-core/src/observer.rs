//! Keyer notifications
//!
//! One method per observable moment. Every method has an empty default, so
//! an observer implements only what it displays. Calls are synchronous and
//! happen inside the keyer operation that caused them; observers must not block.

use crate::evaluator::{ElementEvaluation, SpacingEvaluation};
use crate::hal::Duration;
use crate::types::Element;

pub trait KeyerObserver {
    /// An element started sounding for `duration`
    fn element_started(&mut self, _element: Element, _duration: Duration) {}

    /// An element and its trailing inter-element gap finished
    fn element_ended(&mut self, _element: Element) {}

    /// The pending (uncommitted) sequence changed
    fn sequence_updated(&mut self, _sequence: &str) {}

    /// A pending sequence was committed as a character
    fn character_committed(&mut self, _morse: &str, _decoded: char) {}

    /// A word separator was appended to the buffer
    fn word_separator_added(&mut self) {}

    /// The committed buffer changed
    fn buffer_updated(&mut self, _buffer: &str, _decoded: &str) {}

    /// Both paddles became held, or stopped being held
    fn squeeze_changed(&mut self, _squeezing: bool) {}

    /// A gap between elements was measured and scored
    fn spacing_evaluated(&mut self, _evaluation: &SpacingEvaluation) {}

    /// Straight key closed
    fn key_down(&mut self) {}

    /// Straight key opened after being held for `held`
    fn key_up(&mut self, _held: Duration) {}

    /// A straight-key press was classified and scored against its expected length
    fn element_evaluated(&mut self, _evaluation: &ElementEvaluation) {}
}

/// Observer that ignores everything
impl KeyerObserver for () {}

impl<T: KeyerObserver + ?Sized> KeyerObserver for &mut T {
    fn element_started(&mut self, element: Element, duration: Duration) {
        (**self).element_started(element, duration)
    }

    fn element_ended(&mut self, element: Element) {
        (**self).element_ended(element)
    }

    fn sequence_updated(&mut self, sequence: &str) {
        (**self).sequence_updated(sequence)
    }

    fn character_committed(&mut self, morse: &str, decoded: char) {
        (**self).character_committed(morse, decoded)
    }

    fn word_separator_added(&mut self) {
        (**self).word_separator_added()
    }

    fn buffer_updated(&mut self, buffer: &str, decoded: &str) {
        (**self).buffer_updated(buffer, decoded)
    }

    fn squeeze_changed(&mut self, squeezing: bool) {
        (**self).squeeze_changed(squeezing)
    }

    fn spacing_evaluated(&mut self, evaluation: &SpacingEvaluation) {
        (**self).spacing_evaluated(evaluation)
    }

    fn key_down(&mut self) {
        (**self).key_down()
    }

    fn key_up(&mut self, held: Duration) {
        (**self).key_up(held)
    }

    fn element_evaluated(&mut self, evaluation: &ElementEvaluation) {
        (**self).element_evaluated(evaluation)
    }
}

/// Fan out every notification to two observers, first `A` then `B`
impl<A: KeyerObserver, B: KeyerObserver> KeyerObserver for (A, B) {
    fn element_started(&mut self, element: Element, duration: Duration) {
        self.0.element_started(element, duration);
        self.1.element_started(element, duration);
    }

    fn element_ended(&mut self, element: Element) {
        self.0.element_ended(element);
        self.1.element_ended(element);
    }

    fn sequence_updated(&mut self, sequence: &str) {
        self.0.sequence_updated(sequence);
        self.1.sequence_updated(sequence);
    }

    fn character_committed(&mut self, morse: &str, decoded: char) {
        self.0.character_committed(morse, decoded);
        self.1.character_committed(morse, decoded);
    }

    fn word_separator_added(&mut self) {
        self.0.word_separator_added();
        self.1.word_separator_added();
    }

    fn buffer_updated(&mut self, buffer: &str, decoded: &str) {
        self.0.buffer_updated(buffer, decoded);
        self.1.buffer_updated(buffer, decoded);
    }

    fn squeeze_changed(&mut self, squeezing: bool) {
        self.0.squeeze_changed(squeezing);
        self.1.squeeze_changed(squeezing);
    }

    fn spacing_evaluated(&mut self, evaluation: &SpacingEvaluation) {
        self.0.spacing_evaluated(evaluation);
        self.1.spacing_evaluated(evaluation);
    }

    fn key_down(&mut self) {
        self.0.key_down();
        self.1.key_down();
    }

    fn key_up(&mut self, held: Duration) {
        self.0.key_up(held);
        self.1.key_up(held);
    }

    fn element_evaluated(&mut self, evaluation: &ElementEvaluation) {
        self.0.element_evaluated(evaluation);
        self.1.element_evaluated(evaluation);
    }
}
