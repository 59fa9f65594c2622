//! WPM to element/gap durations and duration classification
//!
//! All durations are milliseconds as `f64`. One dot lasts `1200 / WPM` ms
//! (PARIS standard, 50 units per word).

use crate::hal::{duration_from_ms, Duration};
use crate::types::{Element, KeyerError};

/// Milliseconds per dot at 1 WPM
pub const PARIS_DOT_MS: f64 = 1200.0;

/// Factor applied to character and word gaps when gap shortening is on
pub const SHORTENED_GAP_FACTOR: f64 = 0.9;

/// Dash threshold used by [`classify_element`], in dots
pub const DASH_THRESHOLD_DOTS: f64 = 1.5;

/// Dash threshold used by the straight keyer, in dots.
///
/// Deliberately wider than [`DASH_THRESHOLD_DOTS`]; see [`classify_straight_element`].
pub const STRAIGHT_KEY_DASH_THRESHOLD_DOTS: f64 = 2.0;

/// Element and gap durations derived from one WPM setting
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timings {
    pub dot: f64,
    pub dash: f64,
    pub element_gap: f64,
    pub char_gap: f64,
    pub word_gap: f64,
}

impl Timings {
    /// Keyed duration of an element
    pub fn element(&self, element: Element) -> f64 {
        match element {
            Element::Dot => self.dot,
            Element::Dash => self.dash,
        }
    }

    /// Keyed duration of an element as a scheduler duration
    pub fn element_duration(&self, element: Element) -> Duration {
        duration_from_ms(self.element(element))
    }

    /// One dot as a scheduler duration
    pub fn dot_duration(&self) -> Duration {
        duration_from_ms(self.dot)
    }

    /// Speed these timings were derived from
    pub fn wpm(&self) -> f64 {
        PARIS_DOT_MS / self.dot
    }
}

/// Compute durations for `wpm`.
///
/// `dash = 3 * dot`, `element_gap = dot`, `char_gap = 3 * dot`,
/// `word_gap = 7 * dot`; with `shorten_gaps` the last two are scaled by 0.9.
/// A non-positive or non-finite WPM is an error, never clamped.
pub fn calculate(wpm: f64, shorten_gaps: bool) -> Result<Timings, KeyerError> {
    if !wpm.is_finite() || wpm <= 0.0 {
        return Err(KeyerError::InvalidWpm(wpm));
    }

    let dot = PARIS_DOT_MS / wpm;
    let gap_factor = if shorten_gaps { SHORTENED_GAP_FACTOR } else { 1.0 };

    Ok(Timings {
        dot,
        dash: dot * 3.0,
        element_gap: dot,
        char_gap: dot * 3.0 * gap_factor,
        word_gap: dot * 7.0 * gap_factor,
    })
}

/// Classify a press duration: below 1.5 dots is a dot, otherwise a dash.
pub fn classify_element(press_ms: f64, dot_ms: f64) -> Element {
    if press_ms < dot_ms * DASH_THRESHOLD_DOTS {
        Element::Dot
    } else {
        Element::Dash
    }
}

/// Classify a straight-key press: below 2 dots is a dot, otherwise a dash.
///
/// This threshold differs from [`classify_element`]. Callers expecting one
/// canonical threshold must pick explicitly; the straight keyer uses this one.
pub fn classify_straight_element(press_ms: f64, dot_ms: f64) -> Element {
    if press_ms < dot_ms * STRAIGHT_KEY_DASH_THRESHOLD_DOTS {
        Element::Dot
    } else {
        Element::Dash
    }
}

/// Silence after the last element before the pending character is committed
pub fn char_gap_delay(timings: &Timings) -> f64 {
    timings.element_gap + timings.char_gap
}

/// Silence after the last element before a word separator is added
pub fn word_gap_delay(timings: &Timings) -> f64 {
    timings.word_gap
}

/// Class of a measured silence between elements
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpacingType {
    /// Gap inside a character
    Element,
    /// Gap between characters
    Character,
    /// Gap between words
    Word,
}

impl SpacingType {
    /// Classify a measured gap and return the duration it is scored against.
    ///
    /// Below 2 dots is an element gap (expected 0), below 5 dots a character
    /// gap (expected `char_gap`), anything longer a word gap (expected `word_gap`).
    pub fn classify(gap_ms: f64, timings: &Timings) -> (SpacingType, f64) {
        if gap_ms < timings.dot * 2.0 {
            (SpacingType::Element, 0.0)
        } else if gap_ms < timings.dot * 5.0 {
            (SpacingType::Character, timings.char_gap)
        } else {
            (SpacingType::Word, timings.word_gap)
        }
    }
}
