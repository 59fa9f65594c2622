//! Timing accuracy scoring
//!
//! Records pair a measured duration with the duration it should have had.
//! Scoring is pure; [`TimingEvaluator`] (with `std`) keeps a history and
//! derives statistics from it. Nothing here feeds back into keying.

use crate::hal::Instant;
use crate::timing::{SpacingType, Timings};
use crate::types::Element;

/// A keyed element's measured duration
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingRecord {
    pub element: Element,
    pub expected_ms: f64,
    pub actual_ms: f64,
    pub timestamp: Instant,
}

impl TimingRecord {
    /// Record for an element keyed for `actual_ms`, scored against `timings`
    pub fn new(element: Element, actual_ms: f64, timings: &Timings, timestamp: Instant) -> Self {
        Self {
            element,
            expected_ms: timings.element(element),
            actual_ms,
            timestamp,
        }
    }
}

/// A measured silence between elements
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpacingRecord {
    pub spacing: SpacingType,
    pub expected_ms: f64,
    pub actual_ms: f64,
    pub timestamp: Instant,
}

impl SpacingRecord {
    /// Classify a gap of `actual_ms` and record it against the matching expectation
    pub fn classify(actual_ms: f64, timings: &Timings, timestamp: Instant) -> Self {
        let (spacing, expected_ms) = SpacingType::classify(actual_ms, timings);
        Self {
            spacing,
            expected_ms,
            actual_ms,
            timestamp,
        }
    }
}

/// Anything carrying an expected and an actual duration
pub trait Timed {
    fn expected_ms(&self) -> f64;
    fn actual_ms(&self) -> f64;
    fn timestamp(&self) -> Instant;
}

impl Timed for TimingRecord {
    fn expected_ms(&self) -> f64 {
        self.expected_ms
    }

    fn actual_ms(&self) -> f64 {
        self.actual_ms
    }

    fn timestamp(&self) -> Instant {
        self.timestamp
    }
}

impl Timed for SpacingRecord {
    fn expected_ms(&self) -> f64 {
        self.expected_ms
    }

    fn actual_ms(&self) -> f64 {
        self.actual_ms
    }

    fn timestamp(&self) -> Instant {
        self.timestamp
    }
}

/// A record and its scores
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluated<R> {
    pub record: R,
    /// `|actual - expected|` in ms
    pub absolute_error: f64,
    /// Error as a percentage of the expected duration
    pub relative_error: f64,
    /// `max(0, 100 - relative_error)`
    pub accuracy: f64,
}

pub type ElementEvaluation = Evaluated<TimingRecord>;
pub type SpacingEvaluation = Evaluated<SpacingRecord>;

/// Score a record.
///
/// When the expected duration is zero (element gaps) the relative error is
/// the absolute error in ms. Accuracy never goes below zero.
pub fn evaluate<R: Timed>(record: R) -> Evaluated<R> {
    let diff = record.actual_ms() - record.expected_ms();
    let absolute_error = if diff < 0.0 { -diff } else { diff };
    let relative_error = if record.expected_ms() == 0.0 {
        absolute_error
    } else {
        absolute_error / record.expected_ms() * 100.0
    };
    let accuracy = (100.0 - relative_error).max(0.0);

    Evaluated {
        record,
        absolute_error,
        relative_error,
        accuracy,
    }
}

/// Aggregate scores over a set of evaluations
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    pub count: usize,
    pub average_accuracy: f64,
    pub average_absolute_error: f64,
    pub average_relative_error: f64,
    pub max_accuracy: f64,
    pub min_accuracy: f64,
    /// Population standard deviation of accuracy
    pub standard_deviation: f64,
}

#[cfg(feature = "std")]
pub use self::history::*;

#[cfg(feature = "std")]
mod history {
    use super::*;

    /// Statistics over `evaluations`; all zero when empty
    pub fn calculate_statistics<R>(evaluations: &[Evaluated<R>]) -> Statistics {
        if evaluations.is_empty() {
            return Statistics::default();
        }

        let n = evaluations.len() as f64;
        let average_accuracy = evaluations.iter().map(|e| e.accuracy).sum::<f64>() / n;
        let average_absolute_error = evaluations.iter().map(|e| e.absolute_error).sum::<f64>() / n;
        let average_relative_error = evaluations.iter().map(|e| e.relative_error).sum::<f64>() / n;
        let max_accuracy = evaluations.iter().map(|e| e.accuracy).fold(f64::MIN, f64::max);
        let min_accuracy = evaluations.iter().map(|e| e.accuracy).fold(f64::MAX, f64::min);
        let variance = evaluations
            .iter()
            .map(|e| (e.accuracy - average_accuracy).powi(2))
            .sum::<f64>()
            / n;

        Statistics {
            count: evaluations.len(),
            average_accuracy,
            average_absolute_error,
            average_relative_error,
            max_accuracy,
            min_accuracy,
            standard_deviation: variance.sqrt(),
        }
    }

    /// Element evaluations split by element
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct ByElement {
        pub dots: Vec<ElementEvaluation>,
        pub dashes: Vec<ElementEvaluation>,
    }

    /// Spacing evaluations split by gap class
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct BySpacing {
        pub element: Vec<SpacingEvaluation>,
        pub character: Vec<SpacingEvaluation>,
        pub word: Vec<SpacingEvaluation>,
    }

    pub fn classify_by_element(evaluations: &[ElementEvaluation]) -> ByElement {
        let (dots, dashes): (Vec<_>, Vec<_>) = evaluations
            .iter()
            .copied()
            .partition(|e| e.record.element == Element::Dot);
        ByElement { dots, dashes }
    }

    pub fn classify_by_spacing_type(evaluations: &[SpacingEvaluation]) -> BySpacing {
        let mut split = BySpacing::default();
        for evaluation in evaluations {
            match evaluation.record.spacing {
                SpacingType::Element => split.element.push(*evaluation),
                SpacingType::Character => split.character.push(*evaluation),
                SpacingType::Word => split.word.push(*evaluation),
            }
        }
        split
    }

    /// The `n` most recent evaluations, newest first
    pub fn get_recent<R: Timed + Copy>(evaluations: &[Evaluated<R>], n: usize) -> Vec<Evaluated<R>> {
        let mut sorted = evaluations.to_vec();
        sorted.sort_by_key(|e| core::cmp::Reverse(e.record.timestamp()));
        sorted.truncate(n);
        sorted
    }

    /// Evaluations with `start <= timestamp <= end`, oldest first
    pub fn get_by_time_range<R: Timed + Copy>(
        evaluations: &[Evaluated<R>],
        start: Instant,
        end: Instant,
    ) -> Vec<Evaluated<R>> {
        let mut selected: Vec<_> = evaluations
            .iter()
            .filter(|e| {
                let t = e.record.timestamp();
                t >= start && t <= end
            })
            .copied()
            .collect();
        selected.sort_by_key(|e| e.record.timestamp());
        selected
    }

    /// Per-class statistics for a practice session
    #[derive(Copy, Clone, Debug, Default, PartialEq)]
    pub struct SessionSummary {
        pub elements: Statistics,
        pub dots: Statistics,
        pub dashes: Statistics,
        pub spacing: Statistics,
        pub element_gaps: Statistics,
        pub character_gaps: Statistics,
        pub word_gaps: Statistics,
    }

    /// History of element and spacing evaluations.
    ///
    /// Implements [`KeyerObserver`](crate::observer::KeyerObserver), so a keyer
    /// can feed it directly.
    #[derive(Debug, Default)]
    pub struct TimingEvaluator {
        elements: Vec<ElementEvaluation>,
        spacings: Vec<SpacingEvaluation>,
    }

    impl TimingEvaluator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Score and keep an element record
        pub fn record_element(&mut self, record: TimingRecord) -> ElementEvaluation {
            let evaluation = evaluate(record);
            self.elements.push(evaluation);
            evaluation
        }

        /// Score and keep a spacing record
        pub fn record_spacing(&mut self, record: SpacingRecord) -> SpacingEvaluation {
            let evaluation = evaluate(record);
            self.spacings.push(evaluation);
            evaluation
        }

        pub fn elements(&self) -> &[ElementEvaluation] {
            &self.elements
        }

        pub fn spacings(&self) -> &[SpacingEvaluation] {
            &self.spacings
        }

        pub fn recent_elements(&self, n: usize) -> Vec<ElementEvaluation> {
            get_recent(&self.elements, n)
        }

        pub fn recent_spacings(&self, n: usize) -> Vec<SpacingEvaluation> {
            get_recent(&self.spacings, n)
        }

        pub fn elements_between(&self, start: Instant, end: Instant) -> Vec<ElementEvaluation> {
            get_by_time_range(&self.elements, start, end)
        }

        pub fn spacings_between(&self, start: Instant, end: Instant) -> Vec<SpacingEvaluation> {
            get_by_time_range(&self.spacings, start, end)
        }

        /// Statistics over the whole history, overall and per class
        pub fn summary(&self) -> SessionSummary {
            let by_element = classify_by_element(&self.elements);
            let by_spacing = classify_by_spacing_type(&self.spacings);
            SessionSummary {
                elements: calculate_statistics(&self.elements),
                dots: calculate_statistics(&by_element.dots),
                dashes: calculate_statistics(&by_element.dashes),
                spacing: calculate_statistics(&self.spacings),
                element_gaps: calculate_statistics(&by_spacing.element),
                character_gaps: calculate_statistics(&by_spacing.character),
                word_gaps: calculate_statistics(&by_spacing.word),
            }
        }

        pub fn clear(&mut self) {
            self.elements.clear();
            self.spacings.clear();
        }
    }

    impl crate::observer::KeyerObserver for TimingEvaluator {
        fn element_evaluated(&mut self, evaluation: &ElementEvaluation) {
            self.elements.push(*evaluation);
        }

        fn spacing_evaluated(&mut self, evaluation: &SpacingEvaluation) {
            self.spacings.push(*evaluation);
        }
    }
}
