#![cfg_attr(not(feature = "std"), no_std)]

//! # Morsepad Core
//!
//! Timing engine for a Morse practice keyer.
//! Turns key and paddle edges into dots and dashes, groups them into
//! characters and words by silence, and scores keying accuracy.
//! Supports a straight key and an iambic paddle in Mode A or Mode B.
//!
//! The engine never reads a clock: every input carries its own `Instant` and
//! pending timers fire from [`Keyer::poll`]. Enable `embassy-time` to drive a
//! keyer from real time with [`keyer::keyer_task`].

pub mod types;
pub mod hal;
pub mod timing;
pub mod timer;
pub mod codec;
pub mod buffer;
pub mod observer;
pub mod evaluator;
pub mod controller;
pub mod straight;
pub mod fsm;
pub mod keyer;

#[cfg(all(feature = "std", any(test, feature = "test-utils")))]
pub mod test_utils;


pub use types::*;
pub use hal::{ContactRole, Duration, HalError, Instant, PaddleContact};
pub use timing::{calculate, classify_element, classify_straight_element, SpacingType, Timings};
pub use timer::{KeyerTimer, Scheduler, TimerManager};
pub use buffer::SequenceBuffer;
pub use observer::KeyerObserver;
pub use evaluator::*;
pub use controller::PaddleState;
pub use straight::StraightKeyer;
pub use fsm::IambicKeyer;
pub use keyer::Keyer;

/// Keyer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: 20 WPM, standard gaps, Mode B, normal paddle layout
pub fn default_config() -> KeyerConfig {
    KeyerConfig {
        wpm: 20.0,
        shorten_gaps: false,
        iambic_mode: IambicMode::B,
        paddle_layout: PaddleLayout::Normal,
    }
}
