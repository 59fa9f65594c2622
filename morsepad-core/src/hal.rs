//! Hardware Abstraction Layer: time types and key/paddle contacts

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Millisecond instant, API-compatible with the embassy-time subset used here
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Instant(u64);

    impl Instant {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }

        pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
            Duration(self.0.saturating_sub(earlier.0))
        }
    }

    impl core::ops::Add<Duration> for Instant {
        type Output = Instant;

        fn add(self, rhs: Duration) -> Instant {
            Instant(self.0 + rhs.0)
        }
    }

    /// Millisecond duration
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }

        pub fn checked_sub(self, rhs: Duration) -> Option<Duration> {
            self.0.checked_sub(rhs.0).map(Duration)
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0 + rhs.0)
        }
    }

    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use embedded_hal::digital::InputPin;
use crate::types::{InputEvent, PaddleSide};

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
}

impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Which input a contact is wired to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContactRole {
    /// Single-lever straight key
    StraightKey,
    /// One side of a dual paddle
    Paddle(PaddleSide),
}

/// Edge detector for a key or paddle contact on an embedded-hal input pin.
///
/// The pin is sampled on demand; only changes of state are reported. Contact
/// bounce is not filtered, the wiring or caller must supply clean edges.
pub struct PaddleContact<P> {
    pin: P,
    role: ContactRole,
    active_low: bool,
    closed: bool,
}

impl<P> PaddleContact<P>
where
    P: InputPin,
{
    /// Contact wired to ground with a pull-up (closed reads low)
    pub fn active_low(pin: P, role: ContactRole) -> Self {
        Self {
            pin,
            role,
            active_low: true,
            closed: false,
        }
    }

    /// Contact wired to the supply with a pull-down (closed reads high)
    pub fn active_high(pin: P, role: ContactRole) -> Self {
        Self {
            pin,
            role,
            active_low: false,
            closed: false,
        }
    }

    /// Last observed contact state
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sample the pin and return the input event for a state change, if any
    pub fn sample(&mut self) -> Result<Option<InputEvent>, HalError> {
        let high = self.pin.is_high().map_err(|_| HalError::GpioError)?;
        let closed = high != self.active_low;
        if closed == self.closed {
            return Ok(None);
        }
        self.closed = closed;
        let event = match self.role {
            ContactRole::StraightKey if closed => InputEvent::KeyDown,
            ContactRole::StraightKey => InputEvent::KeyUp,
            ContactRole::Paddle(side) => InputEvent::paddle(side, closed),
        };
        Ok(Some(event))
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

/// Convert a floating-point millisecond value to a scheduler duration,
/// rounding to the nearest millisecond. Negative values clamp to zero.
pub fn duration_from_ms(ms: f64) -> Duration {
    if ms <= 0.0 {
        Duration::from_millis(0)
    } else {
        Duration::from_millis((ms + 0.5) as u64)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use core::cell::Cell;
    use embedded_hal::digital::{ErrorType, InputPin};

    /// Input pin whose level is set by the test
    #[derive(Default)]
    pub struct MockPin {
        high: Cell<bool>,
        fail: Cell<bool>,
    }

    impl MockPin {
        pub fn new(high: bool) -> Self {
            Self {
                high: Cell::new(high),
                fail: Cell::new(false),
            }
        }

        pub fn set_high(&self, high: bool) {
            self.high.set(high);
        }

        /// Make subsequent reads fail
        pub fn set_failing(&self, fail: bool) {
            self.fail.set(fail);
        }
    }

    /// Read error reported by a failing [`MockPin`]
    #[derive(Debug)]
    pub struct MockPinError;

    impl embedded_hal::digital::Error for MockPinError {
        fn kind(&self) -> embedded_hal::digital::ErrorKind {
            embedded_hal::digital::ErrorKind::Other
        }
    }

    impl ErrorType for MockPin {
        type Error = MockPinError;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.fail.get() {
                return Err(MockPinError);
            }
            Ok(self.high.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    // `&MockPin` takes its error type from embedded-hal's blanket impl
    impl InputPin for &MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.fail.get() {
                return Err(MockPinError);
            }
            Ok(self.high.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }
}
