//! Device-agnostic keyer interface and the async driver loop

use crate::fsm::IambicKeyer;
use crate::hal::Instant;
use crate::observer::KeyerObserver;
use crate::straight::StraightKeyer;
use crate::timer::{KeyerTimer, Scheduler};
use crate::types::{InputEvent, PaddleSide};

/// A keyer driven by edge events and a clock
pub trait Keyer {
    /// Apply one input edge observed at `now`.
    ///
    /// Events for a different device type are ignored.
    fn handle(&mut self, event: InputEvent, now: Instant);

    /// Fire every timer due at or before `now`
    fn poll(&mut self, now: Instant);

    /// When `poll` next has work to do
    fn next_deadline(&self) -> Option<Instant>;

    /// Cancel all pending work
    fn destroy(&mut self);

    /// Elements keyed since the last commit
    fn sequence(&self) -> &str;

    /// Committed Morse groups
    fn buffer(&self) -> &str;
}

impl<O, S, const SEQ: usize, const BUF: usize> Keyer for StraightKeyer<O, S, SEQ, BUF>
where
    O: KeyerObserver,
    S: Scheduler<KeyerTimer>,
{
    fn handle(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::KeyDown => self.key_press(now),
            InputEvent::KeyUp => self.key_release(now),
            _ => {
                #[cfg(feature = "defmt")]
                defmt::trace!("straight keyer ignoring {}", event);
            }
        }
    }

    fn poll(&mut self, now: Instant) {
        StraightKeyer::poll(self, now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        StraightKeyer::next_deadline(self)
    }

    fn destroy(&mut self) {
        StraightKeyer::destroy(self);
    }

    fn sequence(&self) -> &str {
        StraightKeyer::sequence(self)
    }

    fn buffer(&self) -> &str {
        StraightKeyer::buffer(self)
    }
}

impl<O, S, const SEQ: usize, const BUF: usize> Keyer for IambicKeyer<O, S, SEQ, BUF>
where
    O: KeyerObserver,
    S: Scheduler<KeyerTimer>,
{
    fn handle(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::LeftDown => self.paddle_press(PaddleSide::Left, now),
            InputEvent::LeftUp => self.paddle_release(PaddleSide::Left, now),
            InputEvent::RightDown => self.paddle_press(PaddleSide::Right, now),
            InputEvent::RightUp => self.paddle_release(PaddleSide::Right, now),
            InputEvent::KeyDown | InputEvent::KeyUp => {
                #[cfg(feature = "defmt")]
                defmt::trace!("iambic keyer ignoring {}", event);
            }
        }
    }

    fn poll(&mut self, now: Instant) {
        IambicKeyer::poll(self, now);
    }

    fn next_deadline(&self) -> Option<Instant> {
        IambicKeyer::next_deadline(self)
    }

    fn destroy(&mut self) {
        IambicKeyer::destroy(self);
    }

    fn sequence(&self) -> &str {
        IambicKeyer::sequence(self)
    }

    fn buffer(&self) -> &str {
        IambicKeyer::buffer(self)
    }
}

/// Async task feeding queued input edges to a keyer and firing its timers.
///
/// Sleeps until the keyer's next deadline, or at most `poll_interval` so new
/// input is picked up promptly.
#[cfg(feature = "embassy-time")]
pub async fn keyer_task<K: Keyer, const N: usize>(
    keyer: &mut K,
    mut events: heapless::spsc::Consumer<'_, InputEvent, N>,
    poll_interval: embassy_time::Duration,
) -> ! {
    use embassy_time::Timer;

    loop {
        while let Some(event) = events.dequeue() {
            keyer.handle(event, Instant::now());
        }
        let now = Instant::now();
        keyer.poll(now);

        let idle_wake = now + poll_interval;
        let wake = match keyer.next_deadline() {
            Some(deadline) if deadline < idle_wake => deadline,
            _ => idle_wake,
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("keyer sleeping until {}", wake.as_millis());

        Timer::at(wake).await;
    }
}

/// Async task sampling contacts and queueing their edges for [`keyer_task`].
///
/// Read errors are logged and the contact is retried on the next tick.
#[cfg(feature = "embassy-time")]
pub async fn contact_task<P, const C: usize, const N: usize>(
    contacts: &mut [crate::hal::PaddleContact<P>; C],
    mut events: heapless::spsc::Producer<'_, InputEvent, N>,
    sample_interval: embassy_time::Duration,
) -> !
where
    P: embedded_hal::digital::InputPin,
{
    use embassy_time::Ticker;

    let mut ticker = Ticker::every(sample_interval);
    loop {
        for contact in contacts.iter_mut() {
            match contact.sample() {
                Ok(Some(event)) => {
                    if events.enqueue(event).is_err() {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("input queue full, dropping {}", event);
                    }
                }
                Ok(None) => {}
                Err(_error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("contact read failed: {}", _error);
                }
            }
        }
        ticker.next().await;
    }
}
