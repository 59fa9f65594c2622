//! Driver loop tests with tokio's clock

use std::time::Duration;

use heapless::spsc::Queue;
use morsepad_core::test_utils::{EventRecorder, Recorded};
use morsepad_core::{
    calculate, IambicKeyer, InputEvent, Keyer, KeyerConfig, StraightKeyer, TimingEvaluator,
};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use crate::{play, spawn_script, RealtimeDriver};

#[tokio::test(start_paused = true)]
async fn test_async_timer_basic() {
    let start = Instant::now();
    time::sleep(Duration::from_millis(60)).await;
    // Paused clock advances exactly
    assert_eq!(start.elapsed(), Duration::from_millis(60));
}

#[tokio::test(start_paused = true)]
async fn test_straight_keyer_sends_cq() {
    // C -.-.  Q --.-  at 20 WPM with hand-sent timing
    let mut script = Vec::new();
    let mut t = 0;
    for (code, gap_after) in [("-.-.", 240), ("--.-", 0)] {
        for (i, symbol) in code.chars().enumerate() {
            let held = if symbol == '.' { 60 } else { 180 };
            script.push((t, InputEvent::KeyDown));
            script.push((t + held, InputEvent::KeyUp));
            t += held + if i + 1 < code.len() { 60 } else { 60 + gap_after };
        }
    }

    let keyer = StraightKeyer::new(KeyerConfig::default(), EventRecorder::new()).unwrap();
    let keyer = play(keyer, script).await;
    assert_eq!(keyer.buffer(), "-.-. --.- / ");
    assert_eq!(keyer.observer().characters(), "CQ");
}

#[tokio::test(start_paused = true)]
async fn test_driver_finishes_after_last_timer() {
    let keyer = IambicKeyer::new(KeyerConfig::default(), ()).unwrap();
    let driver = RealtimeDriver::new(keyer);
    let epoch = driver.epoch();
    let events = spawn_script(
        epoch,
        vec![(0, InputEvent::LeftDown), (30, InputEvent::LeftUp)],
    );
    let driver = driver.run(events).await;

    // dot ends at 120, word gap 420ms later
    assert_eq!(epoch.elapsed(), Duration::from_millis(540));
    assert_eq!(driver.keyer().buffer(), ". / ");
}

#[tokio::test(start_paused = true)]
async fn test_idle_driver_wakes_at_poll_interval() {
    let keyer = StraightKeyer::new(KeyerConfig::default(), ()).unwrap();
    let driver = RealtimeDriver::with_poll_interval(keyer, Duration::from_millis(25));
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(110)).await;
        drop(tx);
    });
    let driver = driver.run(rx).await;
    // 25, 50, 75 and 100ms; the channel closes at 110
    assert_eq!(driver.wakeups(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_evaluator_observes_live_session() {
    let config = KeyerConfig::default();
    let keyer = StraightKeyer::new(config, (EventRecorder::new(), TimingEvaluator::new())).unwrap();
    // dot 72ms (20% long), gap 180ms, dash 180ms
    let script = vec![
        (0, InputEvent::KeyDown),
        (72, InputEvent::KeyUp),
        (252, InputEvent::KeyDown),
        (432, InputEvent::KeyUp),
    ];
    let keyer = play(keyer, script).await;
    let (recorder, evaluator) = keyer.into_observer();

    let summary = evaluator.summary();
    assert_eq!(summary.elements.count, 2);
    assert!((summary.dots.average_accuracy - 80.0).abs() < 1e-9);
    assert_eq!(summary.dashes.average_accuracy, 100.0);
    assert_eq!(summary.character_gaps.count, 1);
    assert_eq!(recorder.count(|e| matches!(e, Recorded::ElementEvaluated(_))), 2);

    let timings = calculate(20.0, false).unwrap();
    assert_eq!(evaluator.elements()[1].record.expected_ms, timings.dash);
}

#[tokio::test(start_paused = true)]
async fn test_spsc_queue_hand_off() {
    // Sampler side enqueues edges, keyer side drains on each 10ms tick
    let mut queue: Queue<InputEvent, 8> = Queue::new();
    let (mut producer, mut consumer) = queue.split();
    let script = [(0, InputEvent::KeyDown), (180, InputEvent::KeyUp)];
    let mut keyer = StraightKeyer::new(KeyerConfig::default(), EventRecorder::new()).unwrap();
    let epoch = Instant::now();
    let mut next = 0;

    for tick in 0..100u64 {
        let ms = tick * 10;
        time::sleep_until(epoch + Duration::from_millis(ms)).await;
        while next < script.len() && script[next].0 <= ms {
            producer.enqueue(script[next].1).unwrap();
            next += 1;
        }

        let now = morsepad_core::Instant::from_millis(epoch.elapsed().as_millis() as u64);
        while let Some(event) = consumer.dequeue() {
            keyer.handle(event, now);
        }
        Keyer::poll(&mut keyer, now);
    }

    assert_eq!(keyer.buffer(), "- / ");
    assert_eq!(keyer.observer().characters(), "T");
}

#[test]
fn test_block_on_short_session() {
    let keyer = tokio_test::block_on(async {
        time::pause();
        let keyer = IambicKeyer::new(KeyerConfig::default(), EventRecorder::new()).unwrap();
        play(keyer, vec![(0, InputEvent::RightDown), (10, InputEvent::RightUp)]).await
    });
    assert_eq!(keyer.observer().characters(), "T");
}
