//! Property tests for timings, codec and scoring

use morsepad_core::codec::{morse_to_text, text_to_morse};
use morsepad_core::test_utils::{EventRecorder, Script};
use morsepad_core::{
    calculate, classify_element, evaluate, Element, IambicKeyer, IambicMode, Instant,
    KeyerConfig, PaddleSide, SpacingRecord, SpacingType, StraightKeyer, TimingRecord,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn timings_scale_with_wpm(wpm in 1.0f64..80.0, shorten in any::<bool>()) {
        let t = calculate(wpm, shorten).unwrap();
        prop_assert!((t.dot - 1200.0 / wpm).abs() < 1e-9);
        prop_assert!((t.dash - 3.0 * t.dot).abs() < 1e-9);
        prop_assert_eq!(t.element_gap, t.dot);
        let factor = if shorten { 0.9 } else { 1.0 };
        prop_assert!((t.char_gap - 3.0 * t.dot * factor).abs() < 1e-9);
        prop_assert!((t.word_gap - 7.0 * t.dot * factor).abs() < 1e-9);
    }

    #[test]
    fn non_positive_wpm_rejected(wpm in -1000.0f64..=0.0) {
        prop_assert!(calculate(wpm, false).is_err());
    }

    #[test]
    fn classification_threshold(dot in 10.0f64..200.0, press in 0.0f64..1000.0) {
        let expected = if press < dot * 1.5 { Element::Dot } else { Element::Dash };
        prop_assert_eq!(classify_element(press, dot), expected);
    }

    #[test]
    fn codec_round_trip(text in "[A-Z0-9]{1,8}( [A-Z0-9]{1,8}){0,3}") {
        let morse = text_to_morse(&text);
        prop_assert_eq!(morse_to_text(morse.split(' ')), text);
    }

    #[test]
    fn accuracy_bounded(actual in 0.0f64..5000.0, expected in 0.0f64..1000.0) {
        let timings = calculate(20.0, false).unwrap();
        let mut record = TimingRecord::new(Element::Dot, actual, &timings, Instant::from_millis(0));
        record.expected_ms = expected;
        let e = evaluate(record);
        prop_assert!(e.accuracy >= 0.0);
        prop_assert!(e.accuracy <= 100.0);
        prop_assert!(e.absolute_error >= 0.0);
    }

    #[test]
    fn spacing_classes(gap in 0.0f64..2000.0) {
        let timings = calculate(20.0, false).unwrap();
        let record = SpacingRecord::classify(gap, &timings, Instant::from_millis(0));
        let class = if gap < 120.0 {
            SpacingType::Element
        } else if gap < 300.0 {
            SpacingType::Character
        } else {
            SpacingType::Word
        };
        prop_assert_eq!(record.spacing, class);
    }

    #[test]
    fn straight_key_presses_all_recorded(presses in prop::collection::vec(1u64..400, 1..12)) {
        // Presses separated by short gaps form one pending character
        let mut script = Script::new();
        let mut t = 0;
        for held in &presses {
            script = script.key(t, t + held);
            t += held + 60;
        }
        let mut keyer = StraightKeyer::new(KeyerConfig::default(), EventRecorder::new()).unwrap();
        script.run(&mut keyer);

        let expected: String = presses
            .iter()
            .map(|&held| if held < 120 { '.' } else { '-' })
            .collect();
        prop_assert_eq!(keyer.buffer(), format!("{} / ", expected));
        prop_assert!(keyer.next_deadline().is_none());
    }

    #[test]
    fn iambic_always_returns_to_idle(
        events in prop::collection::vec((0u64..50, any::<bool>(), any::<bool>()), 1..20),
        mode_b in any::<bool>(),
    ) {
        let config = KeyerConfig {
            iambic_mode: if mode_b { IambicMode::B } else { IambicMode::A },
            ..KeyerConfig::default()
        };
        let mut keyer = IambicKeyer::new(config, EventRecorder::new()).unwrap();
        let mut script = Script::new();
        let mut t = 0;
        for (step, left, pressed) in events {
            t += step;
            let side = if left { PaddleSide::Left } else { PaddleSide::Right };
            script = script.at(t, morsepad_core::InputEvent::paddle(side, pressed));
        }
        // Release everything at the end
        t += 1;
        script = script
            .at(t, morsepad_core::InputEvent::LeftUp)
            .at(t, morsepad_core::InputEvent::RightUp);
        script.run(&mut keyer);

        prop_assert!(!keyer.is_sending());
        prop_assert_eq!(keyer.sequence(), "");
        prop_assert!(keyer.buffer().is_empty() || keyer.buffer().ends_with("/ "));
        prop_assert!(keyer.buffer().chars().all(|c| matches!(c, '.' | '-' | ' ' | '/')));
    }
}
