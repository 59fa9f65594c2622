//! Mode and layout behavior tests on a virtual clock

#[cfg(test)]
mod tests {
    use morsepad_core::test_utils::{EventRecorder, Recorded, Script};
    use morsepad_core::{
        Element, IambicKeyer, IambicMode, KeyerConfig, PaddleLayout, PaddleSide, StraightKeyer,
    };
    use rstest::rstest;

    fn iambic(mode: IambicMode, layout: PaddleLayout) -> IambicKeyer<EventRecorder> {
        let config = KeyerConfig {
            iambic_mode: mode,
            paddle_layout: layout,
            ..KeyerConfig::default()
        };
        IambicKeyer::new(config, EventRecorder::new()).unwrap()
    }

    #[rstest]
    #[case(PaddleLayout::Normal, PaddleSide::Left, Element::Dot)]
    #[case(PaddleLayout::Normal, PaddleSide::Right, Element::Dash)]
    #[case(PaddleLayout::Reversed, PaddleSide::Left, Element::Dash)]
    #[case(PaddleLayout::Reversed, PaddleSide::Right, Element::Dot)]
    fn test_layout_maps_single_paddle(
        #[case] layout: PaddleLayout,
        #[case] side: PaddleSide,
        #[case] expected: Element,
        #[values(IambicMode::A, IambicMode::B)] mode: IambicMode,
    ) {
        let mut keyer = iambic(mode, layout);
        Script::new().paddle(side, 0, 10).run(&mut keyer);
        assert_eq!(keyer.observer().started(), [expected]);
    }

    #[rstest]
    #[case(IambicMode::A, ".")]
    #[case(IambicMode::B, ".-")]
    fn test_brief_squeeze_by_mode(#[case] mode: IambicMode, #[case] expected: &str) {
        let mut keyer = iambic(mode, PaddleLayout::Normal);
        Script::new()
            .paddle(PaddleSide::Left, 0, 40)
            .paddle(PaddleSide::Right, 20, 30)
            .run(&mut keyer);
        assert_eq!(keyer.buffer(), format!("{} / ", expected));
    }

    #[rstest]
    #[case(IambicMode::A, PaddleLayout::Normal, ".-. / ")]
    #[case(IambicMode::B, PaddleLayout::Normal, ".-.- / ")]
    #[case(IambicMode::A, PaddleLayout::Reversed, "-.- / ")]
    #[case(IambicMode::B, PaddleLayout::Reversed, "-.-. / ")]
    fn test_held_squeeze_by_mode_and_layout(
        #[case] mode: IambicMode,
        #[case] layout: PaddleLayout,
        #[case] expected: &str,
    ) {
        let mut keyer = iambic(mode, layout);
        Script::new()
            .paddle(PaddleSide::Left, 0, 380)
            .paddle(PaddleSide::Right, 1, 380)
            .run(&mut keyer);
        assert_eq!(keyer.buffer(), expected);
    }

    #[rstest]
    fn test_held_paddle_self_repeats(#[values(IambicMode::A, IambicMode::B)] mode: IambicMode) {
        let mut keyer = iambic(mode, PaddleLayout::Normal);
        // dots start at 0, 120, 240, 360; released during the fourth
        Script::new().paddle(PaddleSide::Left, 0, 400).run(&mut keyer);
        assert_eq!(keyer.decoded().as_str(), "H ");
    }

    #[rstest]
    fn test_layout_change_applies_to_next_element() {
        let mut keyer = iambic(IambicMode::B, PaddleLayout::Normal);
        let clock = Script::new().paddle(PaddleSide::Left, 0, 10).run(&mut keyer);
        assert_eq!(clock.elapsed_ms(), 540);

        keyer.set_layout(PaddleLayout::Reversed);
        keyer.left_paddle_press(clock.now());
        assert_eq!(keyer.sequence(), "-");
    }

    #[rstest]
    #[case(20.0, 119, Element::Dot)]
    #[case(20.0, 120, Element::Dash)]
    #[case(10.0, 239, Element::Dot)]
    #[case(10.0, 240, Element::Dash)]
    fn test_straight_key_threshold(#[case] wpm: f64, #[case] held: u64, #[case] expected: Element) {
        let config = KeyerConfig::default().with_wpm(wpm);
        let mut keyer = StraightKeyer::new(config, EventRecorder::new()).unwrap();
        Script::new().key(0, held).run(&mut keyer);
        assert_eq!(keyer.observer().count(|e| matches!(e, Recorded::KeyUp(_))), 1);
        assert_eq!(keyer.observer().element_scores()[0].record.element, expected);
    }

    #[rstest]
    fn test_straight_key_words() {
        let mut keyer = StraightKeyer::new(KeyerConfig::default(), EventRecorder::new()).unwrap();
        // "TE E": dash, character gap, dot, word gap, dot
        Script::new()
            .key(0, 180)
            .key(500, 560)
            .key(1200, 1260)
            .run(&mut keyer);
        assert_eq!(keyer.buffer(), "- . / . / ");
        assert_eq!(keyer.decoded().as_str(), "TE E ");
        assert_eq!(keyer.observer().characters(), "TEE");
    }
}
