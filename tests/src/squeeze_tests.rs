//! Squeeze operation tests for both iambic modes, run in paused tokio time

#[cfg(test)]
mod tests {
    use crate::play;
    use morsepad_core::test_utils::EventRecorder;
    use morsepad_core::{Element, IambicKeyer, IambicMode, InputEvent, KeyerConfig};

    fn keyer(mode: IambicMode) -> IambicKeyer<EventRecorder> {
        let config = KeyerConfig {
            iambic_mode: mode,
            ..KeyerConfig::default()
        };
        IambicKeyer::new(config, EventRecorder::new()).unwrap()
    }

    /// Both paddles held for two element cycles at 20 WPM, then released
    fn held_squeeze() -> Vec<(u64, InputEvent)> {
        vec![
            (0, InputEvent::LeftDown),
            (1, InputEvent::RightDown),
            (380, InputEvent::LeftUp),
            (380, InputEvent::RightUp),
        ]
    }

    /// Dash paddle tapped while a dot is sounding, everything released early
    fn brief_squeeze() -> Vec<(u64, InputEvent)> {
        vec![
            (0, InputEvent::LeftDown),
            (20, InputEvent::RightDown),
            (30, InputEvent::RightUp),
            (40, InputEvent::LeftUp),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_a_held_squeeze_stops_after_element_in_flight() {
        let keyer = play(keyer(IambicMode::A), held_squeeze()).await;
        assert_eq!(
            keyer.observer().started(),
            [Element::Dot, Element::Dash, Element::Dot]
        );
        assert_eq!(keyer.decoded().as_str(), "R ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_b_held_squeeze_adds_memory_element() {
        // Released at 380 during the third element; the squeeze was still
        // held when that element began, so one more dash follows
        let keyer = play(keyer(IambicMode::B), held_squeeze()).await;
        assert_eq!(
            keyer.observer().started(),
            [Element::Dot, Element::Dash, Element::Dot, Element::Dash]
        );
        assert_eq!(keyer.buffer(), ".-.- / ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_b_brief_squeeze_memory() {
        let keyer = play(keyer(IambicMode::B), brief_squeeze()).await;
        assert_eq!(keyer.observer().started(), [Element::Dot, Element::Dash]);
        assert_eq!(keyer.observer().characters(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_a_brief_squeeze_no_memory() {
        let keyer = play(keyer(IambicMode::A), brief_squeeze()).await;
        assert_eq!(keyer.observer().started(), [Element::Dot]);
        assert_eq!(keyer.observer().characters(), "E");
    }

    #[tokio::test(start_paused = true)]
    async fn test_squeeze_state_notifications() {
        let keyer = play(keyer(IambicMode::B), held_squeeze()).await;
        assert_eq!(keyer.observer().squeeze_changes(), [true, false]);
        assert!(!keyer.is_squeezing());
        assert!(!keyer.is_sending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dash_first_squeeze() {
        let script = vec![
            (0, InputEvent::RightDown),
            (50, InputEvent::LeftDown),
            (200, InputEvent::RightUp),
            (200, InputEvent::LeftUp),
        ];
        let keyer = play(keyer(IambicMode::B), script).await;
        // dash, then the memory dot; released before the dot starts
        assert_eq!(keyer.observer().started(), [Element::Dash, Element::Dot]);
        assert_eq!(keyer.observer().characters(), "N");
    }
}
