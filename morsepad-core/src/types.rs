//! Core data types for the practice keyers

/// Morse code elements
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// Dot (short element, one unit)
    Dot,
    /// Dash (long element, three units)
    Dash,
}

impl Element {
    /// Returns the duration of this element in units
    pub const fn duration_units(&self) -> u32 {
        match self {
            Element::Dot => 1,
            Element::Dash => 3,
        }
    }

    /// Returns the opposite element (Dot <-> Dash)
    pub const fn opposite(&self) -> Element {
        match self {
            Element::Dot => Element::Dash,
            Element::Dash => Element::Dot,
        }
    }

    /// Symbol used in sequence and buffer strings
    pub const fn symbol(&self) -> char {
        match self {
            Element::Dot => '.',
            Element::Dash => '-',
        }
    }

    /// Parse a sequence symbol back into an element
    pub const fn from_symbol(symbol: char) -> Option<Element> {
        match symbol {
            '.' => Some(Element::Dot),
            '-' => Some(Element::Dash),
            _ => None,
        }
    }
}

/// Iambic squeeze behavior
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IambicMode {
    /// Mode A: alternation only while both paddles are held
    A,
    /// Mode B: one extra alternated element after a squeeze is released
    #[default]
    B,
}

impl IambicMode {
    /// Returns true if this mode remembers a squeeze after release
    pub const fn has_memory(&self) -> bool {
        matches!(self, IambicMode::B)
    }
}

/// Physical paddle identification
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleSide {
    Left,
    Right,
}

impl PaddleSide {
    /// Returns the opposite paddle side
    pub const fn opposite(&self) -> PaddleSide {
        match self {
            PaddleSide::Left => PaddleSide::Right,
            PaddleSide::Right => PaddleSide::Left,
        }
    }
}

/// Which paddle produces which element
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleLayout {
    /// Left paddle sends dots, right paddle sends dashes
    #[default]
    Normal,
    /// Left paddle sends dashes, right paddle sends dots
    Reversed,
}

impl PaddleLayout {
    /// Map a paddle to the element it sends under this layout.
    ///
    /// Every paddle-to-element decision in the iambic keyer goes through here.
    pub const fn element_for(&self, side: PaddleSide) -> Element {
        match (self, side) {
            (PaddleLayout::Normal, PaddleSide::Left) | (PaddleLayout::Reversed, PaddleSide::Right) => {
                Element::Dot
            }
            (PaddleLayout::Normal, PaddleSide::Right) | (PaddleLayout::Reversed, PaddleSide::Left) => {
                Element::Dash
            }
        }
    }
}

/// Edge-triggered device input
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Straight key closed
    KeyDown,
    /// Straight key opened
    KeyUp,
    LeftDown,
    LeftUp,
    RightDown,
    RightUp,
}

impl InputEvent {
    /// Build the paddle event for a side and contact state
    pub const fn paddle(side: PaddleSide, pressed: bool) -> Self {
        match (side, pressed) {
            (PaddleSide::Left, true) => InputEvent::LeftDown,
            (PaddleSide::Left, false) => InputEvent::LeftUp,
            (PaddleSide::Right, true) => InputEvent::RightDown,
            (PaddleSide::Right, false) => InputEvent::RightUp,
        }
    }
}

/// Errors raised by the timing engine
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyerError {
    /// WPM must be a finite number greater than zero
    InvalidWpm(f64),
}

impl core::fmt::Display for KeyerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            KeyerError::InvalidWpm(wpm) => write!(f, "invalid WPM {}: must be greater than zero", wpm),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KeyerError {}

/// Keyer configuration parameters
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyerConfig {
    /// Sending speed in words per minute (PARIS)
    pub wpm: f64,
    /// Shorten character and word gaps to 90%
    pub shorten_gaps: bool,
    /// Squeeze behavior for the iambic keyer
    pub iambic_mode: IambicMode,
    /// Paddle-to-element mapping for the iambic keyer
    pub paddle_layout: PaddleLayout,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            wpm: 20.0,
            shorten_gaps: false,
            iambic_mode: IambicMode::B,
            paddle_layout: PaddleLayout::Normal,
        }
    }
}

impl KeyerConfig {
    /// Create a new configuration with validation
    pub fn new(
        wpm: f64,
        shorten_gaps: bool,
        iambic_mode: IambicMode,
        paddle_layout: PaddleLayout,
    ) -> Result<Self, KeyerError> {
        let config = Self {
            wpm,
            shorten_gaps,
            iambic_mode,
            paddle_layout,
        };
        config.timings()?;
        Ok(config)
    }

    /// Copy of this configuration at a different speed
    pub fn with_wpm(self, wpm: f64) -> Self {
        Self { wpm, ..self }
    }

    /// Derive element and gap durations for this configuration
    pub fn timings(&self) -> Result<crate::timing::Timings, KeyerError> {
        crate::timing::calculate(self.wpm, self.shorten_gaps)
    }
}
