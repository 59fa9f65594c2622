//! Paddle contact state for the iambic keyer

use crate::types::{Element, PaddleLayout, PaddleSide};

/// Current state of both paddles and the layout that maps them to elements.
///
/// Flags are set directly by device edges; nothing is debounced here.
#[derive(Copy, Clone, Debug, Default)]
pub struct PaddleState {
    left_down: bool,
    right_down: bool,
    squeezing: bool,
    layout: PaddleLayout,
}

impl PaddleState {
    /// Create with both paddles released
    pub const fn new(layout: PaddleLayout) -> Self {
        Self {
            left_down: false,
            right_down: false,
            squeezing: false,
            layout,
        }
    }

    /// Mark a paddle as pressed. Returns false if it already was.
    pub fn press(&mut self, side: PaddleSide) -> bool {
        let flag = self.flag_mut(side);
        let changed = !*flag;
        *flag = true;
        changed
    }

    /// Mark a paddle as released. Returns false if it already was.
    pub fn release(&mut self, side: PaddleSide) -> bool {
        let flag = self.flag_mut(side);
        let changed = *flag;
        *flag = false;
        changed
    }

    pub fn is_down(&self, side: PaddleSide) -> bool {
        match side {
            PaddleSide::Left => self.left_down,
            PaddleSide::Right => self.right_down,
        }
    }

    pub fn left(&self) -> bool {
        self.left_down
    }

    pub fn right(&self) -> bool {
        self.right_down
    }

    /// Check if both paddles are pressed (squeeze condition)
    pub fn both_down(&self) -> bool {
        self.left_down && self.right_down
    }

    pub fn any_down(&self) -> bool {
        self.left_down || self.right_down
    }

    /// Element a paddle sends under the current layout
    pub fn element_for(&self, side: PaddleSide) -> Element {
        self.layout.element_for(side)
    }

    /// Element of the only pressed paddle, if exactly one is pressed
    pub fn single_element(&self) -> Option<Element> {
        match (self.left_down, self.right_down) {
            (true, false) => Some(self.element_for(PaddleSide::Left)),
            (false, true) => Some(self.element_for(PaddleSide::Right)),
            _ => None,
        }
    }

    /// Last reported squeeze state
    pub fn is_squeezing(&self) -> bool {
        self.squeezing
    }

    /// Recompute the squeeze state; returns the new value if it changed
    pub fn refresh_squeeze(&mut self) -> Option<bool> {
        let now = self.both_down();
        if now == self.squeezing {
            return None;
        }
        self.squeezing = now;
        Some(now)
    }

    pub fn layout(&self) -> PaddleLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: PaddleLayout) {
        self.layout = layout;
    }

    /// Release both paddles
    pub fn reset(&mut self) {
        self.left_down = false;
        self.right_down = false;
        self.squeezing = false;
    }

    fn flag_mut(&mut self, side: PaddleSide) -> &mut bool {
        match side {
            PaddleSide::Left => &mut self.left_down,
            PaddleSide::Right => &mut self.right_down,
        }
    }
}
