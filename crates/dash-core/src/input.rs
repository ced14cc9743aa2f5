//! Player input sampled once per frame.

/// Input for a single world step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// True only on the step the jump key went down.
    pub jump_pressed: bool,
}

impl InputState {
    pub const NONE: Self = Self {
        jump_pressed: false,
    };

    pub const JUMP: Self = Self { jump_pressed: true };
}

/// Turns raw key up/down events into "pressed this frame" input.
///
/// Key repeat while the key is held does not produce further presses.
#[derive(Debug, Clone, Default)]
pub struct JumpLatch {
    down: bool,
    pressed_edge: bool,
}

impl JumpLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self) {
        if !self.down {
            self.pressed_edge = true;
        }
        self.down = true;
    }

    pub fn key_up(&mut self) {
        self.down = false;
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Returns the input for this frame and clears the pending edge.
    pub fn sample(&mut self) -> InputState {
        let pressed = std::mem::take(&mut self.pressed_edge);
        InputState {
            jump_pressed: pressed,
        }
    }
}
