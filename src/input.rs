//! Input source
//!
//! The simulation only asks whether a control is currently held. Polling the
//! real keyboard is the platform's job; it mirrors key state into an
//! [`InputState`] before each frame.

use std::cell::Cell;

/// Controls the simulation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Move the paddle left
    Left,
    /// Move the paddle right
    Right,
    /// Freeze the level while held
    Pause,
}

/// Answers "is this control held right now"
pub trait KeyboardSensor {
    fn is_pressed(&self, control: Control) -> bool;
}

/// Held-control state shared between the platform layer and the simulation
#[derive(Debug, Default)]
pub struct InputState {
    left: Cell<bool>,
    right: Cell<bool>,
    pause: Cell<bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, control: Control) -> &Cell<bool> {
        match control {
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Pause => &self.pause,
        }
    }

    pub fn set(&self, control: Control, held: bool) {
        self.cell(control).set(held);
    }

    pub fn press(&self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&self, control: Control) {
        self.set(control, false);
    }

    pub fn release_all(&self) {
        self.left.set(false);
        self.right.set(false);
        self.pause.set(false);
    }
}

impl KeyboardSensor for InputState {
    fn is_pressed(&self, control: Control) -> bool {
        self.cell(control).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let input = InputState::new();
        assert!(!input.is_pressed(Control::Left));

        input.press(Control::Left);
        input.press(Control::Pause);
        assert!(input.is_pressed(Control::Left));
        assert!(!input.is_pressed(Control::Right));

        input.release(Control::Left);
        assert!(!input.is_pressed(Control::Left));
        assert!(input.is_pressed(Control::Pause));

        input.release_all();
        assert!(!input.is_pressed(Control::Pause));
    }
}
