//! Control source resolution
//!
//! Exactly one source steers the paddle each frame: keyboard, pointer, or
//! the AI controller. The UI layer records raw events into [`ControlState`];
//! [`ControlState::frame_input`] folds them into the single `TickInput` the
//! simulation consumes, so precedence lives in one place.

use crate::clamp_paddle_x;
use crate::consts::CANVAS_WIDTH;
use crate::sim::TickInput;

/// Which source steers the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    #[default]
    Keyboard,
    Pointer,
    Ai,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Keyboard => "keyboard",
            ControlMode::Pointer => "pointer",
            ControlMode::Ai => "ai",
        }
    }
}

/// Accumulated raw input, owned by the UI layer and read once per frame
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub mode: ControlMode,
    pub left_pressed: bool,
    pub right_pressed: bool,
    /// Pointer x in playfield coordinates; switching to pointer mode
    /// happens on the first move event
    pub pointer_x: Option<f32>,
    /// Target left edge published by the AI orchestrator
    pub ai_target: Option<f32>,
    /// Latched start/fire events, consumed by the next frame
    pub start_requested: bool,
    pub fire_held: bool,
}

impl ControlState {
    /// Fold the current raw input into one frame's worth of commands.
    ///
    /// While AI mode is active, keyboard and pointer input is ignored so
    /// the two sources never fight over the paddle.
    pub fn frame_input(&mut self, paddle_width: f32) -> TickInput {
        let start = std::mem::take(&mut self.start_requested);

        let mut input = TickInput {
            start,
            fire: self.fire_held,
            ..Default::default()
        };

        match self.mode {
            ControlMode::Ai => {
                input.seek_target = self.ai_target;
            }
            ControlMode::Pointer => {
                // Pointer position maps to paddle center, clamped in-bounds
                input.snap_target = self.pointer_x.map(|x| {
                    clamp_paddle_x(x - paddle_width / 2.0, CANVAS_WIDTH, paddle_width)
                });
            }
            ControlMode::Keyboard => {
                let dir = (self.right_pressed as i8) - (self.left_pressed as i8);
                input.move_dir = dir;
            }
        }
        input
    }

    /// Keyboard activity demotes pointer mode back to keyboard
    pub fn key_down(&mut self, left: bool) {
        if self.mode == ControlMode::Pointer {
            self.mode = ControlMode::Keyboard;
        }
        if left {
            self.left_pressed = true;
        } else {
            self.right_pressed = true;
        }
    }

    pub fn key_up(&mut self, left: bool) {
        if left {
            self.left_pressed = false;
        } else {
            self.right_pressed = false;
        }
    }

    /// Pointer movement takes over steering unless the AI holds the paddle
    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
        if self.mode == ControlMode::Keyboard {
            self.mode = ControlMode::Pointer;
        }
    }

    /// Enter or leave AI mode; leaving returns to keyboard steering
    pub fn set_ai(&mut self, enabled: bool) {
        if enabled {
            self.mode = ControlMode::Ai;
        } else if self.mode == ControlMode::Ai {
            self.mode = ControlMode::Keyboard;
            self.ai_target = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PADDLE_WIDTH;

    #[test]
    fn keyboard_direction_resolves_both_keys() {
        let mut control = ControlState::default();
        control.key_down(true);
        assert_eq!(control.frame_input(PADDLE_WIDTH).move_dir, -1);
        control.key_down(false);
        // Both held cancel out
        assert_eq!(control.frame_input(PADDLE_WIDTH).move_dir, 0);
        control.key_up(true);
        assert_eq!(control.frame_input(PADDLE_WIDTH).move_dir, 1);
    }

    #[test]
    fn pointer_takes_over_and_centers_paddle() {
        let mut control = ControlState::default();
        control.pointer_moved(240.0);
        assert_eq!(control.mode, ControlMode::Pointer);
        let input = control.frame_input(PADDLE_WIDTH);
        assert_eq!(input.snap_target, Some(240.0 - PADDLE_WIDTH / 2.0));
    }

    #[test]
    fn pointer_target_is_clamped() {
        let mut control = ControlState::default();
        control.pointer_moved(-50.0);
        let input = control.frame_input(PADDLE_WIDTH);
        assert_eq!(input.snap_target, Some(0.0));
        control.pointer_moved(CANVAS_WIDTH + 50.0);
        let input = control.frame_input(PADDLE_WIDTH);
        assert_eq!(input.snap_target, Some(CANVAS_WIDTH - PADDLE_WIDTH));
    }

    #[test]
    fn ai_mode_suppresses_manual_input() {
        let mut control = ControlState::default();
        control.set_ai(true);
        control.key_down(true);
        control.pointer_moved(100.0);
        control.ai_target = Some(300.0);

        let input = control.frame_input(PADDLE_WIDTH);
        assert_eq!(input.seek_target, Some(300.0));
        assert_eq!(input.move_dir, 0);
        assert_eq!(input.snap_target, None);
        // Still AI mode despite the pointer event
        assert_eq!(control.mode, ControlMode::Ai);
    }

    #[test]
    fn leaving_ai_mode_returns_to_keyboard() {
        let mut control = ControlState::default();
        control.set_ai(true);
        control.ai_target = Some(300.0);
        control.set_ai(false);
        assert_eq!(control.mode, ControlMode::Keyboard);
        assert_eq!(control.ai_target, None);
    }

    #[test]
    fn start_request_is_consumed_once() {
        let mut control = ControlState::default();
        control.start_requested = true;
        assert!(control.frame_input(PADDLE_WIDTH).start);
        assert!(!control.frame_input(PADDLE_WIDTH).start);
    }
}
