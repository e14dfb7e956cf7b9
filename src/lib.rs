//! Neo Breakout - a browser Breakout clone with an AI paddle controller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `ai`: Paddle decision engine (remote endpoint client + local personalities)
//! - `control`: Control source resolution (keyboard / pointer / AI)
//! - `session`: Game session wrapper driving one frame per display refresh
//! - `renderer`: WebGPU rendering pipeline
//! - `highscores` / `settings`: LocalStorage-backed persistence

pub mod ai;
pub mod control;
pub mod highscores;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use control::{ControlMode, ControlState};
pub use highscores::{HighScores, PersonalityStats};
pub use session::GameSession;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical pixels, y grows downward)
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 320.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_BASE_SPEED: f32 = 3.0;
    /// Vertical offset of the respawned ball above the floor
    pub const BALL_RESPAWN_LIFT: f32 = 30.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Maximum paddle-hit deflection from vertical (60 degrees at the edges)
    pub const PADDLE_MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid
    pub const BRICK_ROWS: usize = 4;
    pub const BRICK_COLS: usize = 6;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 18.0;
    pub const BRICK_PADDING: f32 = 8.0;
    pub const BRICK_OFFSET_TOP: f32 = 50.0;
    pub const BRICK_OFFSET_LEFT: f32 = 15.0;

    /// Scoring
    pub const BRICK_POINTS: u32 = 10;
    pub const LASER_BRICK_POINTS: u32 = 15;
    pub const WIN_SCORE: u32 = (BRICK_ROWS * BRICK_COLS) as u32 * BRICK_POINTS;

    /// Lives at round start
    pub const STARTING_LIVES: u32 = 3;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f64 = 0.18;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    /// Timed effect duration in frames (~10s at 60 Hz)
    pub const EFFECT_FRAMES: u32 = 600;
    pub const WIDEN_FACTOR: f32 = 1.5;
    pub const SLOW_FACTOR: f32 = 0.7;
    pub const FAST_FACTOR: f32 = 1.4;
    /// Magnet nudge applied to ball dx toward paddle center, px/frame^2
    pub const MAGNET_PULL: f32 = 0.05;

    /// Lasers
    pub const LASER_SPEED: f32 = 6.0;
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 12.0;
    pub const LASER_COOLDOWN_FRAMES: u32 = 15;

    /// Combo window (~2s at 60 Hz) and bonus threshold
    pub const COMBO_WINDOW_FRAMES: u32 = 120;
    pub const COMBO_BONUS_MIN: u32 = 3;

    /// Screen shake decay per frame, with a zero floor
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_FLOOR: f32 = 0.01;

    /// Ball trail ring buffer length
    pub const TRAIL_LENGTH: usize = 12;

    /// Delay before an ended round resets, in frames (~2s at 60 Hz)
    pub const ROUND_RESET_FRAMES: u32 = 120;

    /// AI orchestrator poll interval (milliseconds)
    pub const AI_POLL_INTERVAL_MS: i32 = 100;

    /// Maximum particles alive at once
    pub const MAX_PARTICLES: usize = 256;
}

/// Clamp a paddle left edge into the playfield.
///
/// Idempotent by construction; every decision target passes through here
/// before it is reported or applied.
#[inline]
pub fn clamp_paddle_x(x: f32, canvas_width: f32, paddle_width: f32) -> f32 {
    x.clamp(0.0, (canvas_width - paddle_width).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn clamp_is_idempotent(
            x in -2000.0_f32..2000.0,
            w in 100.0_f32..1000.0,
            pw in 10.0_f32..90.0,
        ) {
            let once = clamp_paddle_x(x, w, pw);
            let twice = clamp_paddle_x(once, w, pw);
            prop_assert_eq!(once, twice);
            prop_assert!(once >= 0.0 && once <= w - pw);
        }
    }
}
