//! Deterministic game simulation
//!
//! Pure logic with no platform dependencies: the same seed and the same
//! input sequence always produce the same state. The loop in `main.rs`
//! calls [`tick`] once per display-refresh callback.

pub mod collision;
pub mod state;
pub mod tick;

pub use state::{
    ActiveEffects, Ball, Brick, GamePhase, GameSnapshot, GameState, Laser, Particle, Paddle,
    PowerUp, PowerUpKind,
};
pub use tick::{tick, TickInput};
