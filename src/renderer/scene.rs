//! Scene assembly
//!
//! Flattens the game state into one vertex list per frame. Screen shake is
//! a whole-scene translation derived from the frame counter, so replaying
//! the same simulation produces the same pixels.

use glam::Vec2;

use super::shapes::{ball_trail, circle, rect};
use super::vertex::{colors, Vertex};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::GameState;

const BALL_SEGMENTS: u32 = 20;
const PARTICLE_SIZE: f32 = 3.0;
const SHAKE_AMPLITUDE: f32 = 6.0;

/// Deterministic jitter for the current frame, scaled by shake intensity
pub fn shake_offset(frame: u64, intensity: f32) -> Vec2 {
    if intensity <= 0.0 {
        return Vec2::ZERO;
    }
    let t = frame as f32;
    let n1 = hash01(t * 12.9898);
    let n2 = hash01(t * 78.233);
    Vec2::new(n1 * 2.0 - 1.0, n2 * 2.0 - 1.0) * intensity * SHAKE_AMPLITUDE
}

fn hash01(x: f32) -> f32 {
    let n = x.sin() * 43758.5453;
    n - n.floor()
}

/// Build the vertex list for one frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let offset = if settings.effective_screen_shake() {
        shake_offset(state.frame, state.screen_shake)
    } else {
        Vec2::ZERO
    };

    let mut vertices = Vec::with_capacity(1024);

    for brick in state.bricks.iter().filter(|b| b.alive) {
        vertices.extend(rect(
            brick.pos + offset,
            Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            colors::palette(brick.color),
        ));
    }

    for power_up in &state.power_ups {
        vertices.extend(circle(power_up.pos + offset, 8.0, colors::POWERUP, 12));
    }

    for laser in &state.lasers {
        vertices.extend(rect(
            laser.pos + offset,
            Vec2::new(LASER_WIDTH, LASER_HEIGHT),
            colors::LASER,
        ));
    }

    if settings.particles {
        for particle in &state.particles {
            let mut color = colors::palette(particle.color);
            color[3] = (particle.life / particle.max_life).clamp(0.0, 1.0);
            vertices.extend(rect(
                particle.pos + offset - Vec2::splat(PARTICLE_SIZE / 2.0),
                Vec2::splat(PARTICLE_SIZE),
                color,
            ));
        }
    }

    if settings.trails {
        vertices.extend(ball_trail(
            &state.ball.trail,
            state.ball.radius,
            colors::BALL,
        ));
    }

    vertices.extend(circle(
        state.ball.pos + offset,
        state.ball.radius,
        colors::BALL,
        BALL_SEGMENTS,
    ));

    vertices.extend(rect(
        Vec2::new(state.paddle.x, state.paddle.y()) + offset,
        Vec2::new(state.paddle.width, state.paddle.height),
        colors::PADDLE,
    ));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_is_deterministic_and_bounded() {
        let a = shake_offset(42, 0.5);
        let b = shake_offset(42, 0.5);
        assert_eq!(a, b);
        assert!(a.length() <= SHAKE_AMPLITUDE * 0.5 * std::f32::consts::SQRT_2);
        assert_eq!(shake_offset(42, 0.0), Vec2::ZERO);
    }

    #[test]
    fn fresh_scene_contains_full_brick_grid() {
        let state = GameState::new(1);
        let vertices = build_scene(&state, &Settings::default());
        // 24 bricks, 6 vertices each, plus ball and paddle geometry
        let minimum = BRICK_ROWS * BRICK_COLS * 6 + 6 + (BALL_SEGMENTS as usize) * 3;
        assert!(vertices.len() >= minimum);
    }

    #[test]
    fn destroyed_bricks_are_not_drawn() {
        let mut state = GameState::new(1);
        let full = build_scene(&state, &Settings::default()).len();
        state.bricks[0].alive = false;
        let fewer = build_scene(&state, &Settings::default()).len();
        assert_eq!(full - fewer, 6);
    }
}
