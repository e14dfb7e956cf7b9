//! Per-frame simulation step
//!
//! One `tick` call per display-refresh callback. Frame order inside a
//! running round: effect systems, brick/laser collisions, wall/paddle/floor
//! physics, control target application, ball integration. Timed effects are
//! countdown fields decremented here, never wall-clock timers, so expiry is
//! deterministic and testable.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::collision::{
    ball_hits_brick, crosses_floor, hits_side_wall, hits_top_wall, laser_hits_brick, over_paddle,
    paddle_bounce_velocity, rects_overlap,
};
use crate::sim::state::{GamePhase, GameState, Laser, Particle, PowerUp, PowerUpKind};

/// Half-extent of a falling power-up capsule
const POWERUP_SIZE: f32 = 8.0;
/// Combo bonus per destruction once the streak qualifies
const COMBO_BONUS_PER_LEVEL: u32 = 5;

/// Input commands for a single frame, resolved from the active control source
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard steering: -1 left, 0 none, +1 right
    pub move_dir: i8,
    /// Pointer steering: snap the paddle left edge here this frame
    pub snap_target: Option<f32>,
    /// AI steering: move toward this left edge at paddle speed
    pub seek_target: Option<f32>,
    /// Fire laser (only effective while laser mode is active)
    pub fire: bool,
    /// Start input (any key / click / tap)
    pub start: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::NotStarted => {
            if input.start {
                state.phase = GamePhase::Running;
                log::info!("Round started (seed {})", state.seed);
            }
            return;
        }
        GamePhase::Win | GamePhase::GameOver => {
            // Let the burst finish while the overlay shows
            update_particles(state);
            decay_shake(state);
            state.reset_frames = state.reset_frames.saturating_sub(1);
            if state.reset_frames == 0 {
                state.reset_round();
            }
            return;
        }
        GamePhase::Running => {}
    }

    state.frame += 1;
    decay_shake(state);

    // --- Effect systems ---
    update_particles(state);
    update_power_ups(state);
    update_combo(state);
    update_effect_timers(state);
    update_lasers(state, input.fire);

    // --- Brick collisions (ball, then lasers) ---
    resolve_ball_bricks(state);
    resolve_laser_bricks(state);

    if state.score >= WIN_SCORE && state.phase == GamePhase::Running {
        state.phase = GamePhase::Win;
        state.reset_frames = ROUND_RESET_FRAMES;
        state.screen_shake = (state.screen_shake + 0.3).min(1.0);
        log::info!("Round won with score {}", state.score);
        return;
    }

    // --- Wall / paddle / floor physics ---
    if hits_side_wall(&state.ball) {
        state.ball.vel.x = -state.ball.vel.x;
    }
    if hits_top_wall(&state.ball) {
        state.ball.vel.y = -state.ball.vel.y;
    } else if crosses_floor(&state.ball) {
        if over_paddle(&state.ball, &state.paddle) {
            state.ball.vel = paddle_bounce_velocity(&state.ball, &state.paddle);
            state.paddle_hits += 1;
            spawn_burst(state, state.ball.pos, PADDLE_SPARK_COLOR, 6);
            state.screen_shake = (state.screen_shake + 0.1).min(1.0);
        } else {
            lose_life(state);
            if state.phase == GamePhase::GameOver {
                return;
            }
        }
    }

    // Magnet power-up: bounded per-frame nudge of dx toward paddle center,
    // active only while its countdown is unexpired
    if state.effects.magnet_frames > 0 {
        let paddle_center = state.paddle.x + state.paddle.width / 2.0;
        let pull = (paddle_center - state.ball.pos.x).signum() * MAGNET_PULL;
        state.ball.vel.x += pull;
    }

    // --- Control target -> paddle ---
    apply_steering(state, input);

    // --- Ball integration ---
    state.ball.pos += state.ball.vel;
    state.ball.record_trail();
}

fn decay_shake(state: &mut GameState) {
    state.screen_shake *= SHAKE_DECAY;
    if state.screen_shake < SHAKE_FLOOR {
        state.screen_shake = 0.0;
    }
}

fn apply_steering(state: &mut GameState, input: &TickInput) {
    if let Some(target) = input.seek_target {
        state.paddle.seek(target);
    } else if let Some(target) = input.snap_target {
        state.paddle.x = crate::clamp_paddle_x(target, CANVAS_WIDTH, state.paddle.width);
    } else if input.move_dir != 0 {
        state.paddle.x += input.move_dir as f32 * state.paddle.speed;
        state.paddle.clamp_x();
    }
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.paddle_misses += 1;
    state.combo = 0;
    state.combo_frames = 0;
    state.screen_shake = (state.screen_shake + 0.4).min(1.0);
    spawn_burst(state, state.ball.pos, MISS_SPARK_COLOR, 12);

    if state.lives > 0 {
        // Respawn restores the canonical base-speed velocity, so any
        // pending speed modifier is cancelled with it
        state.ball.respawn();
        state.effects.slow_frames = 0;
        state.effects.fast_frames = 0;
        log::info!("Life lost, {} remaining", state.lives);
    } else {
        state.phase = GamePhase::GameOver;
        state.reset_frames = ROUND_RESET_FRAMES;
        log::info!("Game over at score {}", state.score);
    }
}

fn update_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= 0.98;
        particle.life -= 1.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

fn update_power_ups(state: &mut GameState) {
    let paddle_min = Vec2::new(state.paddle.x, state.paddle.y());
    let paddle_max = paddle_min + Vec2::new(state.paddle.width, state.paddle.height);

    let mut collected: Vec<PowerUpKind> = Vec::new();
    state.power_ups.retain_mut(|p| {
        p.pos += p.vel;
        let min = p.pos - Vec2::splat(POWERUP_SIZE);
        let max = p.pos + Vec2::splat(POWERUP_SIZE);
        if rects_overlap(min, max, paddle_min, paddle_max) {
            collected.push(p.kind);
            false
        } else {
            // Removed once fully below the canvas
            p.pos.y - POWERUP_SIZE < CANVAS_HEIGHT
        }
    });

    for kind in collected {
        apply_power_up(state, kind);
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("Power-up collected: {}", kind.as_str());
    spawn_burst(state, Vec2::new(state.paddle.x + state.paddle.width / 2.0, state.paddle.y()), POWERUP_SPARK_COLOR, 8);

    match kind {
        PowerUpKind::WidenPaddle => {
            // Re-pickup restarts the countdown rather than stacking width
            state.paddle.width = state.paddle.base_width * WIDEN_FACTOR;
            state.paddle.clamp_x();
            state.effects.widen_frames = EFFECT_FRAMES;
        }
        PowerUpKind::SlowBall => {
            state.ball.set_speed(state.ball.base_speed * SLOW_FACTOR);
            state.effects.slow_frames = EFFECT_FRAMES;
            state.effects.fast_frames = 0;
        }
        PowerUpKind::FastBall => {
            state.ball.set_speed(state.ball.base_speed * FAST_FACTOR);
            state.effects.fast_frames = EFFECT_FRAMES;
            state.effects.slow_frames = 0;
        }
        PowerUpKind::ExtraLife => {
            state.lives += 1;
        }
        PowerUpKind::Laser => {
            state.effects.laser_frames = EFFECT_FRAMES;
        }
        PowerUpKind::Magnet => {
            state.effects.magnet_frames = EFFECT_FRAMES;
        }
    }
}

fn update_combo(state: &mut GameState) {
    if state.combo_frames > 0 {
        state.combo_frames -= 1;
        if state.combo_frames == 0 {
            state.combo = 0;
        }
    }
}

fn update_effect_timers(state: &mut GameState) {
    let effects = &mut state.effects;

    if effects.widen_frames > 0 {
        effects.widen_frames -= 1;
        if effects.widen_frames == 0 {
            state.paddle.width = state.paddle.base_width;
            state.paddle.clamp_x();
        }
    }
    if effects.slow_frames > 0 {
        effects.slow_frames -= 1;
        if effects.slow_frames == 0 {
            state.ball.set_speed(state.ball.base_speed);
        }
    }
    if effects.fast_frames > 0 {
        effects.fast_frames -= 1;
        if effects.fast_frames == 0 {
            state.ball.set_speed(state.ball.base_speed);
        }
    }
    if effects.laser_frames > 0 {
        effects.laser_frames -= 1;
        if effects.laser_frames == 0 {
            state.lasers.clear();
        }
    }
    effects.magnet_frames = effects.magnet_frames.saturating_sub(1);
}

fn update_lasers(state: &mut GameState, fire: bool) {
    state.laser_cooldown = state.laser_cooldown.saturating_sub(1);

    if fire && state.effects.laser_active() && state.laser_cooldown == 0 {
        let x = state.paddle.x + state.paddle.width / 2.0 - LASER_WIDTH / 2.0;
        state.lasers.push(Laser {
            pos: Vec2::new(x, state.paddle.y() - LASER_HEIGHT),
        });
        state.laser_cooldown = LASER_COOLDOWN_FRAMES;
    }

    for laser in state.lasers.iter_mut() {
        laser.pos.y -= LASER_SPEED;
    }
    state.lasers.retain(|l| l.pos.y + LASER_HEIGHT > 0.0);
}

fn resolve_ball_bricks(state: &mut GameState) {
    let mut hit_idx = None;
    for (idx, brick) in state.bricks.iter().enumerate() {
        if brick.alive && ball_hits_brick(&state.ball, brick) {
            hit_idx = Some(idx);
            break;
        }
    }

    if let Some(idx) = hit_idx {
        state.ball.vel.y = -state.ball.vel.y;
        destroy_brick(state, idx, BRICK_POINTS);
    }
}

fn resolve_laser_bricks(state: &mut GameState) {
    // First matching brick destroys both laser and brick
    let mut dead_lasers = Vec::new();
    let mut dead_bricks = Vec::new();

    for (laser_idx, laser) in state.lasers.iter().enumerate() {
        let (min, max) = laser.rect();
        for (brick_idx, brick) in state.bricks.iter().enumerate() {
            if brick.alive
                && !dead_bricks.contains(&brick_idx)
                && laser_hits_brick(min, max, brick)
            {
                dead_lasers.push(laser_idx);
                dead_bricks.push(brick_idx);
                break;
            }
        }
    }

    for &idx in dead_bricks.iter() {
        destroy_brick(state, idx, LASER_BRICK_POINTS);
    }
    for &idx in dead_lasers.iter().rev() {
        state.lasers.remove(idx);
    }
}

/// Destroy one brick: score, combo, particles, power-up roll
fn destroy_brick(state: &mut GameState, idx: usize, points: u32) {
    let (center, color) = {
        let brick = &mut state.bricks[idx];
        brick.alive = false;
        (brick.center(), brick.color)
    };

    state.score += points;

    // Combo streak inside the rolling window
    state.combo = if state.combo_frames > 0 { state.combo + 1 } else { 1 };
    state.combo_frames = COMBO_WINDOW_FRAMES;
    if state.combo >= COMBO_BONUS_MIN {
        state.score += state.combo * COMBO_BONUS_PER_LEVEL;
    }

    spawn_burst(state, center, color, 8);
    state.screen_shake = (state.screen_shake + 0.15).min(1.0);

    if state.rng.random_bool(POWERUP_DROP_CHANCE) {
        let kind = match state.rng.random_range(0..6) {
            0 => PowerUpKind::WidenPaddle,
            1 => PowerUpKind::SlowBall,
            2 => PowerUpKind::FastBall,
            3 => PowerUpKind::ExtraLife,
            4 => PowerUpKind::Laser,
            _ => PowerUpKind::Magnet,
        };
        state.power_ups.push(PowerUp {
            pos: center,
            vel: Vec2::new(0.0, POWERUP_FALL_SPEED),
            kind,
        });
    }
}

/// Palette indices past the brick rows, matched by the renderer
pub const PADDLE_SPARK_COLOR: usize = 96;
pub const MISS_SPARK_COLOR: usize = 97;
pub const POWERUP_SPARK_COLOR: usize = 98;

fn spawn_burst(state: &mut GameState, pos: Vec2, color: usize, count: usize) {
    for _ in 0..count {
        if state.particles.len() >= MAX_PARTICLES {
            state.particles.remove(0);
        }
        let vel = Vec2::new(
            state.rng.random_range(-2.0..2.0),
            state.rng.random_range(-2.0..2.0),
        );
        let max_life = state.rng.random_range(20.0..40.0);
        state.particles.push(Particle {
            pos,
            vel,
            color,
            life: max_life,
            max_life,
        });
    }
}
