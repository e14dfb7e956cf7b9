//! Game state and core simulation types
//!
//! Everything the per-frame tick mutates lives here, owned by a single
//! [`GameState`] - no free-standing globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for any start input (click/tap/keypress)
    NotStarted,
    /// Active gameplay
    Running,
    /// All bricks cleared; auto-resets after a short delay
    Win,
    /// Out of lives; auto-resets after a short delay
    GameOver,
}

/// The ball. A singleton: re-centered on life loss, never destroyed.
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Speed magnitude restored after life loss and effect expiry
    pub base_speed: f32,
    /// Recent positions for the cosmetic trail (newest first)
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new() -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            base_speed: BALL_BASE_SPEED,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        };
        ball.respawn();
        ball
    }

    /// Re-center with the canonical starting velocity
    pub fn respawn(&mut self) {
        self.pos = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - BALL_RESPAWN_LIFT);
        self.vel = Vec2::new(BALL_BASE_SPEED, -BALL_BASE_SPEED);
        self.trail.clear();
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Rescale velocity to a new magnitude, preserving direction
    pub fn set_speed(&mut self, speed: f32) {
        let dir = self.vel.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.vel = dir * speed;
        }
    }

    /// Record current position to trail (call each frame while running)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's paddle, bottom-aligned
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Left edge; always within [0, CANVAS_WIDTH - width]
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Per-frame movement step
    pub speed: f32,
    /// Width restored when the widen effect expires
    pub base_width: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (CANVAS_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            base_width: PADDLE_WIDTH,
        }
    }
}

impl Paddle {
    /// Top edge of the paddle in playfield coordinates
    #[inline]
    pub fn y(&self) -> f32 {
        CANVAS_HEIGHT - self.height
    }

    /// Clamp x into the playfield
    pub fn clamp_x(&mut self) {
        self.x = crate::clamp_paddle_x(self.x, CANVAS_WIDTH, self.width);
    }

    /// Move toward a target left edge at most one step this frame
    pub fn seek(&mut self, target_x: f32) {
        let target = crate::clamp_paddle_x(target_x, CANVAS_WIDTH, self.width);
        let delta = (target - self.x).clamp(-self.speed, self.speed);
        self.x += delta;
        self.clamp_x();
    }
}

/// One brick in the fixed grid. Position is immutable once placed;
/// `alive` only ever flips true -> false within a round.
#[derive(Debug, Clone)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub pos: Vec2,
    pub alive: bool,
    /// Row color index into the renderer palette
    pub color: usize,
}

impl Brick {
    #[inline]
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.pos, self.pos + Vec2::new(BRICK_WIDTH, BRICK_HEIGHT))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(BRICK_WIDTH / 2.0, BRICK_HEIGHT / 2.0)
    }
}

/// Build the rows x cols grid, all alive
pub fn build_brick_grid() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for col in 0..BRICK_COLS {
        for row in 0..BRICK_ROWS {
            let pos = Vec2::new(
                col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
                row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
            );
            bricks.push(Brick {
                col,
                row,
                pos,
                alive: true,
                color: row,
            });
        }
    }
    bricks
}

/// Power-up effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    WidenPaddle,
    SlowBall,
    FastBall,
    ExtraLife,
    Laser,
    /// Weak per-frame pull of the ball toward the paddle center
    Magnet,
}

impl PowerUpKind {
    /// Glyph drawn on the falling capsule
    pub fn symbol(&self) -> char {
        match self {
            PowerUpKind::WidenPaddle => 'W',
            PowerUpKind::SlowBall => 'S',
            PowerUpKind::FastBall => 'F',
            PowerUpKind::ExtraLife => '+',
            PowerUpKind::Laser => 'L',
            PowerUpKind::Magnet => 'M',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::WidenPaddle => "widen",
            PowerUpKind::SlowBall => "slow",
            PowerUpKind::FastBall => "fast",
            PowerUpKind::ExtraLife => "life",
            PowerUpKind::Laser => "laser",
            PowerUpKind::Magnet => "magnet",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerUpKind,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: usize,
    /// Remaining lifetime in frames; alpha = life / max_life
    pub life: f32,
    pub max_life: f32,
}

/// An upward-travelling laser bolt
#[derive(Debug, Clone)]
pub struct Laser {
    pub pos: Vec2,
}

impl Laser {
    #[inline]
    pub fn rect(&self) -> (Vec2, Vec2) {
        (self.pos, self.pos + Vec2::new(LASER_WIDTH, LASER_HEIGHT))
    }
}

/// Timed power-up effects, decremented once per frame inside the loop.
/// A second pickup of an active effect restarts its countdown.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    pub widen_frames: u32,
    pub slow_frames: u32,
    pub fast_frames: u32,
    pub laser_frames: u32,
    pub magnet_frames: u32,
}

impl ActiveEffects {
    pub fn laser_active(&self) -> bool {
        self.laser_frames > 0
    }

    /// Kinds currently active, for the snapshot's powerUps list
    pub fn active_kinds(&self) -> Vec<PowerUpKind> {
        let mut kinds = Vec::new();
        if self.widen_frames > 0 {
            kinds.push(PowerUpKind::WidenPaddle);
        }
        if self.slow_frames > 0 {
            kinds.push(PowerUpKind::SlowBall);
        }
        if self.fast_frames > 0 {
            kinds.push(PowerUpKind::FastBall);
        }
        if self.laser_frames > 0 {
            kinds.push(PowerUpKind::Laser);
        }
        if self.magnet_frames > 0 {
            kinds.push(PowerUpKind::Magnet);
        }
        kinds
    }
}

/// Complete per-session game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducible power-up rolls and particle spread
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    pub frame: u64,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub lasers: Vec<Laser>,
    pub effects: ActiveEffects,
    /// Consecutive brick destructions inside the timeout window
    pub combo: u32,
    /// Frames left before the combo resets
    pub combo_frames: u32,
    /// Frames until another laser may fire
    pub laser_cooldown: u32,
    /// Screen shake intensity, geometric decay
    pub screen_shake: f32,
    /// Countdown from Win/GameOver back to NotStarted
    pub reset_frames: u32,
    /// Paddle contacts this round (for personality stats)
    pub paddle_hits: u32,
    /// Paddle misses (lives lost) this round
    pub paddle_misses: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            score: 0,
            lives: STARTING_LIVES,
            frame: 0,
            ball: Ball::new(),
            paddle: Paddle::default(),
            bricks: build_brick_grid(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            lasers: Vec::new(),
            effects: ActiveEffects::default(),
            combo: 0,
            combo_frames: 0,
            laser_cooldown: 0,
            screen_shake: 0.0,
            reset_frames: 0,
            paddle_hits: 0,
            paddle_misses: 0,
        }
    }

    pub fn bricks_remaining(&self) -> u32 {
        self.bricks.iter().filter(|b| b.alive).count() as u32
    }

    /// Reset all entities, score, lives, combo and effect buffers.
    /// The RNG keeps advancing so consecutive rounds differ.
    pub fn reset_round(&mut self) {
        self.phase = GamePhase::NotStarted;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.ball.respawn();
        self.paddle = Paddle::default();
        self.bricks = build_brick_grid();
        self.power_ups.clear();
        self.particles.clear();
        self.lasers.clear();
        self.effects = ActiveEffects::default();
        self.combo = 0;
        self.combo_frames = 0;
        self.laser_cooldown = 0;
        self.screen_shake = 0.0;
        self.reset_frames = 0;
        self.paddle_hits = 0;
        self.paddle_misses = 0;
    }

    /// Point-in-time read-only view consumed by the AI decision engine
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            ball_pos: self.ball.pos,
            ball_vel: self.ball.vel,
            ball_radius: self.ball.radius,
            paddle_x: self.paddle.x,
            paddle_y: self.paddle.y(),
            paddle_width: self.paddle.width,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            score: self.score,
            lives: self.lives,
            bricks_remaining: self.bricks_remaining(),
            active_power_ups: self.effects.active_kinds(),
            running: self.phase == GamePhase::Running,
            started: self.phase != GamePhase::NotStarted,
        }
    }
}

/// Read-only snapshot of the fields the decision engine needs
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub ball_radius: f32,
    pub paddle_x: f32,
    pub paddle_y: f32,
    pub paddle_width: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub score: u32,
    pub lives: u32,
    pub bricks_remaining: u32,
    pub active_power_ups: Vec<PowerUpKind>,
    pub running: bool,
    pub started: bool,
}

impl GameSnapshot {
    pub fn ball_speed(&self) -> f32 {
        self.ball_vel.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brick_grid_dimensions() {
        let bricks = build_brick_grid();
        assert_eq!(bricks.len(), BRICK_ROWS * BRICK_COLS);
        assert!(bricks.iter().all(|b| b.alive));
        // First brick at the configured offsets
        let first = bricks.iter().find(|b| b.col == 0 && b.row == 0).unwrap();
        assert_eq!(first.pos, Vec2::new(BRICK_OFFSET_LEFT, BRICK_OFFSET_TOP));
    }

    #[test]
    fn ball_respawn_is_canonical() {
        let mut ball = Ball::new();
        ball.pos = Vec2::new(10.0, 10.0);
        ball.vel = Vec2::new(-5.0, 2.0);
        ball.respawn();
        assert_eq!(
            ball.pos,
            Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT - BALL_RESPAWN_LIFT)
        );
        assert_eq!(ball.vel, Vec2::new(BALL_BASE_SPEED, -BALL_BASE_SPEED));
    }

    #[test]
    fn paddle_seek_is_stepped_and_clamped() {
        let mut paddle = Paddle::default();
        let start = paddle.x;
        paddle.seek(start + 100.0);
        assert_eq!(paddle.x, start + PADDLE_SPEED);
        paddle.seek(-500.0);
        assert!(paddle.x >= 0.0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let state = GameState::new(7);
        let snap = state.snapshot();
        assert_eq!(snap.bricks_remaining, (BRICK_ROWS * BRICK_COLS) as u32);
        assert_eq!(snap.lives, STARTING_LIVES);
        assert!(!snap.running);
        assert!(!snap.started);
    }
}
