//! Collision predicates and response for axis-aligned playfield geometry
//!
//! Breakout's contact set is small and specialized: one ball against walls,
//! one paddle and a fixed brick grid, plus laser bolts against bricks.
//! Everything here is pure so the tick can stay a straight-line frame step.

use glam::Vec2;

use crate::consts::*;
use crate::sim::state::{Ball, Brick, Paddle};

/// Ball-center point-in-rect test (the original brick check)
#[inline]
pub fn point_in_rect(p: Vec2, min: Vec2, max: Vec2) -> bool {
    p.x > min.x && p.x < max.x && p.y > min.y && p.y < max.y
}

/// Axis-aligned rect overlap, used for laser-vs-brick
#[inline]
pub fn rects_overlap(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

/// Would the next x-position leave [radius, width - radius]?
#[inline]
pub fn hits_side_wall(ball: &Ball) -> bool {
    let next_x = ball.pos.x + ball.vel.x;
    next_x > CANVAS_WIDTH - ball.radius || next_x < ball.radius
}

/// Would the next y-position rise above the top wall?
#[inline]
pub fn hits_top_wall(ball: &Ball) -> bool {
    ball.pos.y + ball.vel.y < ball.radius
}

/// Would the next y-position cross the floor line?
#[inline]
pub fn crosses_floor(ball: &Ball) -> bool {
    ball.pos.y + ball.vel.y > CANVAS_HEIGHT - ball.radius
}

/// Is the ball's current x over the paddle when it reaches the floor?
#[inline]
pub fn over_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    ball.pos.x >= paddle.x && ball.pos.x <= paddle.x + paddle.width
}

/// Outgoing velocity for a paddle contact.
///
/// Maps the normalized hit position to an angle in +-60 degrees from
/// vertical: edge hits return steep, center hits return near-vertical.
/// Speed magnitude is conserved.
pub fn paddle_bounce_velocity(ball: &Ball, paddle: &Paddle) -> Vec2 {
    let hit_pos = ((ball.pos.x - paddle.x) / paddle.width).clamp(0.0, 1.0);
    let angle = (hit_pos - 0.5) * 2.0 * PADDLE_MAX_BOUNCE_ANGLE;
    let speed = ball.speed();
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Ball-center-vs-brick hit test
#[inline]
pub fn ball_hits_brick(ball: &Ball, brick: &Brick) -> bool {
    let (min, max) = brick.rect();
    point_in_rect(ball.pos, min, max)
}

/// Laser-vs-brick rect overlap
#[inline]
pub fn laser_hits_brick(laser_min: Vec2, laser_max: Vec2, brick: &Brick) -> bool {
    let (min, max) = brick.rect();
    rects_overlap(laser_min, laser_max, min, max)
}
