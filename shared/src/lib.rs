//! Deterministic Pong simulation shared by the headless server and the local game.
//!
//! Coordinates are screen-style: the origin is the top-left corner of an
//! 800×600 field and y grows downward. One call to [`Simulator::step`]
//! advances the match by [`FIXED_DT`] seconds regardless of wall-clock time.

pub mod entity;
pub mod physics;
pub mod power_up;
pub mod simulator;

pub use entity::{Ball, Paddle, PaddleAction};
pub use physics::{Rect, Vector2};
pub use power_up::{ActiveEffect, EffectSpec, PowerUp, PowerUpKind, PowerUpManager};
pub use simulator::{MatchConfig, MatchState, OpponentControl, Scorer, Simulator};

pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const FIXED_DT: f32 = 1.0 / 60.0;
pub const DEFAULT_SEED: u64 = 42;

pub const BALL_RADIUS: f32 = 10.0;
pub const BALL_SPEED: f32 = 300.0;

pub const PADDLE_WIDTH: f32 = 20.0;
pub const PADDLE_HEIGHT: f32 = 100.0;
pub const PADDLE_SPEED: f32 = 600.0;
pub const PLAYER_PADDLE_START: Vector2 = Vector2::new(10.0, 250.0);
pub const OPPONENT_PADDLE_START: Vector2 = Vector2::new(770.0, 250.0);

/// Top speed of the built-in opponent, in pixels per second.
pub const TRACKING_MAX_SPEED: f32 = 400.0;
/// The built-in opponent holds still while the ball is this close to its center line.
pub const TRACKING_DEADZONE: f32 = 10.0;

pub const POWER_UP_RADIUS: f32 = 15.0;
pub const POWER_UP_FALL_SPEED: f32 = 100.0;
pub const SLOW_MOTION_MULTIPLIER: f32 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddles_fit_inside_field() {
        assert!(PLAYER_PADDLE_START.x >= 0.0);
        assert!(OPPONENT_PADDLE_START.x + PADDLE_WIDTH <= WORLD_WIDTH);
        assert!(PLAYER_PADDLE_START.y + PADDLE_HEIGHT <= WORLD_HEIGHT);
        assert_eq!(PLAYER_PADDLE_START.y, OPPONENT_PADDLE_START.y);
    }

    #[test]
    fn test_fixed_dt() {
        assert!((FIXED_DT * 60.0 - 1.0).abs() < 1e-6);
    }
}
