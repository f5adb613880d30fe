//! Ball and paddle state records and their per-tick update rules.

use crate::physics::{Rect, Vector2};
use crate::{
    BALL_RADIUS, BALL_SPEED, OPPONENT_PADDLE_START, PADDLE_HEIGHT, PADDLE_SPEED, PADDLE_WIDTH,
    PLAYER_PADDLE_START, WORLD_HEIGHT, WORLD_WIDTH,
};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A single directional paddle intent for one tick.
///
/// On the wire the action is an integer: `-1` moves down, `0` holds, `1` moves up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleAction {
    Down,
    #[default]
    Stay,
    Up,
}

impl PaddleAction {
    /// Maps a wire integer to an action. Anything outside `{-1, 0, 1}` is rejected.
    pub fn from_wire(value: i64) -> Option<Self> {
        match value {
            -1 => Some(PaddleAction::Down),
            0 => Some(PaddleAction::Stay),
            1 => Some(PaddleAction::Up),
            _ => None,
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            PaddleAction::Down => -1,
            PaddleAction::Stay => 0,
            PaddleAction::Up => 1,
        }
    }

    /// Collapses two held keys into one intent; holding both cancels out.
    pub fn from_keys(up: bool, down: bool) -> Self {
        match (up, down) {
            (true, false) => PaddleAction::Up,
            (false, true) => PaddleAction::Down,
            _ => PaddleAction::Stay,
        }
    }
}

/// A ball on the playfield.
///
/// `position` is the top-left corner of the ball's bounding box; use
/// [`Ball::center`] for the reported position.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub position: Vector2,
    pub velocity: Vector2,
    pub speed_multiplier: f32,
    pub radius: f32,
}

impl Ball {
    /// Builds a fresh ball at the center of the field with a direction drawn
    /// from a generator seeded with `seed`.
    ///
    /// Every call with the same seed yields the same ball, which is what makes
    /// a reset reproduce the previous episode's opening trajectory.
    pub fn serve(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        Self::with_rng(&mut rng)
    }

    /// Builds a fresh centered ball, drawing its launch angle from `rng`.
    pub fn with_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let degrees = rng.next_u32() % 360;
        let angle = (degrees as f32).to_radians();

        Ball {
            position: Vector2::new(
                WORLD_WIDTH / 2.0 - BALL_RADIUS,
                WORLD_HEIGHT / 2.0 - BALL_RADIUS,
            ),
            velocity: Vector2::from_angle(angle, BALL_SPEED),
            speed_multiplier: 1.0,
            radius: BALL_RADIUS,
        }
    }

    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Integrates position and bounces off the top and bottom walls.
    pub fn update(&mut self, dt: f32) {
        self.position = self
            .position
            .add(&self.velocity.scale(self.speed_multiplier * dt));

        if self.position.y <= 0.0 {
            self.bounce_y();
            self.position.y = 0.0;
        } else if self.position.y + self.diameter() >= WORLD_HEIGHT {
            self.bounce_y();
            self.position.y = WORLD_HEIGHT - self.diameter();
        }
    }

    pub fn bounce_x(&mut self) {
        self.velocity.x = -self.velocity.x;
    }

    pub fn bounce_y(&mut self) {
        self.velocity.y = -self.velocity.y;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position,
            Vector2::new(self.diameter(), self.diameter()),
        )
    }

    pub fn center(&self) -> Vector2 {
        self.bounds().center()
    }
}

/// One of the two paddles. Positions are top-left corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub position: Vector2,
    pub size: Vector2,
    pub base_size: Vector2,
    pub speed: f32,
    pub extended: bool,
    pub extend_time_left: f32,
    start: Vector2,
}

impl Paddle {
    pub fn new(start: Vector2) -> Self {
        let size = Vector2::new(PADDLE_WIDTH, PADDLE_HEIGHT);
        Paddle {
            position: start,
            size,
            base_size: size,
            speed: PADDLE_SPEED,
            extended: false,
            extend_time_left: 0.0,
            start,
        }
    }

    pub fn player() -> Self {
        Self::new(PLAYER_PADDLE_START)
    }

    pub fn opponent() -> Self {
        Self::new(OPPONENT_PADDLE_START)
    }

    pub fn start(&self) -> Vector2 {
        self.start
    }

    pub fn move_up(&mut self, dt: f32) {
        self.shift(-self.speed * dt);
    }

    pub fn move_down(&mut self, dt: f32) {
        self.shift(self.speed * dt);
    }

    /// Moves vertically by `dy` and clamps the paddle inside the playfield.
    pub fn shift(&mut self, dy: f32) {
        self.position.y += dy;
        if self.position.y < 0.0 {
            self.position.y = 0.0;
        } else if self.position.y + self.size.y > WORLD_HEIGHT {
            self.position.y = WORLD_HEIGHT - self.size.y;
        }
    }

    pub fn apply(&mut self, action: PaddleAction, dt: f32) {
        match action {
            PaddleAction::Up => self.move_up(dt),
            PaddleAction::Down => self.move_down(dt),
            PaddleAction::Stay => {}
        }
    }

    /// Doubles the paddle's width for `duration` seconds.
    ///
    /// Extensions do not stack: while extended this is a no-op and the
    /// remaining time is left untouched.
    pub fn extend(&mut self, duration: f32) {
        if self.extended || duration <= 0.0 {
            return;
        }
        self.extended = true;
        self.extend_time_left = duration;
        self.size = Vector2::new(self.base_size.x * 2.0, self.base_size.y);
    }

    /// Runs down the extension timer. Returns true on the tick the extension expires.
    pub fn tick_extend(&mut self, dt: f32) -> bool {
        if !self.extended {
            return false;
        }
        self.extend_time_left -= dt;
        if self.extend_time_left <= 0.0 {
            self.revert_extend();
            return true;
        }
        false
    }

    pub fn revert_extend(&mut self) {
        self.extended = false;
        self.extend_time_left = 0.0;
        self.size = self.base_size;
    }

    /// Moves the paddle back to its start position. An active extension survives.
    pub fn reset(&mut self) {
        self.position = self.start;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn center(&self) -> Vector2 {
        self.bounds().center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_SEED, FIXED_DT};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_serve_is_reproducible() {
        let a = Ball::serve(DEFAULT_SEED);
        let b = Ball::serve(DEFAULT_SEED);
        assert_eq!(a, b);
        assert_eq!(a.center(), Vector2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0));
        assert_eq!(a.speed_multiplier, 1.0);
        assert_approx_eq!(a.velocity.magnitude(), BALL_SPEED, 1e-2);
    }

    #[test]
    fn test_serve_angle_is_whole_degrees() {
        let ball = Ball::serve(7);
        let mut rng = Pcg32::seed_from_u64(7);
        let degrees = rng.next_u32() % 360;
        let expected = Vector2::from_angle((degrees as f32).to_radians(), BALL_SPEED);
        assert_eq!(ball.velocity, expected);
    }

    #[test]
    fn test_ball_moves_with_multiplier() {
        let mut ball = Ball::serve(DEFAULT_SEED);
        ball.velocity = Vector2::new(120.0, 0.0);
        ball.speed_multiplier = 0.5;
        let start = ball.position;
        ball.update(1.0);
        assert_eq!(ball.position.x, start.x + 60.0);
        assert_eq!(ball.position.y, start.y);
    }

    #[test]
    fn test_ball_bounces_off_top() {
        let mut ball = Ball::serve(DEFAULT_SEED);
        ball.position = Vector2::new(400.0, 2.0);
        ball.velocity = Vector2::new(10.0, -300.0);
        ball.update(FIXED_DT);
        assert_eq!(ball.position.y, 0.0);
        assert_eq!(ball.velocity.y, 300.0);
        assert_eq!(ball.velocity.x, 10.0);

        // Moving away from the wall again does not bounce a second time
        ball.update(FIXED_DT);
        assert_eq!(ball.velocity.y, 300.0);
        assert!(ball.position.y > 0.0);
    }

    #[test]
    fn test_ball_bounces_off_bottom() {
        let mut ball = Ball::serve(DEFAULT_SEED);
        ball.position = Vector2::new(400.0, WORLD_HEIGHT - ball.diameter() - 1.0);
        ball.velocity = Vector2::new(0.0, 300.0);
        ball.update(FIXED_DT);
        assert_eq!(ball.position.y, WORLD_HEIGHT - ball.diameter());
        assert_eq!(ball.velocity.y, -300.0);
    }

    #[test]
    fn test_ball_does_not_bounce_horizontally() {
        let mut ball = Ball::serve(DEFAULT_SEED);
        ball.position = Vector2::new(-50.0, 300.0);
        ball.velocity = Vector2::new(-300.0, 0.0);
        ball.update(FIXED_DT);
        assert_eq!(ball.velocity.x, -300.0);
    }

    #[test]
    fn test_paddle_movement_clamps() {
        let mut paddle = Paddle::player();
        paddle.move_up(FIXED_DT);
        assert_approx_eq!(paddle.position.y, 250.0 - PADDLE_SPEED * FIXED_DT, 1e-4);

        paddle.move_up(10.0);
        assert_eq!(paddle.position.y, 0.0);

        paddle.move_down(10.0);
        assert_eq!(paddle.position.y, WORLD_HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_paddle_apply_action() {
        let mut paddle = Paddle::opponent();
        paddle.apply(PaddleAction::Stay, FIXED_DT);
        assert_eq!(paddle.position, OPPONENT_PADDLE_START);
        paddle.apply(PaddleAction::Down, FIXED_DT);
        assert!(paddle.position.y > OPPONENT_PADDLE_START.y);
    }

    #[test]
    fn test_extend_doubles_width() {
        let mut paddle = Paddle::player();
        paddle.extend(10.0);
        assert!(paddle.extended);
        assert_eq!(paddle.extend_time_left, 10.0);
        assert_eq!(paddle.size, Vector2::new(PADDLE_WIDTH * 2.0, PADDLE_HEIGHT));
    }

    #[test]
    fn test_extend_does_not_stack() {
        let mut paddle = Paddle::player();
        paddle.extend(10.0);
        paddle.tick_extend(1.0);
        paddle.extend(10.0);
        assert_eq!(paddle.size.x, PADDLE_WIDTH * 2.0);
        assert_eq!(paddle.extend_time_left, 9.0);
    }

    #[test]
    fn test_extend_ignores_non_positive_duration() {
        let mut paddle = Paddle::player();
        paddle.extend(0.0);
        assert!(!paddle.extended);
        assert_eq!(paddle.size.x, PADDLE_WIDTH);
    }

    #[test]
    fn test_extend_expires() {
        let mut paddle = Paddle::player();
        paddle.extend(1.0);
        assert!(!paddle.tick_extend(0.5));
        assert!(paddle.extended);
        assert!(paddle.tick_extend(0.5));
        assert!(!paddle.extended);
        assert_eq!(paddle.size, paddle.base_size);
    }

    #[test]
    fn test_reset_keeps_extension() {
        let mut paddle = Paddle::player();
        paddle.extend(5.0);
        paddle.move_down(0.1);
        paddle.reset();
        assert_eq!(paddle.position, PLAYER_PADDLE_START);
        assert!(paddle.extended);
    }

    #[test]
    fn test_action_wire_mapping() {
        assert_eq!(PaddleAction::from_wire(-1), Some(PaddleAction::Down));
        assert_eq!(PaddleAction::from_wire(0), Some(PaddleAction::Stay));
        assert_eq!(PaddleAction::from_wire(1), Some(PaddleAction::Up));
        assert_eq!(PaddleAction::from_wire(2), None);
        assert_eq!(PaddleAction::Down.to_wire(), -1);
        assert_eq!(PaddleAction::from_keys(true, true), PaddleAction::Stay);
        assert_eq!(PaddleAction::from_keys(false, true), PaddleAction::Down);
    }
}
