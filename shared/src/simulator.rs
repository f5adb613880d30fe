use crate::entity::{Ball, Paddle, PaddleAction};
use crate::power_up::{default_effects, EffectSpec, EffectTarget, PowerUpManager};
use crate::{DEFAULT_SEED, FIXED_DT, TRACKING_DEADZONE, TRACKING_MAX_SPEED, WORLD_WIDTH};
use log::info;

/// Match-level tunables.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Seeds every freshly served ball and the power-up spawn positions.
    pub seed: u64,
    /// Length of one tick in seconds.
    pub dt: f32,
    pub effects: Vec<EffectSpec>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            dt: FIXED_DT,
            effects: default_effects(),
        }
    }
}

/// Everything that describes the match at a tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub balls: Vec<Ball>,
    pub player_paddle: Paddle,
    pub opponent_paddle: Paddle,
    pub player_score: u32,
    pub opponent_score: u32,
}

impl MatchState {
    pub fn new(seed: u64) -> Self {
        Self {
            balls: vec![Ball::serve(seed)],
            player_paddle: Paddle::player(),
            opponent_paddle: Paddle::opponent(),
            player_score: 0,
            opponent_score: 0,
        }
    }

    /// Back to a single fresh ball with both paddles at their start positions.
    fn reset(&mut self, seed: u64) {
        self.balls.clear();
        self.balls.push(Ball::serve(seed));
        self.player_paddle.reset();
        self.opponent_paddle.reset();
    }
}

/// Who drives the opponent paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentControl {
    /// Built-in opponent that follows the first ball.
    Tracking,
    /// Pending action supplied from outside; applied every tick until replaced.
    External(PaddleAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scorer {
    Player,
    Opponent,
}

/// Advances a match one fixed tick at a time.
///
/// Each tick runs, in order: paddle intents, ball movement, paddle
/// collisions, paddle extension timers, power-ups, scoring.
#[derive(Debug, Clone)]
pub struct Simulator {
    state: MatchState,
    power_ups: PowerUpManager,
    opponent: OpponentControl,
    config: MatchConfig,
    tick: u64,
}

impl Simulator {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            state: MatchState::new(config.seed),
            power_ups: PowerUpManager::new(&config.effects, config.seed),
            opponent: OpponentControl::Tracking,
            config,
            tick: 0,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct access for scripted scenarios and tooling.
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn power_ups(&self) -> &PowerUpManager {
        &self.power_ups
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn opponent_control(&self) -> OpponentControl {
        self.opponent
    }

    pub fn set_opponent_control(&mut self, control: OpponentControl) {
        self.opponent = control;
    }

    /// Replaces the opponent's pending action. Takes effect on the next step.
    pub fn set_opponent_action(&mut self, action: PaddleAction) {
        self.opponent = OpponentControl::External(action);
    }

    /// Advances the match by one fixed tick. Returns the side that scored, if any.
    pub fn step(&mut self, player_intent: PaddleAction) -> Option<Scorer> {
        let dt = self.config.dt;

        self.apply_intents(player_intent, dt);

        for ball in &mut self.state.balls {
            ball.update(dt);
        }

        self.handle_collisions();

        self.state.player_paddle.tick_extend(dt);
        self.state.opponent_paddle.tick_extend(dt);

        let mut target = EffectTarget {
            player_paddle: &mut self.state.player_paddle,
            balls: &mut self.state.balls,
            ball_seed: self.config.seed,
        };
        self.power_ups.update(dt, &mut target);

        self.tick += 1;
        self.check_scoring()
    }

    fn apply_intents(&mut self, player_intent: PaddleAction, dt: f32) {
        self.state.player_paddle.apply(player_intent, dt);

        match self.opponent {
            OpponentControl::External(action) => self.state.opponent_paddle.apply(action, dt),
            OpponentControl::Tracking => self.track_first_ball(dt),
        }
    }

    fn track_first_ball(&mut self, dt: f32) {
        let Some(ball) = self.state.balls.first() else {
            return;
        };

        let paddle = &mut self.state.opponent_paddle;
        let diff = ball.center().y - paddle.center().y;
        if diff.abs() > TRACKING_DEADZONE {
            let amount = (TRACKING_MAX_SPEED * dt).min(diff.abs());
            if diff > 0.0 {
                paddle.shift(amount);
            } else {
                paddle.shift(-amount);
            }
        }
    }

    /// Flips a ball's horizontal velocity once per paddle it overlaps.
    fn handle_collisions(&mut self) {
        let paddles = [
            self.state.player_paddle.bounds(),
            self.state.opponent_paddle.bounds(),
        ];

        for ball in &mut self.state.balls {
            for paddle in &paddles {
                if ball.bounds().intersects(paddle) {
                    ball.bounce_x();
                }
            }
        }
    }

    fn check_scoring(&mut self) -> Option<Scorer> {
        let scorer = self.state.balls.iter().find_map(|ball| {
            let x = ball.center().x;
            if x < 0.0 {
                Some(Scorer::Opponent)
            } else if x > WORLD_WIDTH {
                Some(Scorer::Player)
            } else {
                None
            }
        })?;

        match scorer {
            Scorer::Player => self.state.player_score += 1,
            Scorer::Opponent => self.state.opponent_score += 1,
        }
        self.state.reset(self.config.seed);

        info!(
            "Score: player {} - opponent {}",
            self.state.player_score, self.state.opponent_score
        );
        Some(scorer)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
