use crate::input::InputManager;
use crate::rendering::Renderer;
use log::{debug, info};
use macroquad::prelude::{get_frame_time, next_frame};
use shared::{MatchConfig, PaddleAction, Scorer, Simulator};

/// Longest frame the accumulator will take in one go, in seconds.
const MAX_FRAME_DELTA: f32 = 1.0 / 20.0;

/// A keyboard-driven match against the built-in opponent.
///
/// Frames of any length are fed in through [`LocalGame::advance`]; the
/// simulator only ever sees fixed ticks.
pub struct LocalGame {
    simulator: Simulator,
    accumulator: f32,
    paused: bool,
}

impl LocalGame {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            simulator: Simulator::new(config),
            accumulator: 0.0,
            paused: false,
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        info!("Paused: {}", self.paused);
    }

    /// Runs as many fixed ticks as the elapsed frame time covers and returns
    /// how many ran. Nothing accumulates while paused.
    pub fn advance(&mut self, frame_time: f32, intent: PaddleAction) -> u32 {
        if self.paused {
            return 0;
        }

        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_DELTA {
            debug!(
                "Large frame time ({:.3}s), capping to {:.3}s",
                frame_time, MAX_FRAME_DELTA
            );
            frame_time = MAX_FRAME_DELTA;
        }

        let dt = self.simulator.config().dt;
        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= dt {
            self.accumulator -= dt;
            ticks += 1;
            if let Some(scorer) = self.simulator.step(intent) {
                match scorer {
                    Scorer::Player => info!("Player scores"),
                    Scorer::Opponent => info!("Opponent scores"),
                }
            }
        }
        ticks
    }
}

/// Runs the windowed game until the player quits.
pub async fn run(config: MatchConfig) {
    let mut game = LocalGame::new(config);
    let mut input = InputManager::new();
    let mut renderer = Renderer::new();

    loop {
        let frame = input.update();
        if frame.quit {
            info!("Quitting local game");
            break;
        }
        if frame.pause_pressed {
            game.toggle_pause();
        }

        game.advance(get_frame_time(), frame.intent);
        renderer.render(game.simulator(), game.is_paused());

        next_frame().await;
    }
}
