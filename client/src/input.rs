//! Keyboard sampling for the local game

use macroquad::prelude::*;
use shared::PaddleAction;

/// Raw key states for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeySample {
    pub up: bool,
    pub down: bool,
    pub pause: bool,
    pub quit: bool,
}

/// What the game loop acts on after a frame's input has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub intent: PaddleAction,
    /// True only on the frame the pause key goes down.
    pub pause_pressed: bool,
    pub quit: bool,
}

/// Turns key states into paddle intents and pause toggles
pub struct InputManager {
    // Previous frame pause key state for edge detection
    prev_pause: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self { prev_pause: false }
    }

    /// Samples the keyboard (W/Up, S/Down, P, Escape) and interprets it.
    pub fn update(&mut self) -> FrameInput {
        let keys = KeySample {
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            pause: is_key_down(KeyCode::P),
            quit: is_key_down(KeyCode::Escape),
        };
        self.interpret(keys)
    }

    pub fn interpret(&mut self, keys: KeySample) -> FrameInput {
        let pause_pressed = keys.pause && !self.prev_pause;
        self.prev_pause = keys.pause;

        FrameInput {
            intent: PaddleAction::from_keys(keys.up, keys.down),
            pause_pressed,
            quit: keys.quit,
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
