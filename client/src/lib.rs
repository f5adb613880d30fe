//! # Local Game Client
//!
//! Windowed front end for playing against the built-in opponent. It only
//! reads simulation state and feeds keyboard intents in; all game rules live
//! in the `shared` crate.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! - Fixed-step accumulator over variable frame times
//! - Pause handling
//! - The window loop tying input, simulation and drawing together
//!
//! ### Input Module (`input`)
//! - W/Up and S/Down for the player paddle, P to pause, Escape to quit
//! - Edge detection so a held pause key toggles once
//!
//! ### Rendering Module (`rendering`)
//! - Paddles, balls and falling power-ups
//! - Score line and active effect timers
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::LocalGame;
//! use shared::{MatchConfig, PaddleAction};
//!
//! let mut game = LocalGame::new(MatchConfig::default());
//!
//! // Feed a 16 ms frame with the up key held
//! let ticks = game.advance(0.016, PaddleAction::Up);
//! println!("ran {} ticks", ticks);
//! ```

pub mod game;
pub mod input;
pub mod rendering;
