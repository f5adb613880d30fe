//! # Agent Protocol Server
//!
//! This library exposes the Pong simulation to an external agent as a
//! step-function service over TCP. Each exchange sends the agent the current
//! match state and waits for its reply before advancing the match by one
//! fixed tick.
//!
//! ## Core Responsibilities
//!
//! ### Lockstep Simulation
//! The server owns the one [`shared::Simulator`] for the match. It never
//! advances the simulation on its own: a tick happens only after the agent
//! has answered the previous state, so the agent always sees every frame.
//!
//! ### Session Handling
//! Agents are served strictly one at a time. When an agent disconnects or the
//! connection fails, the server goes back to accepting and the next agent
//! continues the same match with the scores intact.
//!
//! ### Wire Format
//! State goes out as one newline-terminated JSON object per tick. Replies are
//! scanned for an `"action":` key instead of being parsed as strict JSON, and
//! anything unusable leaves the opponent's previous action in place.
//!
//! ## Module Organization
//!
//! ### Codec Module (`codec`)
//! - Outbound state message structs and [`codec::StateCodec`]
//! - Fail-open inbound action scanning with [`codec::parse_action`]
//!
//! ### Session Module (`session`)
//! - The per-connection send / receive / step loop
//! - Optional receive timeout and tick throttling
//! - [`session::SessionReport`] describing how and when a session ended
//!
//! ### Network Module (`network`)
//! - [`network::ServerConfig`] and listener setup
//! - The sequential accept loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::{Server, ServerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::bind(ServerConfig::default()).await?;
//!
//!     // Accepts agents forever, one session at a time
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod network;
pub mod session;

pub use network::{Server, ServerConfig, ServerError};
