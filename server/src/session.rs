//! A single agent connection driving the match one tick per exchange.

use crate::codec::{parse_action, StateCodec};
use crate::network::ServerConfig;
use log::{debug, error, info, warn};
use shared::{PaddleAction, Simulator};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{interval, timeout, Interval, MissedTickBehavior};

/// Largest inbound message read per tick.
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The agent closed its side of the connection.
    PeerClosed,
    RecvFailed(io::Error),
    SendFailed(io::Error),
    /// No answer arrived within the configured receive timeout.
    TimedOut,
    EncodeFailed(serde_json::Error),
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEnd::PeerClosed => write!(f, "peer closed the connection"),
            SessionEnd::RecvFailed(e) => write!(f, "receive failed: {}", e),
            SessionEnd::SendFailed(e) => write!(f, "send failed: {}", e),
            SessionEnd::TimedOut => write!(f, "timed out waiting for an action"),
            SessionEnd::EncodeFailed(e) => write!(f, "state encoding failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct SessionReport {
    pub peer: SocketAddr,
    /// Ticks the simulator advanced during this session.
    pub ticks: u64,
    pub end: SessionEnd,
}

/// Owns one agent stream until the exchange ends.
///
/// Each iteration sends the current state, waits for one inbound message,
/// applies any action it carries to the opponent paddle and advances the
/// simulator by exactly one tick. The stream is dropped when [`Session::run`]
/// returns, whatever the outcome.
pub struct Session<S> {
    stream: S,
    peer: SocketAddr,
    codec: StateCodec,
    tick_duration: Duration,
    recv_timeout: Option<Duration>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, config: &ServerConfig) -> Self {
        Session {
            stream,
            peer,
            codec: StateCodec::new(config.report_power_ups),
            tick_duration: config.tick_duration,
            recv_timeout: config.recv_timeout,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub async fn run(mut self, sim: &mut Simulator) -> SessionReport {
        let mut throttle = self.throttle();
        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        let mut ticks = 0;

        let end = loop {
            let mut line = match self.codec.encode(sim) {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to encode state for {}: {}", self.peer, e);
                    break SessionEnd::EncodeFailed(e);
                }
            };
            line.push('\n');

            if let Err(e) = self.stream.write_all(line.as_bytes()).await {
                break SessionEnd::SendFailed(e);
            }

            let received = match self.recv_timeout {
                Some(limit) => match timeout(limit, self.stream.read(&mut buffer)).await {
                    Ok(result) => result,
                    Err(_) => break SessionEnd::TimedOut,
                },
                None => self.stream.read(&mut buffer).await,
            };

            let len = match received {
                Ok(0) => break SessionEnd::PeerClosed,
                Ok(len) => len,
                Err(e) => break SessionEnd::RecvFailed(e),
            };

            self.apply_message(&buffer[..len], sim);
            sim.step(PaddleAction::Stay);
            ticks += 1;

            if let Some(throttle) = throttle.as_mut() {
                throttle.tick().await;
            }
        };

        match &end {
            SessionEnd::PeerClosed => info!("Agent {} disconnected after {} ticks", self.peer, ticks),
            other => warn!("Session with {} ended after {} ticks: {}", self.peer, ticks, other),
        }

        SessionReport {
            peer: self.peer,
            ticks,
            end,
        }
    }

    fn apply_message(&self, bytes: &[u8], sim: &mut Simulator) {
        let message = String::from_utf8_lossy(bytes);
        match parse_action(&message) {
            Some(action) => sim.set_opponent_action(action),
            None => debug!(
                "No usable action from {}, keeping the previous one: {:?}",
                self.peer,
                message.trim_end()
            ),
        }
    }

    /// A zero tick duration runs the exchange unthrottled.
    fn throttle(&self) -> Option<Interval> {
        if self.tick_duration.is_zero() {
            return None;
        }
        let mut throttle = interval(self.tick_duration);
        throttle.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Some(throttle)
    }
}
