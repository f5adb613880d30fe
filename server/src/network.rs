//! Server network layer: a TCP listener that serves one agent at a time.

use crate::session::{Session, SessionReport};
use log::{error, info};
use shared::{MatchConfig, PaddleAction, Simulator};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Action the opponent holds before any agent has answered.
const INITIAL_OPPONENT_ACTION: PaddleAction = PaddleAction::Up;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub addr: String,
    /// Minimum wall-clock time per tick. Zero disables throttling.
    pub tick_duration: Duration,
    /// How long to wait for an agent's answer. `None` waits forever.
    pub recv_timeout: Option<Duration>,
    /// Send real `power_ups` / `active_effects` instead of empty arrays.
    pub report_power_ups: bool,
    pub match_config: MatchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "0.0.0.0:6000".to_string(),
            tick_duration: Duration::from_millis(16),
            recv_timeout: None,
            report_power_ups: false,
            match_config: MatchConfig::default(),
        }
    }
}

/// Owns the listener and the match. Sessions borrow the match in turn, so
/// scores carry over from one agent to the next.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    simulator: Simulator,
    sessions_served: u64,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = match TcpListener::bind(&config.addr).await {
            Ok(listener) => listener,
            Err(source) => {
                error!("Failed to bind {}: {}", config.addr, source);
                return Err(ServerError::Bind {
                    addr: config.addr.clone(),
                    source,
                });
            }
        };
        info!("Server listening on {}", listener.local_addr()?);

        let mut simulator = Simulator::new(config.match_config.clone());
        simulator.set_opponent_action(INITIAL_OPPONENT_ACTION);

        Ok(Server {
            listener,
            config,
            simulator,
            sessions_served: 0,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn sessions_served(&self) -> u64 {
        self.sessions_served
    }

    /// Accepts the next agent and serves it until its session ends.
    pub async fn serve_one(&mut self) -> Result<SessionReport, ServerError> {
        let (stream, peer) = self.listener.accept().await?;
        info!("Agent connected from {}", peer);

        let session = Session::new(stream, peer, &self.config);
        let report = session.run(&mut self.simulator).await;
        self.sessions_served += 1;

        let state = self.simulator.state();
        info!(
            "Ready for next agent ({} served, score {} - {})",
            self.sessions_served, state.player_score, state.opponent_score
        );
        Ok(report)
    }

    /// Serves agents one after another. Only returns if the task is dropped.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Server started successfully");

        loop {
            if let Err(e) = self.serve_one().await {
                error!("Error accepting connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, "0.0.0.0:6000");
        assert_eq!(config.tick_duration, Duration::from_millis(16));
        assert!(config.recv_timeout.is_none());
        assert!(!config.report_power_ups);
        assert_eq!(config.match_config.seed, shared::DEFAULT_SEED);
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let config = ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            ..ServerConfig::default()
        };
        let server = Server::bind(config).await.unwrap();

        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert_eq!(server.sessions_served(), 0);
        assert_eq!(
            server.simulator().opponent_control(),
            shared::OpponentControl::External(PaddleAction::Up)
        );
    }

    #[tokio::test]
    async fn test_bind_failure_reports_address() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let config = ServerConfig {
            addr: addr.clone(),
            ..ServerConfig::default()
        };
        let err = match Server::bind(config).await {
            Ok(_) => panic!("bind to a used port should fail"),
            Err(e) => e,
        };

        match &err {
            ServerError::Bind { addr: a, .. } => assert_eq!(a, &addr),
            other => panic!("unexpected error: {}", other),
        }
        assert!(err.to_string().contains(&addr));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_bind_invalid_address() {
        let config = ServerConfig {
            addr: "not an address".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            Server::bind(config).await,
            Err(ServerError::Bind { .. })
        ));
    }
}
