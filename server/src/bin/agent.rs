//! Scripted reference agent: keeps the bot paddle level with the first ball.

use clap::Parser;
use log::{info, warn};
use server::codec::{ActionMessage, StateData, StateMessage};
use shared::PaddleAction;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Vertical distance the agent tolerates before moving.
const DEADZONE: f32 = 10.0;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Address of the Pong server
    #[clap(short, long, default_value = "127.0.0.1:6000")]
    server: String,
    /// Number of ticks to play before disconnecting
    #[clap(short, long, default_value = "600")]
    ticks: u64,
}

// Seconds since the epoch, like the Python environment sends
fn get_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs_f64()
}

fn choose_action(state: &StateData) -> PaddleAction {
    let Some(ball) = state.balls.first() else {
        return PaddleAction::Stay;
    };

    let diff = ball.y - state.bot_paddle.y;
    if diff > DEADZONE {
        PaddleAction::Down
    } else if diff < -DEADZONE {
        PaddleAction::Up
    } else {
        PaddleAction::Stay
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let stream = TcpStream::connect(&args.server).await?;
    info!("Connected to {}", args.server);

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    for tick in 0..args.ticks {
        let Some(line) = lines.next_line().await? else {
            info!("Server closed the connection after {} ticks", tick);
            return Ok(());
        };

        let action = match serde_json::from_str::<StateMessage>(&line) {
            Ok(message) => {
                if tick % 60 == 0 {
                    let scores = message.data.scores;
                    info!(
                        "Tick {}: {} ball(s), score {} - {}",
                        tick,
                        message.data.balls.len(),
                        scores.player,
                        scores.bot
                    );
                }
                choose_action(&message.data)
            }
            Err(e) => {
                warn!("Failed to decode state: {}", e);
                PaddleAction::Stay
            }
        };

        let mut reply = serde_json::to_string(&ActionMessage::new(action, get_timestamp()))?;
        reply.push('\n');
        writer.write_all(reply.as_bytes()).await?;
    }

    info!("Agent finished after {} ticks", args.ticks);
    Ok(())
}
