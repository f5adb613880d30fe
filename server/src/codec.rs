//! Newline-delimited JSON wire format.
//!
//! Outbound, every tick the server writes one [`StateMessage`] line. Inbound,
//! the agent answers with any text containing `"action":` followed by an
//! integer; [`parse_action`] extracts it without requiring valid JSON.

use serde::{Deserialize, Serialize};
use shared::{MatchState, PaddleAction, PowerUpManager, Simulator};

/// Key the inbound scanner looks for.
const ACTION_KEY: &str = "\"action\":";

/// One outbound line. The state sits under a top-level `data` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMessage {
    pub data: StateData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    pub balls: Vec<BallState>,
    pub player_paddle: PaddleState,
    pub bot_paddle: PaddleState,
    pub scores: Scores,
    pub power_ups: Vec<PowerUpState>,
    pub active_effects: Vec<EffectState>,
}

/// Ball center and raw velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Paddle center and current size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player: u32,
    pub bot: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpState {
    #[serde(rename = "type")]
    pub kind: u8,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    #[serde(rename = "type")]
    pub kind: u8,
    pub time_left: f32,
}

/// Inbound message in the shape the reference agents send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ActionData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    pub action: i32,
    pub timestamp: f64,
}

impl ActionMessage {
    pub fn new(action: PaddleAction, timestamp: f64) -> Self {
        ActionMessage {
            kind: "action".to_string(),
            data: ActionData {
                action: action.to_wire(),
                timestamp,
            },
        }
    }
}

/// Turns simulation state into wire lines.
///
/// By default `power_ups` and `active_effects` are always sent empty, which is
/// what existing agents expect. `report_power_ups` fills them in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCodec {
    report_power_ups: bool,
}

impl StateCodec {
    pub fn new(report_power_ups: bool) -> Self {
        StateCodec { report_power_ups }
    }

    pub fn reports_power_ups(&self) -> bool {
        self.report_power_ups
    }

    pub fn snapshot(&self, state: &MatchState, power_ups: &PowerUpManager) -> StateMessage {
        let balls = state
            .balls
            .iter()
            .map(|ball| {
                let center = ball.center();
                BallState {
                    x: center.x,
                    y: center.y,
                    vx: ball.velocity.x,
                    vy: ball.velocity.y,
                }
            })
            .collect();

        let (power_up_list, effect_list) = if self.report_power_ups {
            (
                power_ups
                    .power_ups()
                    .iter()
                    .map(|p| {
                        let center = p.center();
                        PowerUpState {
                            kind: p.kind().code(),
                            x: center.x,
                            y: center.y,
                        }
                    })
                    .collect(),
                power_ups
                    .active_effects()
                    .iter()
                    .map(|e| EffectState {
                        kind: e.kind.code(),
                        time_left: e.time_left,
                    })
                    .collect(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        StateMessage {
            data: StateData {
                balls,
                player_paddle: paddle_state(&state.player_paddle),
                bot_paddle: paddle_state(&state.opponent_paddle),
                scores: Scores {
                    player: state.player_score,
                    bot: state.opponent_score,
                },
                power_ups: power_up_list,
                active_effects: effect_list,
            },
        }
    }

    /// Encodes the simulator's current state as one JSON line, without the
    /// trailing newline.
    pub fn encode(&self, sim: &Simulator) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot(sim.state(), sim.power_ups()))
    }
}

fn paddle_state(paddle: &shared::Paddle) -> PaddleState {
    let center = paddle.center();
    PaddleState {
        x: center.x,
        y: center.y,
        width: paddle.size.x,
        height: paddle.size.y,
    }
}

/// Extracts the action from an inbound message.
///
/// Only the first `"action":` occurrence is considered. Its token runs up to
/// the next `,` or `}` (or the end of the message) and is trimmed. Returns
/// `None` if the key is missing, the token is not an integer, or the integer
/// is outside `{-1, 0, 1}`.
pub fn parse_action(message: &str) -> Option<PaddleAction> {
    let start = message.find(ACTION_KEY)? + ACTION_KEY.len();
    let rest = &message[start..];
    let end = rest.find([',', '}']).unwrap_or(rest.len());
    let value: i64 = rest[..end].trim().parse().ok()?;
    PaddleAction::from_wire(value)
}
