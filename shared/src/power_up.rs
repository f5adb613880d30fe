//! Falling power-ups and the time-boxed effects they trigger.
//!
//! Every power-up type is described by an [`EffectSpec`] row: how often it
//! spawns, how long its effect lasts, and the functions that apply and revert
//! it. The [`PowerUpManager`] only walks that table.

use crate::entity::{Ball, Paddle};
use crate::physics::{Rect, Vector2};
use crate::{POWER_UP_FALL_SPEED, POWER_UP_RADIUS, SLOW_MOTION_MULTIPLIER, WORLD_HEIGHT, WORLD_WIDTH};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtendPaddle,
    SplitBall,
    SlowMotion,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::ExtendPaddle,
        PowerUpKind::SplitBall,
        PowerUpKind::SlowMotion,
    ];

    /// Stable numeric code used when power-ups are reported to agents.
    pub fn code(self) -> u8 {
        match self {
            PowerUpKind::ExtendPaddle => 0,
            PowerUpKind::SplitBall => 1,
            PowerUpKind::SlowMotion => 2,
        }
    }
}

/// A power-up falling from the top of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    kind: PowerUpKind,
    /// Top-left corner of the bounding box.
    pub position: Vector2,
    pub velocity: Vector2,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, position: Vector2) -> Self {
        PowerUp {
            kind,
            position,
            velocity: Vector2::new(0.0, POWER_UP_FALL_SPEED),
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn update(&mut self, dt: f32) {
        self.position = self.position.add(&self.velocity.scale(dt));
    }

    pub fn bounds(&self) -> Rect {
        let diameter = POWER_UP_RADIUS * 2.0;
        Rect::new(self.position, Vector2::new(diameter, diameter))
    }

    pub fn center(&self) -> Vector2 {
        self.bounds().center()
    }
}

/// A timed effect currently altering the match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub time_left: f32,
}

/// The parts of the match an effect may touch, borrowed for a single update.
pub struct EffectTarget<'a> {
    pub player_paddle: &'a mut Paddle,
    pub balls: &'a mut Vec<Ball>,
    /// Seed used to build any ball the effect adds.
    pub ball_seed: u64,
}

/// One row of the effect table.
#[derive(Clone, Copy)]
pub struct EffectSpec {
    pub kind: PowerUpKind,
    /// Seconds between spawns of this type.
    pub spawn_interval: f32,
    /// Lifetime of the effect; `None` for instantaneous effects.
    pub duration: Option<f32>,
    pub apply: fn(&mut EffectTarget<'_>, f32),
    pub revert: fn(&mut EffectTarget<'_>),
}

impl fmt::Debug for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectSpec")
            .field("kind", &self.kind)
            .field("spawn_interval", &self.spawn_interval)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl EffectSpec {
    pub fn extend_paddle() -> Self {
        EffectSpec {
            kind: PowerUpKind::ExtendPaddle,
            spawn_interval: 15.0,
            duration: Some(10.0),
            apply: extend_player_paddle,
            // The paddle runs its own extension timer.
            revert: no_revert,
        }
    }

    pub fn split_ball() -> Self {
        EffectSpec {
            kind: PowerUpKind::SplitBall,
            spawn_interval: 20.0,
            duration: None,
            apply: add_ball,
            revert: no_revert,
        }
    }

    pub fn slow_motion() -> Self {
        EffectSpec {
            kind: PowerUpKind::SlowMotion,
            spawn_interval: 25.0,
            duration: Some(8.0),
            apply: slow_balls,
            revert: restore_ball_speed,
        }
    }
}

/// The stock effect table.
pub fn default_effects() -> Vec<EffectSpec> {
    vec![
        EffectSpec::extend_paddle(),
        EffectSpec::split_ball(),
        EffectSpec::slow_motion(),
    ]
}

fn extend_player_paddle(target: &mut EffectTarget<'_>, duration: f32) {
    target.player_paddle.extend(duration);
}

fn add_ball(target: &mut EffectTarget<'_>, _duration: f32) {
    target.balls.push(Ball::serve(target.ball_seed));
}

fn slow_balls(target: &mut EffectTarget<'_>, _duration: f32) {
    for ball in target.balls.iter_mut() {
        ball.speed_multiplier = SLOW_MOTION_MULTIPLIER;
    }
}

fn restore_ball_speed(target: &mut EffectTarget<'_>) {
    for ball in target.balls.iter_mut() {
        ball.speed_multiplier = 1.0;
    }
}

fn no_revert(_target: &mut EffectTarget<'_>) {}

#[derive(Debug, Clone)]
struct SpawnSlot {
    spec: EffectSpec,
    timer: f32,
}

/// Owns spawn timers, in-flight power-ups and active effects.
#[derive(Debug, Clone)]
pub struct PowerUpManager {
    slots: Vec<SpawnSlot>,
    power_ups: Vec<PowerUp>,
    active_effects: Vec<ActiveEffect>,
    rng: Pcg32,
}

impl PowerUpManager {
    /// Builds a manager from an effect table. A later row for the same kind
    /// replaces an earlier one, so each kind keeps exactly one spawn timer.
    pub fn new(effects: &[EffectSpec], seed: u64) -> Self {
        let mut slots: Vec<SpawnSlot> = Vec::with_capacity(effects.len());
        for spec in effects {
            let slot = SpawnSlot {
                spec: *spec,
                timer: spec.spawn_interval,
            };
            match slots.iter_mut().find(|s| s.spec.kind == spec.kind) {
                Some(existing) => *existing = slot,
                None => slots.push(slot),
            }
        }

        PowerUpManager {
            slots,
            power_ups: Vec::new(),
            active_effects: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn active_effects(&self) -> &[ActiveEffect] {
        &self.active_effects
    }

    pub fn spawn_timer(&self, kind: PowerUpKind) -> Option<f32> {
        self.slot(kind).map(|slot| slot.timer)
    }

    pub fn spec(&self, kind: PowerUpKind) -> Option<&EffectSpec> {
        self.slot(kind).map(|slot| &slot.spec)
    }

    fn slot(&self, kind: PowerUpKind) -> Option<&SpawnSlot> {
        self.slots.iter().find(|slot| slot.spec.kind == kind)
    }

    /// Advances spawning, falling, pickup and expiry by one tick.
    pub fn update(&mut self, dt: f32, target: &mut EffectTarget<'_>) {
        self.tick_spawn_timers(dt);

        for power_up in &mut self.power_ups {
            power_up.update(dt);
        }
        self.power_ups.retain(|p| p.bounds().y <= WORLD_HEIGHT);

        self.collect(target);
        self.expire_effects(dt, target);
    }

    /// Applies `kind`'s effect directly, as if a ball had just picked it up.
    pub fn apply_effect(&mut self, kind: PowerUpKind, target: &mut EffectTarget<'_>) {
        let Some(spec) = self.spec(kind).copied() else {
            return;
        };

        (spec.apply)(target, spec.duration.unwrap_or(0.0));
        if let Some(duration) = spec.duration {
            self.active_effects.push(ActiveEffect {
                kind,
                time_left: duration,
            });
        }
        debug!("Applied {:?} effect", kind);
    }

    fn tick_spawn_timers(&mut self, dt: f32) {
        for i in 0..self.slots.len() {
            self.slots[i].timer -= dt;
            if self.slots[i].timer <= 0.0 {
                let kind = self.slots[i].spec.kind;
                self.spawn(kind);
                // Reset to the full interval; overshoot is not carried over.
                self.slots[i].timer = self.slots[i].spec.spawn_interval;
            }
        }
    }

    fn spawn(&mut self, kind: PowerUpKind) {
        let x = self.rng.gen_range(0..WORLD_WIDTH as u32) as f32;
        debug!("Spawning {:?} power-up at x={}", kind, x);
        self.power_ups.push(PowerUp::new(kind, Vector2::new(x, 0.0)));
    }

    fn collect(&mut self, target: &mut EffectTarget<'_>) {
        let mut i = 0;
        while i < self.power_ups.len() {
            let bounds = self.power_ups[i].bounds();
            let hit = target.balls.iter().any(|ball| ball.bounds().intersects(&bounds));
            if hit {
                let power_up = self.power_ups.remove(i);
                self.apply_effect(power_up.kind(), target);
            } else {
                i += 1;
            }
        }
    }

    fn expire_effects(&mut self, dt: f32, target: &mut EffectTarget<'_>) {
        let mut i = 0;
        while i < self.active_effects.len() {
            self.active_effects[i].time_left -= dt;
            if self.active_effects[i].time_left <= 0.0 {
                let effect = self.active_effects.remove(i);
                if let Some(spec) = self.spec(effect.kind).copied() {
                    (spec.revert)(target);
                }
                debug!("{:?} effect expired", effect.kind);
            } else {
                i += 1;
            }
        }
    }
}
