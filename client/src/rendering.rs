use macroquad::prelude::*;
use shared::{Paddle, PowerUpKind, Simulator, WORLD_HEIGHT, WORLD_WIDTH};

const BACKGROUND: Color = Color::new(0.1, 0.1, 0.1, 1.0);
const NET: Color = Color::new(0.27, 0.27, 0.27, 1.0);
const OPPONENT: Color = Color::new(1.0, 0.27, 0.27, 1.0);

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }

    pub fn render(&mut self, sim: &Simulator, paused: bool) {
        clear_background(BACKGROUND);

        self.draw_net();

        let state = sim.state();
        self.draw_paddle(&state.player_paddle, GREEN);
        self.draw_paddle(&state.opponent_paddle, OPPONENT);

        for power_up in sim.power_ups().power_ups() {
            let center = power_up.center();
            let radius = power_up.bounds().width / 2.0;
            draw_circle(center.x, center.y, radius, kind_color(power_up.kind()));
            draw_circle_lines(center.x, center.y, radius, 1.0, WHITE);
        }

        for ball in &state.balls {
            let center = ball.center();
            draw_circle(center.x, center.y, ball.radius, WHITE);
        }

        self.draw_effects(sim);
        self.draw_scores(state.player_score, state.opponent_score);

        if paused {
            let text = "PAUSED";
            let size = measure_text(text, None, 48, 1.0);
            draw_text(
                text,
                (self.width - size.width) / 2.0,
                self.height / 2.0,
                48.0,
                YELLOW,
            );
        }
    }

    fn draw_net(&mut self) {
        let x = self.width / 2.0 - 1.0;
        let mut y = 0.0;
        while y < self.height {
            draw_rectangle(x, y, 2.0, 12.0, NET);
            y += 24.0;
        }
    }

    fn draw_paddle(&mut self, paddle: &Paddle, color: Color) {
        let bounds = paddle.bounds();
        draw_rectangle(bounds.x, bounds.y, bounds.width, bounds.height, color);

        let outline = if paddle.extended { YELLOW } else { WHITE };
        draw_rectangle_lines(bounds.x, bounds.y, bounds.width, bounds.height, 2.0, outline);
    }

    /// One shrinking bar per active effect in the top-left corner.
    fn draw_effects(&mut self, sim: &Simulator) {
        let bar_width = 100.0;
        let manager = sim.power_ups();

        for (i, effect) in manager.active_effects().iter().enumerate() {
            let y = 10.0 + i as f32 * 16.0;
            let duration = manager
                .spec(effect.kind)
                .and_then(|spec| spec.duration)
                .unwrap_or(effect.time_left);

            draw_rectangle(40.0, y, bar_width, 8.0, NET);
            draw_rectangle(
                40.0,
                y,
                bar_width * effect_fraction(effect.time_left, duration),
                8.0,
                kind_color(effect.kind),
            );
            draw_text(kind_label(effect.kind), 10.0, y + 8.0, 14.0, WHITE);
        }
    }

    fn draw_scores(&mut self, player: u32, opponent: u32) {
        let text = format!("{}   {}", player, opponent);
        let size = measure_text(&text, None, 40, 1.0);
        draw_text(&text, (self.width - size.width) / 2.0, 40.0, 40.0, WHITE);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::ExtendPaddle => BLUE,
        PowerUpKind::SplitBall => ORANGE,
        PowerUpKind::SlowMotion => PURPLE,
    }
}

fn kind_label(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::ExtendPaddle => "EXT",
        PowerUpKind::SplitBall => "SPL",
        PowerUpKind::SlowMotion => "SLO",
    }
}

/// Share of an effect's lifetime still remaining, in `[0, 1]`.
fn effect_fraction(time_left: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    (time_left / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_fraction() {
        assert_eq!(effect_fraction(4.0, 8.0), 0.5);
        assert_eq!(effect_fraction(10.0, 8.0), 1.0);
        assert_eq!(effect_fraction(-0.1, 8.0), 0.0);
        assert_eq!(effect_fraction(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_kind_colors_are_distinct() {
        let colors: Vec<Color> = PowerUpKind::ALL.iter().map(|k| kind_color(*k)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }
}
