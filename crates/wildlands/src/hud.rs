//! # Player HUD
//!
//! Health bar, skill levels and inventory, emitted as panel/text commands to
//! an [`Overlay`] collaborator in screen pixels (origin top-left).

use crate::gameplay::player::Player;
use crate::gameplay::skills::Skill;

/// Screen-space rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// 2D overlay sink.
pub trait Overlay {
    /// Filled rectangle.
    fn draw_panel(&mut self, rect: Rect, color: [f32; 4]);

    /// Single line of text at `position`.
    fn draw_text(&mut self, position: [f32; 2], text: &str, color: [f32; 4]);
}

const MARGIN: f32 = 16.0;
const BAR_WIDTH: f32 = 200.0;
const BAR_HEIGHT: f32 = 18.0;
const LINE_HEIGHT: f32 = 20.0;

const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
const HEALTH_FILL: [f32; 4] = [0.8, 0.15, 0.15, 1.0];
const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const COMBAT_TEXT: [f32; 4] = [1.0, 0.5, 0.3, 1.0];

fn skill_line(name: &str, skill: &Skill) -> String {
    format!("{name} {} ({}/{})", skill.level, skill.experience, skill.threshold())
}

/// Draws the player HUD.
pub fn draw_player_hud(overlay: &mut dyn Overlay, player: &Player) {
    let frame = Rect::new(MARGIN, MARGIN, BAR_WIDTH, BAR_HEIGHT);
    overlay.draw_panel(frame, BACKGROUND);

    let fraction = if player.max_health() > 0.0 {
        (player.health() / player.max_health()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    overlay.draw_panel(Rect::new(frame.x, frame.y, frame.width * fraction, frame.height), HEALTH_FILL);
    overlay.draw_text(
        [frame.x + 4.0, frame.y + 2.0],
        &format!("{:.0} / {:.0}", player.health(), player.max_health()),
        TEXT,
    );

    let mut y = frame.y + frame.height + 8.0;
    let skills = player.skills();
    for line in [
        skill_line("Agility", &skills.agility),
        skill_line("Strength", &skills.strength),
        skill_line("Mining", &skills.mining),
    ] {
        overlay.draw_text([MARGIN, y], &line, TEXT);
        y += LINE_HEIGHT;
    }

    for (kind, count) in player.inventory().iter() {
        overlay.draw_text([MARGIN, y], &format!("{}: {count}", kind.name()), TEXT);
        y += LINE_HEIGHT;
    }

    if player.is_in_combat() {
        overlay.draw_text([MARGIN, y], "In combat", COMBAT_TEXT);
    }
}
