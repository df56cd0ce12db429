/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only projects world
/// coordinates onto the terminal grid and translates state into terminal
/// commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::consts::*;
use crate::entities::{
    Bullet, Enemy, GameState, GameStatus, Obstacle, ObstacleKind, PowerUp, PowerUpKind, Soldier,
    Wall, WallOp,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LANE: Color = Color::DarkBlue;
const C_HUD_SQUAD: Color = Color::White;
const C_HUD_KILLS: Color = Color::Yellow;
const C_HUD_CADENCE: Color = Color::Cyan;
const C_SOLDIER: Color = Color::White;
const C_ENEMY_IDLE: Color = Color::DarkRed;
const C_ENEMY_CHASING: Color = Color::Red;
const C_BULLET: Color = Color::Cyan;
const C_OBSTACLE: Color = Color::Green;
const C_DEBUFF: Color = Color::Magenta;
const C_WALL_GOOD: Color = Color::Blue;
const C_WALL_BAD: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

// ── Projection ────────────────────────────────────────────────────────────────

/// Maps world units onto the terminal play area (rows 1 .. rows-2).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    fn play_rows(&self) -> f32 {
        self.rows.saturating_sub(3).max(1) as f32
    }

    pub fn col(&self, x: f32) -> u16 {
        let c = x / WORLD_WIDTH * self.cols as f32;
        c.clamp(0.0, self.cols.saturating_sub(1) as f32) as u16
    }

    /// `None` when `y` lies outside the visible play area.
    pub fn row(&self, y: f32) -> Option<u16> {
        if !(0.0..=WORLD_HEIGHT).contains(&y) {
            return None;
        }
        let r = 1.0 + y / WORLD_HEIGHT * self.play_rows();
        Some((r as u16).min(self.rows.saturating_sub(2)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_lane(out, view)?;
    draw_hud(out, state, view)?;

    for wall in &state.walls {
        draw_wall(out, wall, view)?;
    }
    for obstacle in state.obstacles.iter().filter(|o| o.is_live()) {
        draw_obstacle(out, obstacle, view)?;
    }
    for power_up in state.power_ups.iter().filter(|p| !p.active) {
        draw_power_up(out, power_up, view)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, view)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, view)?;
    }
    for soldier in &state.squad {
        draw_soldier(out, soldier, view)?;
    }

    draw_controls_hint(out, view)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Lane ──────────────────────────────────────────────────────────────────────

fn draw_lane<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LANE))?;
    let left = view.col(LANE_LEFT);
    let right = view.col(LANE_RIGHT);
    for row in 1..view.rows.saturating_sub(1) {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(right, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SQUAD))?;
    out.queue(Print(format!("Soldiers: {:>3}", state.squad_size())))?;

    out.queue(Print("   "))?;
    out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
    out.queue(Print(format!("Kills: {:>5}", state.kills)))?;

    out.queue(Print("   "))?;
    out.queue(style::SetForegroundColor(C_HUD_CADENCE))?;
    out.queue(Print(format!("Fire every {} ms", state.shoot_interval_ms)))?;

    // Active power-ups — right
    let active: Vec<&str> = state
        .power_ups
        .iter()
        .filter(|p| p.active)
        .map(|p| match p.kind {
            PowerUpKind::Speed => "[SPEED]",
            PowerUpKind::BulletSpeed => "[RAPID]",
        })
        .collect();
    if !active.is_empty() {
        let text = active.join(" ");
        let x = view.cols.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(text))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn wall_color(op: WallOp) -> Color {
    match op {
        WallOp::Add2 | WallOp::Mul2 => C_WALL_GOOD,
        WallOp::Sub2 | WallOp::Div2 => C_WALL_BAD,
    }
}

fn draw_wall<W: Write>(out: &mut W, wall: &Wall, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(wall.y1) else {
        return Ok(());
    };
    let c1 = view.col(wall.x1);
    let c2 = view.col(wall.x2);
    out.queue(style::SetForegroundColor(wall_color(wall.op)))?;
    out.queue(cursor::MoveTo(c1, row))?;
    out.queue(Print("═".repeat((c2.saturating_sub(c1) + 1) as usize)))?;

    // Operation glyph centred on the wall
    let glyph = wall.op.glyph();
    let mid = (c1 + c2) / 2;
    out.queue(cursor::MoveTo(mid.saturating_sub(1), row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(glyph))?;
    Ok(())
}

fn draw_soldier<W: Write>(out: &mut W, soldier: &Soldier, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(soldier.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_SOLDIER))?;
    out.queue(cursor::MoveTo(view.col(soldier.x + soldier.size / 2.0), row))?;
    out.queue(Print("☺"))?;
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(enemy.y) else {
        return Ok(());
    };
    let color = if enemy.moving { C_ENEMY_CHASING } else { C_ENEMY_IDLE };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(view.col(enemy.x), row))?;
    out.queue(Print("●"))?;
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(bullet.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_BULLET))?;
    out.queue(cursor::MoveTo(view.col(bullet.x), row))?;
    out.queue(Print("·"))?;
    Ok(())
}

fn draw_obstacle<W: Write>(out: &mut W, obstacle: &Obstacle, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(obstacle.y) else {
        return Ok(());
    };
    let (color, shape) = match obstacle.kind {
        ObstacleKind::Normal => (C_OBSTACLE, "■"),
        ObstacleKind::Debuff => (C_DEBUFF, "▣"),
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(view.col(obstacle.x).saturating_sub(1), row))?;
    out.queue(Print(format!("{}{}", shape, obstacle.life)))?;
    Ok(())
}

fn draw_power_up<W: Write>(out: &mut W, power_up: &PowerUp, view: Viewport) -> std::io::Result<()> {
    let Some(row) = view.row(power_up.y) else {
        return Ok(());
    };
    let (color, symbol) = match power_up.kind {
        PowerUpKind::Speed => (Color::Yellow, "»"),
        PowerUpKind::BulletSpeed => (Color::Cyan, "!"),
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(view.col(power_up.x), row))?;
    out.queue(Print(symbol))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   M : Mute   ESC / Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    let kills_line = format!("Enemies destroyed: {}", state.kills);
    let sets_line = format!("Wall sets reached: {}", state.next_set_id.saturating_sub(1));
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&kills_line,            Color::Yellow),
        (&sets_line,             Color::Yellow),
        ("ESC / Q - Quit",       Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
