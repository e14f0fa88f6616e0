/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::entities::{EnemyColor, GameState, GameStatus, Laser, Ship, ShipKind};
use space_shooter::sprite::Sprite;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TEXT: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_HEALTH_FULL: Color = Color::Green;
const C_HEALTH_LOST: Color = Color::Red;

fn ship_color(kind: ShipKind) -> Color {
    match kind {
        ShipKind::Player => Color::Yellow,
        ShipKind::Enemy(EnemyColor::Red) => Color::Red,
        ShipKind::Enemy(EnemyColor::Green) => Color::Green,
        ShipKind::Enemy(EnemyColor::Blue) => Color::Blue,
    }
}

fn laser_color(kind: ShipKind) -> Color {
    match kind {
        ShipKind::Player => Color::Yellow,
        ShipKind::Enemy(EnemyColor::Red) => Color::DarkRed,
        ShipKind::Enemy(EnemyColor::Green) => Color::DarkGreen,
        ShipKind::Enemy(EnemyColor::Blue) => Color::Cyan,
    }
}

/// Row of the centred banner lines, at 350/750 of the screen height.
fn banner_row(height: u16) -> u16 {
    (height as u32 * 350 / 750) as u16
}

fn centred_col(width: u16, text: &str) -> u16 {
    (width / 2).saturating_sub(text.chars().count() as u16 / 2)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "Press the mouse to begin...";
    let row = banner_row(height);
    out.queue(cursor::MoveTo(centred_col(width, title), row))?;
    out.queue(style::SetForegroundColor(C_TEXT))?;
    out.queue(Print(title))?;

    let lines = [
        "(or Enter)   Q : Quit",
        "W A S D / arrows : Move   SPACE : Shoot",
    ];
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(centred_col(width, line), row + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(*line))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, state)?;

    for enemy in &state.enemies {
        draw_ship(out, state, enemy)?;
    }

    draw_ship(out, state, &state.player)?;
    draw_health_bar(out, state)?;

    if matches!(state.status, GameStatus::Lost { .. } | GameStatus::Finished) {
        draw_lost(out, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TEXT))?;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(Print(format!("Lives: {}", state.lives)))?;

    let level_str = format!("Level: {}", state.level);
    let lx = state
        .width
        .saturating_sub(level_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(Print(&level_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Blit `sprite` at (x, y), skipping transparent cells and anything that
/// falls outside the screen.
fn blit<W: Write>(
    out: &mut W,
    state: &GameState,
    sprite: &Sprite,
    x: i32,
    y: i32,
) -> std::io::Result<()> {
    let (w, h) = (state.width as i32, state.height as i32);
    for (dy, row) in sprite.rows().iter().enumerate() {
        let cy = y + dy as i32;
        if cy < 0 || cy >= h {
            continue;
        }
        for (dx, ch) in row.iter().enumerate() {
            let cx = x + dx as i32;
            if *ch == ' ' || cx < 0 || cx >= w {
                continue;
            }
            out.queue(cursor::MoveTo(cx as u16, cy as u16))?;
            out.queue(Print(*ch))?;
        }
    }
    Ok(())
}

fn draw_ship<W: Write>(out: &mut W, state: &GameState, ship: &Ship) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(ship_color(ship.kind)))?;
    blit(out, state, state.sprites.ship(ship.kind), ship.x, ship.y)?;

    for laser in &ship.lasers {
        draw_laser(out, state, laser)?;
    }
    Ok(())
}

fn draw_laser<W: Write>(out: &mut W, state: &GameState, laser: &Laser) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(laser_color(laser.owner)))?;
    blit(out, state, state.sprites.laser(laser.owner), laser.x, laser.y)
}

/// One row under the player ship: green for health left, red for health lost.
fn draw_health_bar<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let body = state.sprites.ship(ShipKind::Player);
    let row = p.y + body.height();
    if row < 0 || row >= state.height as i32 {
        return Ok(());
    }

    let width = body.width();
    let ratio = if p.max_health > 0 {
        (p.health as f32 / p.max_health as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let full = (width as f32 * ratio).round() as i32;

    for i in 0..width {
        let col = p.x + i;
        if col < 0 || col >= state.width as i32 {
            continue;
        }
        let color = if i < full { C_HEALTH_FULL } else { C_HEALTH_LOST };
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print('█'))?;
    }
    Ok(())
}

// ── Lost overlay ──────────────────────────────────────────────────────────────

fn draw_lost<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let msg = "You Lost!!";
    out.queue(cursor::MoveTo(
        centred_col(state.width, msg),
        banner_row(state.height),
    ))?;
    out.queue(style::SetForegroundColor(C_TEXT))?;
    out.queue(Print(msg))?;
    Ok(())
}
