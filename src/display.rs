/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// simulation.  No game logic is performed; this module only scales board
/// coordinates into terminal cells and translates state into terminal
/// commands.  Overlay opacity maps to a greyscale foreground colour.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use gravity_bird::entities::{Obstacle, ObstacleKind, Phase};
use gravity_bird::resources::{ImageKey, ResourceBundle, Sprite};
use gravity_bird::sim::GameSimulation;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BG_NORMAL: Color = Color::DarkBlue;
const C_BG_INVERTED: Color = Color::DarkMagenta;
const C_PIPE: Color = Color::Green;
const C_INVERTER: Color = Color::Magenta;
const C_BIRD: Color = Color::Yellow;
const C_SCORE: Color = Color::Yellow;
const C_BEST: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

// ── Board-to-cell scaling ─────────────────────────────────────────────────────

/// Maps board-space f64 coordinates onto the terminal cell grid.
struct Viewport {
    cols: u16,
    rows: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(cols: u16, rows: u16, board_width: f64, board_height: f64) -> Self {
        Self {
            cols,
            rows,
            sx: cols as f64 / board_width,
            sy: rows as f64 / board_height,
        }
    }

    fn col(&self, x: f64) -> i32 {
        (x * self.sx).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y * self.sy).floor() as i32
    }
}

/// Overlay opacity as a greyscale foreground colour.
fn fade_color(opacity: f64) -> Color {
    let v = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb { r: v, g: v, b: v }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    sim: &GameSimulation,
    bundle: &ResourceBundle,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let config = sim.config();
    let vp = Viewport::new(cols, rows, config.board_width, config.board_height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, &vp, sim, bundle)?;

    for obstacle in sim.obstacles() {
        draw_obstacle(out, &vp, obstacle, bundle)?;
    }

    draw_bird(out, &vp, sim, bundle)?;
    draw_score(out, &vp, sim)?;
    draw_controls_hint(out, &vp)?;

    if sim.tute_opacity() > 0.0 {
        draw_sprite_centered(
            out,
            &vp,
            bundle.image(ImageKey::GameTute),
            fade_color(sim.tute_opacity()),
            0,
        )?;
    }

    if sim.phase() == Phase::Over {
        draw_game_over(out, &vp, sim, bundle)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sim: &GameSimulation,
    bundle: &ResourceBundle,
) -> std::io::Result<()> {
    let color = if sim.gravity_inverted() {
        C_BG_INVERTED
    } else {
        C_BG_NORMAL
    };
    let cell = bundle.image(ImageKey::GameBackground).rows[0];
    let line = cell.repeat(vp.cols as usize);

    out.queue(style::SetForegroundColor(color))?;
    for row in 0..vp.rows {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(
    out: &mut W,
    vp: &Viewport,
    obstacle: &Obstacle,
    bundle: &ResourceBundle,
) -> std::io::Result<()> {
    match obstacle.kind {
        ObstacleKind::Pipe => {
            let cell = bundle.image(obstacle.image).rows[0];
            fill_rect(out, vp, obstacle, cell, C_PIPE)
        }
        ObstacleKind::GravityInverter => {
            let sprite = bundle.image(obstacle.image);
            let cx = obstacle.x + obstacle.width / 2.0;
            let cy = obstacle.y + obstacle.height / 2.0;
            let col = vp.col(cx) - sprite.width() as i32 / 2;
            let row = vp.row(cy);
            draw_sprite_at(out, vp, sprite, col, row, C_INVERTER)
        }
    }
}

/// Fill an obstacle's cell-space rectangle with a one-character sprite cell,
/// clipped to the terminal.
fn fill_rect<W: Write>(
    out: &mut W,
    vp: &Viewport,
    obstacle: &Obstacle,
    cell: &str,
    color: Color,
) -> std::io::Result<()> {
    let c0 = vp.col(obstacle.x).max(0);
    let c1 = vp.col(obstacle.x + obstacle.width).min(vp.cols as i32);
    let r0 = vp.row(obstacle.y).max(0);
    let r1 = vp.row(obstacle.y + obstacle.height).min(vp.rows as i32);
    if c0 >= c1 || r0 >= r1 {
        return Ok(());
    }

    let line = cell.repeat((c1 - c0) as usize);
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0 as u16, row as u16))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_bird<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sim: &GameSimulation,
    bundle: &ResourceBundle,
) -> std::io::Result<()> {
    let bird = sim.bird();
    let sprite = bundle.image(bird.frame_image());
    let col = vp.col(bird.x);
    let row = vp.row(bird.y + bird.height / 2.0);
    draw_sprite_at(out, vp, sprite, col, row, C_BIRD)
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Draw a sprite with its top-left at (col, row), skipping rows that land
/// outside the terminal.  Columns are not clipped; callers keep sprites
/// narrow enough to fit.
fn draw_sprite_at<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sprite: &Sprite,
    col: i32,
    row: i32,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in sprite.rows.iter().enumerate() {
        let r = row + i as i32;
        if r < 0 || r >= vp.rows as i32 || col < 0 {
            continue;
        }
        if col + sprite.width() as i32 > vp.cols as i32 {
            continue;
        }
        out.queue(cursor::MoveTo(col as u16, r as u16))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

/// Draw a sprite centered on the terminal, shifted down by `row_offset`.
fn draw_sprite_centered<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sprite: &Sprite,
    color: Color,
    row_offset: i32,
) -> std::io::Result<()> {
    let col = vp.cols as i32 / 2 - sprite.width() as i32 / 2;
    let row = vp.rows as i32 / 2 - sprite.height() as i32 / 2 + row_offset;
    draw_sprite_at(out, vp, sprite, col, row, color)
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_score<W: Write>(out: &mut W, vp: &Viewport, sim: &GameSimulation) -> std::io::Result<()> {
    if sim.phase() == Phase::Open {
        return Ok(());
    }
    let score_str = format!("{}", sim.score().floor() as i64);
    let col = (vp.cols / 2).saturating_sub(score_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&score_str))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE : Flap   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    vp: &Viewport,
    sim: &GameSimulation,
    bundle: &ResourceBundle,
) -> std::io::Result<()> {
    let card = bundle.image(ImageKey::GameOver);
    draw_sprite_centered(out, vp, card, fade_color(sim.over_opacity()), 0)?;

    let score = sim.score().floor() as i64;
    let best = sim.best_score().floor() as i64;
    let score_line = format!("Score: {:>5}", score);
    let best_line = if score >= best && score > 0 {
        format!("★ NEW BEST: {:>5} ★", best)
    } else {
        format!("Best:  {:>5}", best)
    };
    let best_color = if score >= best && score > 0 {
        C_SCORE
    } else {
        C_BEST
    };

    let cx = vp.cols as i32 / 2;
    let base = vp.rows as i32 / 2 + card.height() as i32 / 2 + 1;

    out.queue(cursor::MoveTo(
        (cx - score_line.chars().count() as i32 / 2).max(0) as u16,
        base.clamp(0, vp.rows as i32 - 1) as u16,
    ))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&score_line))?;

    out.queue(cursor::MoveTo(
        (cx - best_line.chars().count() as i32 / 2).max(0) as u16,
        (base + 1).clamp(0, vp.rows as i32 - 1) as u16,
    ))?;
    out.queue(style::SetForegroundColor(best_color))?;
    out.queue(Print(&best_line))?;

    let hint = "SPACE - Play Again  Q - Quit";
    out.queue(cursor::MoveTo(
        (cx - hint.chars().count() as i32 / 2).max(0) as u16,
        (base + 2).clamp(0, vp.rows as i32 - 1) as u16,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
