/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Each maze tile is drawn as two terminal columns. Actors live in pixel
/// space and are snapped to the tile their center is in.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Direction, GhostKind, Look, Rect, TILE_SIZE};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so cleared
    /// areas and drawn cells share one color.
    const BASE_BG: Color = Color::Rgb { r: 10, g: 10, b: 20 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Terminal columns per maze tile.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const WALL_FG: Color = Color::Rgb { r: 60, g: 90, b: 255 };
const WALL_BG: Color = Color::Rgb { r: 25, g: 35, b: 120 };
const FOOD_FG: Color = Color::Rgb { r: 255, g: 200, b: 170 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 230, b: 0 };
const SCARED_FG: Color = Color::Rgb { r: 60, g: 60, b: 255 };

/// Tile that holds the center of a `TILE_SIZE` actor at pixel (x, y).
/// `None` when the center is left of or above the maze.
pub fn actor_cell(x: i32, y: i32) -> Option<(usize, usize)> {
    let cx = (x + TILE_SIZE / 2).div_euclid(TILE_SIZE);
    let cy = (y + TILE_SIZE / 2).div_euclid(TILE_SIZE);
    if cx < 0 || cy < 0 { return None; }
    Some((cx as usize, cy as usize))
}

/// Tile containing a pickup box.
fn item_cell(r: Rect) -> (usize, usize) {
    ((r.x / TILE_SIZE).max(0) as usize, (r.y / TILE_SIZE).max(0) as usize)
}

/// Character and color for an actor's visual identity.
pub fn glyph_for(look: Look) -> (char, Color) {
    match look {
        Look::Player(Direction::Right) => ('ᗧ', PLAYER_FG),
        Look::Player(Direction::Left)  => ('ᗤ', PLAYER_FG),
        Look::Player(Direction::Up)    => ('ᗢ', PLAYER_FG),
        Look::Player(Direction::Down)  => ('ᗜ', PLAYER_FG),
        Look::Ghost(kind) => {
            let fg = match kind {
                GhostKind::Blue   => Color::Rgb { r: 0, g: 255, b: 255 },
                GhostKind::Orange => Color::Rgb { r: 255, g: 180, b: 80 },
                GhostKind::Pink   => Color::Rgb { r: 255, g: 180, b: 255 },
                GhostKind::Red    => Color::Rgb { r: 255, g: 40, b: 40 },
            };
            ('ᗣ', fg)
        }
        Look::ScaredGhost => ('ᗣ', SCARED_FG),
    }
}

/// Top status line: lives, score, level, power countdown.
pub fn hud_text(w: &WorldState) -> String {
    let mut hud = format!(
        " x{}  Score: {:<7}  Food: {}/{}  {}",
        w.session.lives, w.session.score,
        w.foods.len(), w.food_total(), w.level_name,
    );
    if w.power.is_active() {
        hud.push_str(&format!("   POWER! {}s", w.power_seconds_left()));
    }
    hud
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    /// Frames drawn; drives blinking independent of the (pausable) tick.
    frame: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            frame: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, now: Instant) -> io::Result<()> {
        self.frame = self.frame.wrapping_add(1);

        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → full repaint for a clean transition
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        self.compose_game(world);

        match world.phase {
            Phase::GameOver => self.compose_game_over(world, now),
            Phase::Playing if world.paused => self.compose_pause_overlay(world),
            Phase::Playing => {}
        }

        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal's own.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState) {
        // ── HUD row ──
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud_text(w), Color::White, HUD_BG);

        // ── Maze: walls, food, powerups ──
        for r in &w.walls {
            let (gx, gy) = item_cell(*r);
            self.put_tile(gx, gy, ['█', '█'], WALL_FG, WALL_BG);
        }
        for r in &w.foods {
            let (gx, gy) = item_cell(*r);
            self.put_tile(gx, gy, ['·', ' '], FOOD_FG, Color::Reset);
        }
        let blink = (self.frame / 6) % 2 == 0;
        for r in &w.powerups {
            let (gx, gy) = item_cell(*r);
            let ch = if blink { '●' } else { '○' };
            self.put_tile(gx, gy, [ch, ' '], FOOD_FG, Color::Reset);
        }

        // ── Actors (ghosts first, player on top) ──
        for g in &w.ghosts {
            self.put_actor(w, g.x, g.y, w.ghost_look(g));
        }
        self.put_actor(w, w.player.x, w.player.y, w.player.look);

        // ── Message bar ──
        let msg_row = MAP_ROW + w.rows + 1;
        if !w.message.is_empty() {
            let bg = Color::Rgb { r: 200, g: 180, b: 50 };
            self.front.fill_row(msg_row, bg);
            self.front.put_str(1, msg_row, &w.message, Color::Black, bg);
        }

        // ── Help bar ──
        let help = " Arrows/WASD: Move  P/F1: Pause  Q/Esc: Quit";
        self.front.put_str(0, msg_row + 1, help, Color::DarkGrey, Color::Reset);
    }

    /// Draw maze tile (gx, gy) as two terminal columns.
    fn put_tile(&mut self, gx: usize, gy: usize, chars: [char; 2], fg: Color, bg: Color) {
        let col = gx * CELL_W;
        let row = MAP_ROW + gy;
        self.front.set(col, row, Cell::from_char(chars[0], fg, bg));
        self.front.set(col + 1, row, Cell::from_char(chars[1], fg, bg));
    }

    fn put_actor(&mut self, w: &WorldState, x: i32, y: i32, look: Look) {
        let Some((gx, gy)) = actor_cell(x, y) else { return };
        if gx >= w.cols || gy >= w.rows { return; }
        let (ch, fg) = glyph_for(look);
        self.put_tile(gx, gy, [ch, ' '], fg, Color::Reset);
    }

    /// Centered box over the maze with the given lines.
    fn compose_box(&mut self, w: &WorldState, lines: &[(&str, Color)], bg: Color) {
        let map_w = w.cols * CELL_W;
        let box_w = lines.iter().map(|(s, _)| s.chars().count()).max().unwrap_or(0) + 6;
        let box_h = lines.len() + 2;
        let box_x = map_w.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + w.rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::White, bg));
            }
        }
        for (i, (text, fg)) in lines.iter().enumerate() {
            let tx = box_x + (box_w - text.chars().count()) / 2;
            self.front.put_str(tx, box_y + 1 + i, text, *fg, bg);
        }
    }

    fn compose_game_over(&mut self, w: &WorldState, now: Instant) {
        let score = format!("Score: {}", w.session.score);
        let time = format!("Time: {}s", w.session.duration(now).as_secs());
        let red = Color::Rgb { r: 255, g: 60, b: 60 };
        let bg = Color::Rgb { r: 30, g: 10, b: 10 };
        self.compose_box(w, &[
            ("GAME OVER", red),
            ("", Color::White),
            (score.as_str(), Color::White),
            (time.as_str(), Color::White),
            ("", Color::White),
            ("Press any key to restart", Color::Rgb { r: 80, g: 255, b: 80 }),
        ], bg);
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let blink = (self.frame / 8) % 2 == 0;
        let title = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let key_c = Color::Rgb { r: 100, g: 200, b: 255 };
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        self.compose_box(w, &[
            (title, hdr),
            ("", Color::White),
            ("P / F1   Resume", key_c),
            ("Q / Esc  Quit", key_c),
        ], dim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::sim::level;

    #[test]
    fn actor_snaps_to_tile_of_its_center() {
        assert_eq!(actor_cell(0, 0), Some((0, 0)));
        assert_eq!(actor_cell(15, 15), Some((0, 0)));
        assert_eq!(actor_cell(16, 8), Some((1, 0)));
        assert_eq!(actor_cell(9 * TILE_SIZE + 8, 9 * TILE_SIZE), Some((9, 9)));
        assert_eq!(actor_cell(-24, 0), None);
    }

    #[test]
    fn pickups_map_to_their_tile() {
        assert_eq!(item_cell(Rect::centered_in_tile(3, 5, 4)), (3, 5));
        assert_eq!(item_cell(Rect::tile(7, 2)), (7, 2));
    }

    #[test]
    fn glyphs_follow_look() {
        assert_eq!(glyph_for(Look::Player(Direction::Left)).0, 'ᗤ');
        assert_eq!(glyph_for(Look::ScaredGhost).1, SCARED_FG);
        assert_ne!(
            glyph_for(Look::Ghost(GhostKind::Red)).1,
            glyph_for(Look::Ghost(GhostKind::Blue)).1,
        );
    }

    #[test]
    fn hud_shows_power_countdown_only_when_active() {
        let mut w = WorldState::new(&level::embedded_level(), RulesConfig::default(), Instant::now()).unwrap();
        w.session.score = 120;
        let hud = hud_text(&w);
        assert!(hud.contains("x3"));
        assert!(hud.contains("Score: 120"));
        assert!(hud.contains(&format!("Food: {0}/{0}", w.food_total())));
        assert!(!hud.contains("POWER"));

        w.power.activate(250);
        assert!(hud_text(&w).contains("POWER! 13s"));
    }

    #[test]
    fn cell_roundtrips_multibyte_chars() {
        let c = Cell::from_char('█', Color::White, Color::Reset);
        assert_eq!(c.as_str(), "█");
        assert_eq!(c.bg, Cell::BASE_BG);
    }
}
