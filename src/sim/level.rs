/// Level loader.
///
/// ## Sources (priority order):
///   1. `[general] level_file` from config.toml
///   2. Built-in embedded maze
///
/// ## Level file format (`.txt`):
///   Optional first line: `# Level Name`
///   Further `#` lines before the grid are comments.
///   Remaining lines: map rows, all the same width.
///
/// ## Tile legend:
///   'X' = Wall               ' ' = Food
///   '*' = Powerup            'P' = Player spawn (exactly one)
///   'b' 'o' 'p' 'r' = Ghost spawns (blue, orange, pink, red)
///   'O' = Empty (no food)    anything else = Empty

use std::path::Path;

use tracing::{debug, info};

use crate::domain::entity::{Actor, Rect};
use crate::domain::tile::Tile;
use crate::error::LevelError;

/// Food box edge length in pixels.
pub const FOOD_SIZE: i32 = 4;
/// Powerup box edge length in pixels.
pub const POWERUP_SIZE: i32 = 8;

/// Raw level data (owned strings, loaded from file or embedded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

impl LevelDef {
    pub fn from_rows(name: &str, rows: &[&str]) -> Self {
        LevelDef {
            name: name.to_string(),
            rows: rows.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything derived from a grid: the static boxes plus freshly spawned actors.
#[derive(Clone, Debug)]
pub struct Layout {
    pub cols: usize,
    pub rows: usize,
    pub walls: Vec<Rect>,
    pub foods: Vec<Rect>,
    pub powerups: Vec<Rect>,
    pub player: Actor,
    pub ghosts: Vec<Actor>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the configured level file, or the embedded maze when none is set.
pub fn load_level_def(path: Option<&Path>) -> Result<LevelDef, LevelError> {
    let Some(path) = path else {
        debug!("no level file configured, using embedded maze");
        return Ok(embedded_level());
    };
    let content = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let def = parse_level_file(&content);
    info!(path = %path.display(), name = %def.name, "level file loaded");
    Ok(def)
}

/// Turn a grid into walls, food, powerups and actors.
///
/// Pure: the same grid always yields the same layout, so calling it again
/// after a level clear fully replaces the previous sets.
pub fn parse_layout(def: &LevelDef) -> Result<Layout, LevelError> {
    let height = def.rows.len();
    let width = def.rows.first().map_or(0, |r| r.chars().count());
    if height == 0 || width == 0 {
        return Err(LevelError::Empty);
    }

    let mut walls = vec![];
    let mut foods = vec![];
    let mut powerups = vec![];
    let mut ghosts = vec![];
    let mut player: Option<Actor> = None;

    for (y, row) in def.rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(LevelError::RaggedRow { row: y, expected: width, found });
        }

        for (x, ch) in row.chars().enumerate() {
            match Tile::from_char(ch) {
                t if t.is_solid() => walls.push(Rect::tile(x, y)),
                Tile::Food => foods.push(Rect::centered_in_tile(x, y, FOOD_SIZE)),
                Tile::Powerup => powerups.push(Rect::centered_in_tile(x, y, POWERUP_SIZE)),
                Tile::PlayerSpawn => {
                    if player.is_some() {
                        return Err(LevelError::DuplicatePlayerSpawn { row: y, col: x });
                    }
                    player = Some(Actor::player(x, y));
                }
                Tile::GhostSpawn(kind) => ghosts.push(Actor::ghost(kind, x, y)),
                _ => {}
            }
        }
    }

    let player = player.ok_or(LevelError::MissingPlayerSpawn)?;

    debug!(
        name = %def.name,
        cols = width,
        rows = height,
        walls = walls.len(),
        food = foods.len(),
        powerups = powerups.len(),
        ghosts = ghosts.len(),
        "level parsed"
    );

    Ok(Layout { cols: width, rows: height, walls, foods, powerups, player, ghosts })
}

// ══════════════════════════════════════════════════════════════
// Level file parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
/// Grid validation is left to `parse_layout`.
pub fn parse_level_file(content: &str) -> LevelDef {
    let mut name = String::new();
    let mut rows: Vec<String> = vec![];

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if rows.is_empty() && line.starts_with('#') {
            if name.is_empty() {
                name = line[1..].trim().to_string();
            }
            continue;
        }
        if rows.is_empty() && line.is_empty() {
            continue;
        }
        rows.push(line.to_string());
    }

    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }

    if name.is_empty() {
        name = "Unnamed Maze".to_string();
    }

    LevelDef { name, rows }
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback level
// ══════════════════════════════════════════════════════════════

pub fn embedded_level() -> LevelDef {
    LevelDef::from_rows("Classic", &[
        "XXXXXXXXXXXXXXXXXXX",
        "X        X        X",
        "X XX XXX X XXX XX X",
        "X                 X",
        "X XX X XXXXX X XX X",
        "X    X       X    X",
        "XXXX XXXX XXXX XXXX",
        "OOOX X       X XOOO",
        "XXXX X XXrXX X XXXX",
        "O       bpo       O",
        "XXXX X XXXXX X XXXX",
        "OOOX X       X XOOO",
        "XXXX X XXXXX X XXXX",
        "X        X        X",
        "X XX XXX X XXX XX X",
        "X  X     P     X  X",
        "XX X X XXXXX X X XX",
        "X    X   X   X    X",
        "X XXXXXX X XXXXXX X",
        "X                 X",
        "XXXXXXXXXXXXXXXXXXX",
    ])
}
