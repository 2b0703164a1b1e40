/// WorldState: the complete snapshot of a running game.
///
/// ## Layers
///
///   - `template`: the maze as parsed. **Never mutated** after load.
///   - `walls` / `foods` / `powerups` / `player` / `ghosts`: the live layer.
///
/// A level clear or a restart re-installs the live layer from `template`.
/// Everything else (score, lives, timers) lives in `session` and survives
/// level reloads; only a full restart reinitializes it.
///
/// The step function is the only writer during a tick. Input writes a single
/// field (`player.next_direction`) between ticks; the renderer reads the
/// whole struct after the tick has finished.

use std::time::{Duration, Instant};

use crate::config::RulesConfig;
use crate::domain::collision::Bounds;
use crate::domain::entity::{Actor, Direction, Look, PowerMode, Rect, TILE_SIZE};
use crate::error::LevelError;
use crate::sim::level::{self, LevelDef, Layout};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Per-session bookkeeping. Survives level reloads.
#[derive(Clone, Debug)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    /// Food eaten since the last power-mode activation.
    pub food_eaten: u32,
    pub started_at: Instant,
    pub ended_at: Option<Instant>,
}

impl Session {
    pub fn new(lives: u32, now: Instant) -> Self {
        Session { score: 0, lives, food_eaten: 0, started_at: now, ended_at: None }
    }

    /// Score only ever goes up; saturate instead of wrapping.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Wall-clock length of the session (up to `now` while still running).
    pub fn duration(&self, now: Instant) -> Duration {
        self.ended_at.unwrap_or(now).saturating_duration_since(self.started_at)
    }
}

pub struct WorldState {
    // ── Level ──
    pub level_name: String,
    /// Parsed maze. Never mutated after load.
    template: Layout,
    pub cols: usize,
    pub rows: usize,
    pub bounds: Bounds,

    // ── Entities ──
    pub walls: Vec<Rect>,
    pub foods: Vec<Rect>,
    pub powerups: Vec<Rect>,
    pub player: Actor,
    pub ghosts: Vec<Actor>,

    // ── Game tracking ──
    pub power: PowerMode,
    pub session: Session,
    pub rules: RulesConfig,

    // ── Meta ──
    pub phase: Phase,
    pub paused: bool,
    pub tick: u64,
    pub levels_cleared: u32,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

// ── Construction ──

impl WorldState {
    /// Parse `def` and build a world in the Playing phase.
    /// Ghosts have no heading yet; `step::restart` gives them one.
    pub fn new(def: &LevelDef, rules: RulesConfig, now: Instant) -> Result<Self, LevelError> {
        let template = level::parse_layout(def)?;
        let cols = template.cols;
        let rows = template.rows;
        let mut world = WorldState {
            level_name: def.name.clone(),
            cols,
            rows,
            bounds: Bounds {
                width: cols as i32 * TILE_SIZE,
                height: rows as i32 * TILE_SIZE,
            },
            walls: vec![],
            foods: vec![],
            powerups: vec![],
            player: template.player.clone(),
            ghosts: vec![],
            power: PowerMode::default(),
            session: Session::new(rules.starting_lives, now),
            rules,
            phase: Phase::Playing,
            paused: false,
            tick: 0,
            levels_cleared: 0,
            message: String::new(),
            message_timer: 0,
            template,
        };
        world.reload_level();
        Ok(world)
    }

    /// Replace walls, food, powerups and actors with a fresh copy of the maze.
    pub fn reload_level(&mut self) {
        let fresh = self.template.clone();
        self.walls = fresh.walls;
        self.foods = fresh.foods;
        self.powerups = fresh.powerups;
        self.player = fresh.player;
        self.ghosts = fresh.ghosts;
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }
}

// ── Input / presentation API ──

impl WorldState {
    /// Queue a turn for the player. Takes effect on the next tick the turn
    /// is legal; the sprite flips right away.
    pub fn queue_direction(&mut self, dir: Direction) {
        self.player.next_direction = Some(dir);
        self.player.look = Look::Player(dir);
    }

    /// Pause or resume. Only a running game can be paused.
    pub fn toggle_pause(&mut self) {
        if self.phase == Phase::Playing {
            self.paused = !self.paused;
        }
    }

    /// Visual identity for a ghost, accounting for power mode.
    pub fn ghost_look(&self, ghost: &Actor) -> Look {
        if self.power.is_active() {
            Look::ScaredGhost
        } else {
            ghost.look
        }
    }

    /// Food items the maze started with (for the HUD).
    pub fn food_total(&self) -> usize {
        self.template.foods.len()
    }

    /// Seconds of power mode left at the configured tick rate, rounded up.
    pub fn power_seconds_left(&self) -> u64 {
        let ms = self.power.remaining() as u64 * self.rules.tick_rate_ms;
        ms.div_ceil(1000)
    }
}
