/// Keyboard input collector.
///
/// Direction keys are edge-triggered: one press queues one turn on the
/// player and the simulation keeps retrying it, so nothing needs to track
/// held keys. Each frame the loop drains every pending terminal event and
/// then asks questions about what arrived.
///
/// Release events (reported by terminals with keyboard enhancement) are
/// dropped so a single keystroke never counts twice.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::domain::entity::Direction;

/// Map a key to the direction it steers: arrows and WASD.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

pub struct InputState {
    /// Key presses (and repeats) received during the last drain.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { raw_events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.push(key);
            }
        }
    }

    fn push(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Release {
            self.raw_events.push(key);
        }
    }

    /// Latest direction key this frame, if any. Later presses win.
    pub fn direction(&self) -> Option<Direction> {
        self.raw_events.iter().rev().find_map(|k| direction_for(k.code))
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.raw_events.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Did anything at all arrive this frame? (restart after game over)
    pub fn any_key(&self) -> bool {
        !self.raw_events.is_empty()
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
