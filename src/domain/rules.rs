/// Player movement rules: two-phase, pure functions over an Actor.
///
/// ## Phase 1: queued turn
/// ┌──────────────────────────────┬────────────────────────────┐
/// │ Condition                     │ Result                     │
/// ├──────────────────────────────┼────────────────────────────┤
/// │ nothing queued                │ skip                       │
/// │ same direction, moving        │ skip                       │
/// │ turn step hits a wall         │ full rollback              │
/// │ turn step leaves playfield    │ full rollback              │
/// │ otherwise                     │ commit turn (stepped once) │
/// └──────────────────────────────┴────────────────────────────┘
///
/// ## Phase 2: keep going
/// ┌──────────────────────────────┬────────────────────────────┐
/// │ step leaves playfield         │ undo position only         │
/// │ step hits a wall              │ undo position only         │
/// │ otherwise                     │ commit                     │
/// └──────────────────────────────┴────────────────────────────┘
///
/// A blocked turn stays queued and is retried every tick, so the player
/// turns the moment the corridor opens and otherwise keeps going straight.
///
/// A parked player (zero velocity, e.g. right after a reset) also retries
/// its own heading, so pressing the direction it already faces starts it.

use super::collision::{self, Bounds, Checkpoint, Turn};
use super::entity::{Actor, Rect};

/// Phase 1. Returns true if the queued direction was committed.
pub fn try_queued_turn(player: &mut Actor, walls: &[Rect], bounds: Bounds) -> bool {
    let Some(next) = player.next_direction else {
        return false;
    };
    if next == player.direction && player.velocity != (0, 0) {
        return false;
    }
    let saved = Checkpoint::of(player);
    match collision::try_turn(player, next, walls) {
        Turn::Blocked => false,
        Turn::Moved => {
            if bounds.excludes(player.rect()) {
                saved.rollback(player);
                false
            } else {
                true
            }
        }
    }
}

/// Phase 2. Returns true if the player actually moved.
pub fn continue_straight(player: &mut Actor, walls: &[Rect], bounds: Bounds) -> bool {
    if player.velocity == (0, 0) {
        return false;
    }
    player.advance();
    let r = player.rect();
    if bounds.excludes(r) || collision::hits_wall(r, walls) {
        player.retreat();
        return false;
    }
    true
}

/// Full player step for one tick.
pub fn step_player(player: &mut Actor, walls: &[Rect], bounds: Bounds) {
    try_queued_turn(player, walls, bounds);
    continue_straight(player, walls, bounds);
}
