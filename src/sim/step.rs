/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Message + power-mode timers
///   2. Player movement (queued turn, then straight)
///   3. Ghost movement (tunnel push, straight, wander on bump)
///   4. Ghost contact (eat ghost / lose a life / game over)
///   5. Food pickup (may trigger power mode)
///   6. Powerup pickup
///   7. Level clear check
///
/// Consequences are evaluated only after every actor has moved, so each tick
/// judges one consistent snapshot. A game over ends the tick immediately.

use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::domain::ai;
use crate::domain::collision::overlaps;
use crate::domain::entity::{Direction, Look, Rect};
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

pub const FOOD_POINTS: u32 = 10;
pub const POWERUP_POINTS: u32 = 50;
pub const GHOST_POINTS: u32 = 200;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng>(world: &mut WorldState, rng: &mut R, now: Instant) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 { world.message.clear(); }
    }

    resolve_power_timer(world, &mut events);
    resolve_player_movement(world);
    resolve_ghost_movement(world, rng);
    if resolve_ghost_contact(world, rng, now, &mut events) { return events; }
    resolve_food(world, &mut events);
    resolve_powerups(world, &mut events);
    resolve_level_clear(world, rng, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Timers
// ══════════════════════════════════════════════════════════════

fn resolve_power_timer(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.power.tick() {
        debug!(tick = world.tick, "power mode ended");
        events.push(GameEvent::PowerModeEnded);
    }
}

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(world: &mut WorldState) {
    rules::step_player(&mut world.player, &world.walls, world.bounds);
}

fn resolve_ghost_movement<R: Rng>(world: &mut WorldState, rng: &mut R) {
    let walls = &world.walls;
    let bounds = world.bounds;
    for ghost in world.ghosts.iter_mut() {
        ai::step_ghost(ghost, walls, bounds, rng);
    }
}

// ══════════════════════════════════════════════════════════════
// Consequences
// ══════════════════════════════════════════════════════════════

/// Returns true if the game just ended; the rest of the tick is skipped.
fn resolve_ghost_contact<R: Rng>(
    world: &mut WorldState,
    rng: &mut R,
    now: Instant,
    events: &mut Vec<GameEvent>,
) -> bool {
    let player = world.player.rect();

    for i in 0..world.ghosts.len() {
        if !overlaps(world.ghosts[i].rect(), player) { continue; }

        if world.power.is_active() {
            world.session.award(GHOST_POINTS);
            world.ghosts[i].reset();
            debug!(ghost = i, score = world.session.score, "ghost eaten");
            events.push(GameEvent::GhostEaten { index: i });
            continue;
        }

        world.session.lives = world.session.lives.saturating_sub(1);
        let lives_left = world.session.lives;
        events.push(GameEvent::PlayerHit { lives_left });

        if lives_left == 0 {
            world.phase = Phase::GameOver;
            world.session.ended_at = Some(now);
            let secs = world.session.duration(now).as_secs();
            info!(score = world.session.score, secs, "game over");
            events.push(GameEvent::GameOver);
            return true;
        }

        info!(lives_left, "player caught");
        reset_positions(world, rng);
        // Everyone is back home; no other ghost can still be touching.
        break;
    }

    false
}

fn resolve_food(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let player = world.player.rect();
    let eaten = take_overlapping(&mut world.foods, player);

    for food in eaten {
        world.session.award(FOOD_POINTS);
        world.session.food_eaten += 1;
        events.push(GameEvent::FoodEaten { x: food.x, y: food.y });

        if world.session.food_eaten >= world.rules.food_for_power && !world.power.is_active() {
            world.power.activate(world.rules.power_mode_ticks);
            world.session.food_eaten = 0;
            info!(ticks = world.rules.power_mode_ticks, "power mode from food streak");
            events.push(GameEvent::PowerModeStarted);
        }
    }
}

fn resolve_powerups(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let player = world.player.rect();
    let eaten = take_overlapping(&mut world.powerups, player);

    for p in eaten {
        world.power.activate(world.rules.power_mode_ticks);
        world.session.award(POWERUP_POINTS);
        info!(ticks = world.rules.power_mode_ticks, "powerup eaten");
        events.push(GameEvent::PowerupEaten { x: p.x, y: p.y });
        events.push(GameEvent::PowerModeStarted);
    }
}

fn resolve_level_clear<R: Rng>(world: &mut WorldState, rng: &mut R, events: &mut Vec<GameEvent>) {
    if !world.foods.is_empty() { return; }

    world.levels_cleared += 1;
    info!(
        level = %world.level_name,
        cleared = world.levels_cleared,
        score = world.session.score,
        "maze cleared"
    );
    world.reload_level();
    reset_positions(world, rng);
    world.set_message("Maze cleared!", 40);
    events.push(GameEvent::LevelCleared);
}

/// Remove and return every box in `items` that overlaps `target`.
fn take_overlapping(items: &mut Vec<Rect>, target: Rect) -> Vec<Rect> {
    let mut taken = vec![];
    items.retain(|r| {
        if overlaps(*r, target) {
            taken.push(*r);
            false
        } else {
            true
        }
    });
    taken
}

// ══════════════════════════════════════════════════════════════
// Resets
// ══════════════════════════════════════════════════════════════

/// Send every actor home after a lost life or a cleared maze.
///
/// The player parks facing right with nothing queued, so it waits for
/// input; ghosts get a fresh random heading.
/// Power mode and the food streak are cleared. Score and lives are untouched.
pub fn reset_positions<R: Rng>(world: &mut WorldState, rng: &mut R) {
    let p = &mut world.player;
    p.reset();
    p.direction = Direction::Right;
    p.next_direction = None;
    p.velocity = (0, 0);
    p.look = Look::Player(Direction::Right);
    debug_assert!(p.is_home());

    world.power.clear();
    world.session.food_eaten = 0;

    let walls = &world.walls;
    for ghost in world.ghosts.iter_mut() {
        ghost.reset();
        ai::wander(ghost, walls, rng);
    }
}

/// Start a fresh session: full maze, full lives, zero score.
/// Used for the very first game as well as restarting after a game over.
pub fn restart<R: Rng>(world: &mut WorldState, rng: &mut R, now: Instant) {
    world.reload_level();
    reset_positions(world, rng);
    world.session.lives = world.rules.starting_lives;
    world.session.score = 0;
    world.session.started_at = now;
    world.session.ended_at = None;
    world.phase = Phase::Playing;
    world.paused = false;
    world.tick = 0;
    world.levels_cleared = 0;
    let name = world.level_name.clone();
    world.set_message(&name, 40);
    info!(level = %world.level_name, lives = world.session.lives, "new game");
}
