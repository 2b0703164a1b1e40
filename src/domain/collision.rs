/// Collision layer: single source of truth for "touching".
///
/// ## Overlap
///
/// Boxes are half-open on both axes: a box covers `[x, x+w) × [y, y+h)`.
/// Two boxes that merely share an edge do NOT overlap.
///
/// ## Speculative move
///
/// Every direction change (player or ghost) goes through `try_turn`:
///   1. remember direction + velocity
///   2. take the new direction, derive velocity
///   3. step once
///   4. any wall hit → undo the step, restore direction + velocity
///
/// Callers layer extra checks (playfield bounds) on top via `Turn::Moved`.

use super::entity::{Actor, Direction, Rect};

/// Axis-aligned overlap test (half-open intervals).
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.w
        && a.x + a.w > b.x
        && a.y < b.y + b.h
        && a.y + a.h > b.y
}

/// Does `r` overlap any wall?
pub fn hits_wall(r: Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|w| overlaps(r, *w))
}

/// Playfield size in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Is any part of `r` outside the playfield?
    pub fn excludes(&self, r: Rect) -> bool {
        r.x < 0 || r.x + r.w > self.width || r.y < 0 || r.y + r.h > self.height
    }

    /// Is `r` touching or crossing the left/right edge?
    /// Ghosts treat the screen sides as walls (the tunnel row is closed to them).
    pub fn touches_side(&self, r: Rect) -> bool {
        r.x <= 0 || r.x + r.w >= self.width
    }
}

/// Outcome of a speculative move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Turn {
    /// New direction committed and the actor stepped once.
    Moved,
    /// A wall was in the way; actor is exactly as before the call.
    Blocked,
}

/// Saved direction/velocity for a rollback.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    direction: Direction,
    velocity: (i32, i32),
}

impl Checkpoint {
    pub fn of(actor: &Actor) -> Self {
        Checkpoint { direction: actor.direction, velocity: actor.velocity }
    }

    /// Undo the step taken with the current velocity, then restore heading.
    pub fn rollback(self, actor: &mut Actor) {
        actor.retreat();
        actor.direction = self.direction;
        actor.velocity = self.velocity;
    }
}

/// Speculatively turn `actor` toward `dir` and step once. See module docs.
pub fn try_turn(actor: &mut Actor, dir: Direction, walls: &[Rect]) -> Turn {
    let saved = Checkpoint::of(actor);
    actor.set_direction(dir);
    actor.advance();
    if hits_wall(actor.rect(), walls) {
        saved.rollback(actor);
        return Turn::Blocked;
    }
    Turn::Moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{GhostKind, STEP, TILE_SIZE};
    use proptest::prelude::*;

    #[test]
    fn box_overlaps_itself() {
        let a = Rect::new(10, 10, 32, 32);
        assert!(overlaps(a, a));
    }

    #[test]
    fn edge_contact_is_not_overlap() {
        let a = Rect::new(0, 0, 32, 32);
        assert!(!overlaps(a, Rect::new(32, 0, 32, 32)));
        assert!(!overlaps(a, Rect::new(0, 32, 32, 32)));
        assert!(!overlaps(a, Rect::new(-32, 0, 32, 32)));
        assert!(overlaps(a, Rect::new(31, 0, 32, 32)));
    }

    #[test]
    fn small_box_inside_large_box() {
        let tile = Rect::tile(3, 3);
        let food = Rect::centered_in_tile(3, 3, 4);
        assert!(overlaps(tile, food));
        assert!(overlaps(food, tile));
    }

    #[test]
    fn bounds_checks() {
        let b = Bounds { width: 4 * TILE_SIZE, height: 2 * TILE_SIZE };
        assert!(!b.excludes(Rect::tile(0, 0)));
        assert!(!b.excludes(Rect::tile(3, 1)));
        assert!(b.excludes(Rect::new(-1, 0, 32, 32)));
        assert!(b.excludes(Rect::new(97, 0, 32, 32)));

        // touches_side is inclusive at the edges
        assert!(b.touches_side(Rect::tile(0, 0)));
        assert!(b.touches_side(Rect::tile(3, 0)));
        assert!(!b.touches_side(Rect::tile(1, 0)));
    }

    #[test]
    fn turn_into_wall_is_rolled_back() {
        let walls = vec![Rect::tile(2, 1)];
        let mut a = Actor::ghost(GhostKind::Blue, 1, 1);
        a.set_direction(Direction::Up);
        let before = (a.x, a.y, a.direction, a.velocity);

        assert_eq!(try_turn(&mut a, Direction::Right, &walls), Turn::Blocked);
        assert_eq!((a.x, a.y, a.direction, a.velocity), before);
    }

    #[test]
    fn turn_into_open_space_commits() {
        let walls = vec![Rect::tile(0, 1)];
        let mut a = Actor::ghost(GhostKind::Blue, 1, 1);
        assert_eq!(try_turn(&mut a, Direction::Right, &walls), Turn::Moved);
        assert_eq!(a.direction, Direction::Right);
        assert_eq!(a.x, TILE_SIZE + STEP);
        assert_eq!(a.velocity, (STEP, 0));
    }

    #[test]
    fn rollback_restores_zero_velocity() {
        // Fresh actors have no velocity yet; a blocked turn must leave it at zero.
        let walls = vec![Rect::tile(1, 0)];
        let mut a = Actor::player(1, 1);
        assert_eq!(try_turn(&mut a, Direction::Up, &walls), Turn::Blocked);
        assert_eq!(a.velocity, (0, 0));
        assert_eq!(a.direction, Direction::Up);
        assert!(a.is_home());
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-200i32..200, -200i32..200, 1i32..64, 1i32..64)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(overlaps(a, b), overlaps(b, a));
        }

        #[test]
        fn offset_by_own_width_never_overlaps(a in arb_rect()) {
            let right = Rect::new(a.x + a.w, a.y, a.w, a.h);
            let below = Rect::new(a.x, a.y + a.h, a.w, a.h);
            prop_assert!(!overlaps(a, right));
            prop_assert!(!overlaps(a, below));
            prop_assert!(overlaps(a, a));
        }

        #[test]
        fn blocked_turn_is_exact_noop(col in 1usize..6, row in 1usize..6, d in 0usize..4) {
            let dir = Direction::ALL[d];
            // Surround the actor so every turn is blocked.
            let walls = vec![
                Rect::tile(col - 1, row), Rect::tile(col + 1, row),
                Rect::tile(col, row - 1), Rect::tile(col, row + 1),
            ];
            let mut a = Actor::ghost(GhostKind::Orange, col, row);
            let before = (a.x, a.y, a.direction, a.velocity);
            prop_assert_eq!(try_turn(&mut a, dir, &walls), Turn::Blocked);
            prop_assert_eq!((a.x, a.y, a.direction, a.velocity), before);
        }
    }
}
