/// Ghost AI: random wandering, no pathfinding.
///
/// Each tick a ghost keeps going straight until it bumps into something
/// (a wall, or either side of the playfield), then picks a uniformly random
/// direction and tries to turn into it. The turn may itself be blocked, in
/// which case the ghost idles for that tick and tries again next time.
///
/// The random source is passed in, so a seeded generator replays the exact
/// same wandering.

use rand::Rng;

use super::collision::{self, Bounds, Turn};
use super::entity::{Actor, Direction, Rect, TILE_SIZE};

/// Row (in tiles) of the horizontal tunnel. Ghosts are pushed out of it.
pub const TUNNEL_ROW: i32 = 9;

pub fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::ALL[rng.random_range(0..Direction::ALL.len())]
}

/// Pick a random heading and speculatively turn into it.
///
/// A blocked turn leaves the ghost on its old heading with a live velocity,
/// even if it was parked, so it keeps drifting and bumps into something.
pub fn wander<R: Rng>(ghost: &mut Actor, walls: &[Rect], rng: &mut R) {
    let dir = random_direction(rng);
    if collision::try_turn(ghost, dir, walls) == Turn::Blocked {
        ghost.velocity = ghost.direction.velocity();
    }
}

/// One tick of ghost movement.
pub fn step_ghost<R: Rng>(ghost: &mut Actor, walls: &[Rect], bounds: Bounds, rng: &mut R) {
    // Don't let ghosts camp the tunnel: force them upward out of it.
    if ghost.y == TILE_SIZE * TUNNEL_ROW && !ghost.direction.is_vertical() {
        collision::try_turn(ghost, Direction::Up, walls);
    }

    ghost.advance();
    let r = ghost.rect();
    if collision::hits_wall(r, walls) || bounds.touches_side(r) {
        ghost.retreat();
        wander(ghost, walls, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{GhostKind, STEP};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn walls_from(rows: &[&str]) -> (Vec<Rect>, Bounds) {
        let mut walls = vec![];
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                if ch == 'X' { walls.push(Rect::tile(c, r)); }
            }
        }
        let b = Bounds {
            width: rows[0].len() as i32 * TILE_SIZE,
            height: rows.len() as i32 * TILE_SIZE,
        };
        (walls, b)
    }

    #[test]
    fn random_direction_covers_all_four() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = vec![];
        for _ in 0..200 {
            let d = random_direction(&mut rng);
            if !seen.contains(&d) { seen.push(d); }
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn same_seed_same_wandering() {
        let (walls, b) = walls_from(&[
            "XXXXXXX",
            "X     X",
            "X X X X",
            "X     X",
            "XXXXXXX",
        ]);
        let run = |seed: u64| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut g = Actor::ghost(GhostKind::Pink, 1, 1);
            g.set_direction(Direction::Right);
            let mut trail = vec![];
            for _ in 0..100 {
                step_ghost(&mut g, &walls, b, &mut rng);
                trail.push((g.x, g.y));
            }
            trail
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn ghost_never_enters_walls() {
        let (walls, b) = walls_from(&[
            "XXXXXXX",
            "X     X",
            "X X X X",
            "X     X",
            "XXXXXXX",
        ]);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut g = Actor::ghost(GhostKind::Red, 1, 1);
        g.set_direction(Direction::Down);
        for _ in 0..500 {
            step_ghost(&mut g, &walls, b, &mut rng);
            assert!(!collision::hits_wall(g.rect(), &walls));
            assert!(!b.excludes(g.rect()));
        }
    }

    #[test]
    fn free_ghost_goes_straight() {
        let (walls, b) = walls_from(&[
            "XXXXXX",
            "X    X",
            "XXXXXX",
        ]);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut g = Actor::ghost(GhostKind::Blue, 1, 1);
        g.set_direction(Direction::Right);
        step_ghost(&mut g, &walls, b, &mut rng);
        assert_eq!((g.x, g.y), (TILE_SIZE + STEP, TILE_SIZE));
        assert_eq!(g.direction, Direction::Right);
    }

    #[test]
    fn tunnel_row_forces_up() {
        // 10 rows; row 9 is the tunnel, open above at column 2.
        let mut rows = vec!["XXXXX"; 8];
        rows.push("XX XX");
        rows.push("X   X");
        let (walls, b) = walls_from(&rows);
        let mut rng = Pcg32::seed_from_u64(9);
        let mut g = Actor::ghost(GhostKind::Orange, 2, 9);
        g.set_direction(Direction::Left);
        step_ghost(&mut g, &walls, b, &mut rng);
        assert_eq!(g.direction, Direction::Up);
        // Turn step + straight step.
        assert_eq!(g.y, 9 * TILE_SIZE - 2 * STEP);
    }

    #[test]
    fn side_of_playfield_counts_as_wall() {
        // No walls at all; ghost at the left edge heading left.
        let (walls, b) = walls_from(&[
            "    ",
            "    ",
            "    ",
        ]);
        let mut rng = Pcg32::seed_from_u64(11);
        let mut g = Actor::ghost(GhostKind::Blue, 1, 1);
        g.x = STEP;
        g.set_direction(Direction::Left);
        step_ghost(&mut g, &walls, b, &mut rng);
        // Reaching x == 0 counts as touching the side: the step is undone and
        // the random re-heading (never blocked here) moves it one step.
        let moved = (g.x - STEP).abs() + (g.y - TILE_SIZE).abs();
        assert_eq!(moved, STEP);
        assert_eq!(g.velocity, g.direction.velocity());
    }

    #[test]
    fn parked_ghost_keeps_drifting_after_blocked_turn() {
        // Walls everywhere but the right: three of four headings are blocked.
        let (walls, b) = walls_from(&[
            "XXXXX",
            "X   X",
            "XXXXX",
        ]);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut g = Actor::ghost(GhostKind::Red, 1, 1);
            g.velocity = (0, 0);
            wander(&mut g, &walls, &mut rng);
            assert_eq!(g.velocity, g.direction.velocity());

            let mut left_home = false;
            for _ in 0..60 {
                step_ghost(&mut g, &walls, b, &mut rng);
                left_home |= !g.is_home();
            }
            assert!(left_home, "seed {seed}: ghost never left home");
        }
    }

    #[test]
    fn boxed_in_ghost_idles() {
        let (walls, b) = walls_from(&[
            "XXX",
            "X X",
            "XXX",
        ]);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut g = Actor::ghost(GhostKind::Red, 1, 1);
        g.set_direction(Direction::Left);
        for _ in 0..20 {
            step_ghost(&mut g, &walls, b, &mut rng);
            assert!(g.is_home());
            assert_eq!(g.direction, Direction::Left);
        }
    }
}
