/// Entities: Actor (player + ghosts), static boxes (walls, food, powerups),
/// and the power-mode timer.
///
/// All coordinates are pixels. One tile = `TILE_SIZE` pixels; actors move
/// `STEP` pixels per tick so a tile is crossed in four ticks.

/// Edge length of one grid tile in pixels.
pub const TILE_SIZE: i32 = 32;

/// Per-tick displacement of any moving actor.
pub const STEP: i32 = TILE_SIZE / 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit velocity for this direction, scaled to `STEP`.
    pub fn velocity(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -STEP),
            Direction::Down => (0, STEP),
            Direction::Left => (-STEP, 0),
            Direction::Right => (STEP, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// Enemy variant. Only affects the visual identity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GhostKind {
    Blue,
    Orange,
    Pink,
    Red,
}

/// Opaque visual identity the presentation layer maps to a sprite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Look {
    Player(Direction),
    Ghost(GhostKind),
    ScaredGhost,
}

/// Axis-aligned box.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// A full-tile box at grid cell (col, row).
    pub fn tile(col: usize, row: usize) -> Self {
        Rect::new(col as i32 * TILE_SIZE, row as i32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
    }

    /// A `size`×`size` box centered inside grid cell (col, row).
    pub fn centered_in_tile(col: usize, row: usize, size: i32) -> Self {
        let offset = (TILE_SIZE - size) / 2;
        Rect::new(
            col as i32 * TILE_SIZE + offset,
            row as i32 * TILE_SIZE + offset,
            size,
            size,
        )
    }
}

/// Moving entity shared by the player and every ghost.
///
/// `velocity` is `(0, 0)` until a direction has been committed; afterwards it
/// is always `direction.velocity()`.
#[derive(Clone, Debug)]
pub struct Actor {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub direction: Direction,
    /// Turn requested by input, retried every tick until it commits.
    pub next_direction: Option<Direction>,
    pub velocity: (i32, i32),
    pub home_x: i32,
    pub home_y: i32,
    pub look: Look,
}

impl Actor {
    pub fn new(x: i32, y: i32, look: Look) -> Self {
        Actor {
            x,
            y,
            width: TILE_SIZE,
            height: TILE_SIZE,
            direction: Direction::Up,
            next_direction: None,
            velocity: (0, 0),
            home_x: x,
            home_y: y,
            look,
        }
    }

    pub fn player(col: usize, row: usize) -> Self {
        let r = Rect::tile(col, row);
        Actor::new(r.x, r.y, Look::Player(Direction::Right))
    }

    pub fn ghost(kind: GhostKind, col: usize, row: usize) -> Self {
        let r = Rect::tile(col, row);
        Actor::new(r.x, r.y, Look::Ghost(kind))
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Point the actor in `dir` and derive its velocity. Does not move it.
    pub fn set_direction(&mut self, dir: Direction) {
        self.direction = dir;
        self.velocity = dir.velocity();
    }

    pub fn advance(&mut self) {
        self.x += self.velocity.0;
        self.y += self.velocity.1;
    }

    pub fn retreat(&mut self) {
        self.x -= self.velocity.0;
        self.y -= self.velocity.1;
    }

    /// Snap back to the home position. Direction and velocity are kept.
    pub fn reset(&mut self) {
        self.x = self.home_x;
        self.y = self.home_y;
    }

    pub fn is_home(&self) -> bool {
        self.x == self.home_x && self.y == self.home_y
    }
}

/// Power mode: ghosts are edible while `remaining > 0`.
///
/// The active flag is derived from the counter, so a positive duration and
/// an inactive mode can never coexist.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PowerMode {
    remaining: u32,
}

impl PowerMode {
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Start (or restart) the countdown, overwriting any time left.
    pub fn activate(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    /// Advance one tick. Returns true if power mode just ran out.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_is_axis_aligned_quarter_tile() {
        for dir in Direction::ALL {
            let (vx, vy) = dir.velocity();
            assert!(vx == 0 || vy == 0);
            assert_eq!(vx.abs() + vy.abs(), TILE_SIZE / 4);
        }
    }

    #[test]
    fn food_box_is_centered() {
        let food = Rect::centered_in_tile(2, 3, 4);
        assert_eq!(food, Rect::new(2 * 32 + 14, 3 * 32 + 14, 4, 4));
    }

    #[test]
    fn reset_keeps_direction() {
        let mut a = Actor::ghost(GhostKind::Red, 1, 1);
        a.set_direction(Direction::Left);
        a.advance();
        a.advance();
        assert!(!a.is_home());
        a.reset();
        assert!(a.is_home());
        assert_eq!(a.direction, Direction::Left);
        assert_eq!(a.velocity, (-STEP, 0));
    }

    #[test]
    fn power_mode_lifecycle() {
        let mut p = PowerMode::default();
        assert!(!p.is_active());
        assert!(!p.tick()); // idle tick is a no-op

        p.activate(3);
        assert!(p.is_active());
        assert!(!p.tick()); // 3→2
        assert!(!p.tick()); // 2→1
        assert!(p.is_active());
        assert!(p.tick()); // 1→0, expired
        assert!(!p.is_active());
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn power_mode_activate_overwrites() {
        let mut p = PowerMode::default();
        p.activate(250);
        for _ in 0..100 { p.tick(); }
        p.activate(250);
        assert_eq!(p.remaining(), 250);
    }
}
