/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound; the loop logs them.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { x: i32, y: i32 },
    PowerupEaten { x: i32, y: i32 },
    PowerModeStarted,
    PowerModeEnded,
    GhostEaten { index: usize },
    PlayerHit { lives_left: u32 },
    GameOver,
    LevelCleared,
}
