/// Tile types of the level grid.
/// One character per tile; the mapping lives here so the loader and the
/// tests share a single legend.

use super::entity::GhostKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    /// `O` or any unrecognized character: nothing spawns here.
    #[default]
    Empty,
    /// `X`
    Wall,
    /// ` ` (space)
    Food,
    /// `*`
    Powerup,
    /// `P`
    PlayerSpawn,
    /// `b`, `o`, `p`, `r`
    GhostSpawn(GhostKind),
}

impl Tile {
    pub fn from_char(c: char) -> Self {
        match c {
            'X' => Tile::Wall,
            ' ' => Tile::Food,
            '*' => Tile::Powerup,
            'P' => Tile::PlayerSpawn,
            'b' => Tile::GhostSpawn(GhostKind::Blue),
            'o' => Tile::GhostSpawn(GhostKind::Orange),
            'p' => Tile::GhostSpawn(GhostKind::Pink),
            'r' => Tile::GhostSpawn(GhostKind::Red),
            _ => Tile::Empty,
        }
    }

    /// Does this tile block movement?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall)
    }
}
