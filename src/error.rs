//! Error types.
//!
//! Level problems are configuration errors: they are reported at load time
//! and stop the game before the terminal is taken over.

use std::io;
use std::path::PathBuf;

/// Top-level error returned from `main`'s game loop.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A level grid that cannot be turned into a playable maze.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    #[error("Could not read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Level grid is empty")]
    Empty,

    #[error("Row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("No player spawn ('P') in level grid")]
    MissingPlayerSpawn,

    #[error("Second player spawn at row {row}, column {col}; exactly one 'P' is allowed")]
    DuplicatePlayerSpawn { row: usize, col: usize },
}

/// A configured sound file that can't be used as a cue.
#[cfg(feature = "sound")]
#[derive(thiserror::Error, Debug)]
pub enum SoundError {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),

    #[error("not a playable sound: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}
