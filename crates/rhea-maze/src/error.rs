use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no floor tiles")]
    Empty,

    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },

    #[error("maze layout has no agent start tile 'P'")]
    MissingAgent,

    #[error("tile {tile:?} appears more than once")]
    Duplicate { tile: char },
}

pub type Result<T> = std::result::Result<T, MazeError>;
