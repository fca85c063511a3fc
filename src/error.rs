use crate::Position;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {rows}x{cols} board with {mines} mines")]
    InvalidConfiguration {
        rows: usize,
        cols: usize,
        mines: usize,
    },
    #[error("Position {0:?} is out of bounds")]
    OutOfBounds(Position),
}

pub type Result<T> = std::result::Result<T, GameError>;
