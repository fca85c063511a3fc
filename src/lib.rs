pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod outcome;
pub mod position;
pub mod snapshot;

pub use board::{Board, Cell, CellState};
pub use config::{FloodPolicy, GameConfig, COL_RANGE, ROW_RANGE};
pub use error::{GameError, Result};
pub use game::{new_game, Action, Game, GameStatus};
pub use outcome::{ActionOutcome, CellChange, FlagOutcome, RevealOutcome};
pub use position::Position;
pub use snapshot::{CellView, Snapshot};
