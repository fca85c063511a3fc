use crate::{CellState, GameStatus, Position};
use serde::{Deserialize, Serialize};

/// A cell whose displayable state changed during an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub position: Position,
    pub state: CellState,
    /// Set for revealed safe cells only.
    pub adjacent_mines: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealOutcome {
    pub status: GameStatus,
    pub previous_status: GameStatus,
    pub changed: Vec<CellChange>,
    /// Every mine on the board, filled in only when this reveal lost the game.
    pub exposed_mines: Vec<Position>,
    pub remaining_mines: i64,
}

impl RevealOutcome {
    pub(crate) fn unchanged(status: GameStatus, remaining_mines: i64) -> Self {
        Self {
            status,
            previous_status: status,
            changed: Vec::new(),
            exposed_mines: Vec::new(),
            remaining_mines,
        }
    }

    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Whether this reveal moved the game out of `NotStarted`.
    pub fn started(&self) -> bool {
        self.previous_status == GameStatus::NotStarted && self.status != GameStatus::NotStarted
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagOutcome {
    pub position: Position,
    /// State of the cell after the action, `None` if the position is off the board.
    pub state: Option<CellState>,
    pub changed: bool,
    pub remaining_mines: i64,
}

impl FlagOutcome {
    pub fn has_update(&self) -> bool {
        self.changed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Reveal(RevealOutcome),
    Flag(FlagOutcome),
}

impl ActionOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Reveal(outcome) => outcome.has_update(),
            Self::Flag(outcome) => outcome.has_update(),
        }
    }

    pub fn remaining_mines(&self) -> i64 {
        match self {
            Self::Reveal(outcome) => outcome.remaining_mines,
            Self::Flag(outcome) => outcome.remaining_mines,
        }
    }
}
