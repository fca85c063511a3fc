use crate::board::position_of;
use crate::{Board, CellState, GameStatus, Position};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// What a renderer should draw for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent mine count; 0 draws blank.
    Revealed(u8),
    /// Unflagged mine, shown once the game is lost.
    Mine,
    /// The mine whose reveal lost the game.
    Detonated,
    /// Flag on a safe cell, shown once the game is lost.
    Misflagged,
}

/// Owned, read-only view of a game for a full redraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub mines_count: usize,
    pub remaining_mines: i64,
    cells: Array2<CellView>,
}

impl Snapshot {
    pub(crate) fn new(
        board: &Board,
        status: GameStatus,
        remaining_mines: i64,
        detonated: Option<Position>,
    ) -> Self {
        let lost = status == GameStatus::Lost;
        let mut cells: Array2<CellView> = Array2::default(board.dimensions());

        for ((row, col), view) in cells.indexed_iter_mut() {
            let pos = position_of(row, col);
            let cell = board[pos];
            *view = match cell.state() {
                _ if lost && detonated == Some(pos) => CellView::Detonated,
                CellState::Revealed => CellView::Revealed(cell.adjacent_mines()),
                CellState::Flagged if lost && !cell.is_mine() => CellView::Misflagged,
                CellState::Flagged => CellView::Flagged,
                CellState::Hidden if lost && cell.is_mine() => CellView::Mine,
                CellState::Hidden => CellView::Hidden,
            };
        }

        Self {
            status,
            mines_count: board.mines_count(),
            remaining_mines,
            cells,
        }
    }

    pub fn cell(&self, pos: Position) -> Option<CellView> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        self.cells.get((row, col)).copied()
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = CellView> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (_, cols) = self.dimensions();

        write!(f, "   ")?;
        for col in 0..cols {
            write!(f, "{:>2}", col % 100)?;
        }
        writeln!(f)?;

        for (index, row) in self.rows().enumerate() {
            write!(f, "{:>2} ", index % 100)?;
            for view in row {
                let symbol = match view {
                    CellView::Hidden => "□".to_string(),
                    CellView::Flagged => "⚑".to_string(),
                    CellView::Revealed(0) => " ".to_string(),
                    CellView::Revealed(n) => n.to_string(),
                    CellView::Mine => "*".to_string(),
                    CellView::Detonated => "X".to_string(),
                    CellView::Misflagged => "x".to_string(),
                };
                write!(f, "{symbol:>2}")?;
            }
            writeln!(f)?;
        }

        write!(f, "{:?}, {} mines left", self.status, self.remaining_mines)
    }
}
