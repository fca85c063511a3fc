use crate::{GameConfig, GameError, Position, Result};
use ndarray::{Array2, Zip};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Player-visible state of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) adjacent_mines: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Number of mined neighbors. Only meaningful for safe cells once mines are placed.
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == CellState::Revealed
    }

    pub fn is_flagged(&self) -> bool {
        self.state == CellState::Flagged
    }

    pub fn is_blank(&self) -> bool {
        !self.is_mine && self.adjacent_mines == 0
    }
}

/// Rectangular grid of cells together with its mine layout.
///
/// Mines are laid out at most once, either by [`Board::place_mines`] or up
/// front through [`Board::with_mines`].
#[derive(Debug, Clone)]
pub struct Board {
    cells: Array2<Cell>,
    mines_count: usize,
    mines_placed: bool,
}

impl Board {
    pub fn new(rows: usize, cols: usize, mines_count: usize) -> Result<Self> {
        GameConfig::new(rows, cols, mines_count)?;

        Ok(Board {
            cells: Array2::default((rows, cols)),
            mines_count,
            mines_placed: false,
        })
    }

    /// Builds a board whose mines are already laid out at `mines`.
    ///
    /// Duplicate positions count once. Fails if a position lies outside the
    /// grid or if the layout leaves no safe cell.
    pub fn with_mines(rows: usize, cols: usize, mines: &[Position]) -> Result<Self> {
        let mut board = Board::new(rows, cols, 0)?;

        for &pos in mines {
            let slot = board.slot(pos).ok_or(GameError::OutOfBounds(pos))?;
            board.cells[slot].is_mine = true;
        }

        let mines_count = board.cells.iter().filter(|cell| cell.is_mine).count();
        if mines_count >= board.cells.len() {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                mines: mines_count,
            });
        }

        board.mines_count = mines_count;
        board.finish_layout();
        Ok(board)
    }

    /// Lays out `mines_count` mines uniformly over every cell except `excluding`.
    ///
    /// Returns `false` without touching the board if mines were already placed
    /// or `excluding` lies outside the grid.
    pub fn place_mines<R: Rng + ?Sized>(&mut self, excluding: Position, rng: &mut R) -> bool {
        if self.mines_placed {
            return false;
        }
        let Some((row, col)) = self.slot(excluding) else {
            return false;
        };

        let cols = self.cols();
        let excluded = row * cols + col;
        if self.mines_count > 0 {
            // Sample from every index but the excluded one, then shift past it.
            for drawn in index::sample(rng, self.cells.len() - 1, self.mines_count) {
                let flat = if drawn >= excluded { drawn + 1 } else { drawn };
                self.cells[(flat / cols, flat % cols)].is_mine = true;
            }
        }

        self.finish_layout();
        log::debug!(
            "placed {} mines on {}x{} board, first reveal at {:?}",
            self.mines_count,
            self.rows(),
            cols,
            excluding
        );
        true
    }

    fn finish_layout(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.count_adjacent_mines(position_of(row, col))
        });
        Zip::from(&mut self.cells)
            .and(&counts)
            .for_each(|cell, &count| {
                cell.adjacent_mines = if cell.is_mine { 0 } else { count };
            });
        self.mines_placed = true;
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        self.slot(pos).is_some()
    }

    pub fn get_cell(&self, pos: Position) -> Result<&Cell> {
        self.cell(pos).ok_or(GameError::OutOfBounds(pos))
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.slot(pos).map(|slot| &self.cells[slot])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let slot = self.slot(pos)?;
        Some(&mut self.cells[slot])
    }

    /// Number of mines in the Moore neighborhood of `pos`, clipped to the grid.
    pub fn count_adjacent_mines(&self, pos: Position) -> u8 {
        self.neighbors(pos)
            .filter(|&p| self[p].is_mine)
            .count() as u8
    }

    /// In-bounds Moore neighbors of `pos`.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().filter(move |&p| self.is_within_bounds(p))
    }

    /// In-bounds orthogonal neighbors of `pos`.
    pub fn orthogonal_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.orthogonal_neighbors()
            .filter(move |&p| self.is_within_bounds(p))
    }

    /// Every position in row-major order.
    pub fn iter_positions(&self) -> impl Iterator<Item = Position> {
        let (rows, cols) = self.dimensions();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| position_of(row, col)))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| (position_of(row, col), cell))
    }

    pub fn mine_positions(&self) -> Vec<Position> {
        self.iter_cells()
            .filter(|(_, cell)| cell.is_mine)
            .map(|(pos, _)| pos)
            .collect()
    }

    pub fn count_in_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| cell.state == state).count()
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn mines_count(&self) -> usize {
        self.mines_count
    }

    pub fn safe_cells_count(&self) -> usize {
        self.total_cells() - self.mines_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    fn slot(&self, pos: Position) -> Option<(usize, usize)> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.rows() && col < self.cols()).then_some((row, col))
    }
}

/// Panics if `pos` lies outside the grid.
impl Index<Position> for Board {
    type Output = Cell;

    fn index(&self, pos: Position) -> &Self::Output {
        match self.cell(pos) {
            Some(cell) => cell,
            None => panic!("position {pos:?} is out of bounds"),
        }
    }
}

/// Lossless because `GameConfig::validate` caps both dimensions at `i32::MAX`.
pub(crate) fn position_of(row: usize, col: usize) -> Position {
    Position::new(row as i32, col as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_new_board_is_hidden_and_unmined() {
        let board = Board::new(4, 6, 5).unwrap();

        assert_eq!(board.dimensions(), (4, 6));
        assert_eq!(board.mines_count(), 5);
        assert!(!board.mines_placed());
        assert!(board.mine_positions().is_empty());
        assert_eq!(board.count_in_state(CellState::Hidden), 24);
    }

    #[test]
    fn test_new_rejects_invalid_configuration() {
        assert!(matches!(
            Board::new(1, 1, 1),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(Board::new(0, 3, 0).is_err());
    }

    #[test]
    fn test_place_mines_skips_excluded_cell() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new(3, 3, 8).unwrap();
            let first = Position::new(1, 1);

            assert!(board.place_mines(first, &mut rng));
            assert!(!board[first].is_mine());
            assert_eq!(board.mine_positions().len(), 8);
            assert_eq!(board[first].adjacent_mines(), 8);
        }
    }

    #[test]
    fn test_place_mines_runs_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(5, 5, 4).unwrap();

        assert!(board.place_mines(Position::new(0, 0), &mut rng));
        let layout = board.mine_positions();
        assert!(!board.place_mines(Position::new(4, 4), &mut rng));
        assert_eq!(board.mine_positions(), layout);
    }

    #[test]
    fn test_place_mines_ignores_out_of_bounds_exclusion() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut board = Board::new(5, 5, 4).unwrap();

        assert!(!board.place_mines(Position::new(5, 0), &mut rng));
        assert!(!board.mines_placed());
    }

    #[test]
    fn test_count_adjacent_mines_clips_edges() {
        let board = Board::with_mines(
            3,
            3,
            &[Position::new(0, 0), Position::new(0, 2), Position::new(2, 1)],
        )
        .unwrap();

        assert_eq!(board[Position::new(0, 1)].adjacent_mines(), 2);
        assert_eq!(board[Position::new(1, 1)].adjacent_mines(), 3);
        assert_eq!(board[Position::new(1, 0)].adjacent_mines(), 2);
        assert_eq!(board[Position::new(2, 2)].adjacent_mines(), 1);
        assert_eq!(board.neighbors(Position::new(0, 0)).count(), 3);
    }

    #[test]
    fn test_with_mines_collapses_duplicates() {
        let mine = Position::new(1, 2);
        let board = Board::with_mines(2, 3, &[mine, mine]).unwrap();

        assert_eq!(board.mines_count(), 1);
        assert!(board.mines_placed());
        assert!(board[mine].is_mine());
    }

    #[test]
    fn test_with_mines_rejects_bad_layouts() {
        assert_eq!(
            Board::with_mines(2, 2, &[Position::new(2, 0)]).unwrap_err(),
            GameError::OutOfBounds(Position::new(2, 0))
        );
        let all: Vec<Position> = Board::new(2, 2, 0).unwrap().iter_positions().collect();
        assert!(matches!(
            Board::with_mines(2, 2, &all),
            Err(GameError::InvalidConfiguration { mines: 4, .. })
        ));
    }

    #[test]
    fn test_place_mines_is_uniform() {
        const TRIALS: u64 = 3000;

        for excluded in Board::new(2, 2, 0).unwrap().iter_positions() {
            let mut hits = HashMap::new();
            for seed in 0..TRIALS {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut board = Board::new(2, 2, 1).unwrap();
                board.place_mines(excluded, &mut rng);
                *hits.entry(board.mine_positions()[0]).or_insert(0u64) += 1;
            }

            assert!(!hits.contains_key(&excluded));
            assert_eq!(hits.len(), 3, "excluding {excluded:?}: {hits:?}");
            for (pos, count) in &hits {
                assert!(
                    count.abs_diff(TRIALS / 3) < 150,
                    "excluding {excluded:?}: {pos:?} hit {count} times"
                );
            }
        }
    }

    #[test]
    fn test_get_cell_out_of_bounds() {
        let board = Board::new(2, 2, 0).unwrap();

        assert!(board.get_cell(Position::new(1, 1)).is_ok());
        assert_eq!(
            board.get_cell(Position::new(-1, 0)).unwrap_err(),
            GameError::OutOfBounds(Position::new(-1, 0))
        );
    }
}
