use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// Grid coordinates of a single cell, `row` first.
///
/// Coordinates are signed so that neighbor arithmetic near the edges never
/// underflows; positions outside a board are simply rejected by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The up to 8 surrounding positions (Moore neighborhood), unclipped.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        iproduct!(-1..=1, -1..=1)
            .filter(|&(dr, dc)| (dr, dc) != (0, 0))
            .map(move |(dr, dc)| Position::new(self.row + dr, self.col + dc))
    }

    /// The 4 edge-sharing positions, unclipped.
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Position> {
        [(-1, 0), (0, -1), (0, 1), (1, 0)]
            .into_iter()
            .map(move |(dr, dc)| Position::new(self.row + dr, self.col + dc))
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}
