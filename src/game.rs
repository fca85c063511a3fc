use crate::{
    ActionOutcome, Board, CellChange, CellState, FlagOutcome, FloodPolicy, GameConfig, Position,
    Result, RevealOutcome, Snapshot,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal,
    Flag,
}

/// One game of minesweeper: the board, its status and the flag counter.
///
/// Mines are placed on the first accepted reveal so that it is always safe.
/// Actions that cannot apply (finished game, off-board position, revealed or
/// flagged target) leave the game untouched and report the current state.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    config: GameConfig,
    status: GameStatus,
    revealed_count: usize,
    remaining_mines: i64,
    detonated: Option<Position>,
    rng: StdRng,
}

/// Starts a game on a `rows x cols` board with the default flood policy.
pub fn new_game(rows: usize, cols: usize, mine_count: usize) -> Result<Game> {
    Game::new(GameConfig::new(rows, cols, mine_count)?)
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same configuration and seed always produce the same mine layout.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self> {
        let board = Board::new(config.rows, config.cols, config.mines)?;
        Ok(Self::from_parts(board, config.flood, rng))
    }

    /// Plays on a board whose mines are already laid out.
    pub fn from_board(board: Board, flood: FloodPolicy) -> Self {
        Self::from_parts(board, flood, StdRng::from_entropy())
    }

    fn from_parts(board: Board, flood: FloodPolicy, rng: StdRng) -> Self {
        let (rows, cols) = board.dimensions();
        let mines = board.mines_count();
        let revealed_count = board.count_in_state(CellState::Revealed);
        let remaining_mines = mines as i64 - board.count_in_state(CellState::Flagged) as i64;

        Self {
            board,
            config: GameConfig {
                rows,
                cols,
                mines,
                flood,
            },
            status: GameStatus::NotStarted,
            revealed_count,
            remaining_mines,
            detonated: None,
            rng,
        }
    }

    /// Throws the current board away and starts over with the same configuration.
    pub fn restart(&mut self) {
        self.replace_board(self.config);
    }

    /// Starts over with `config`; the current game is kept if it is invalid.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<()> {
        if let Err(err) = config.validate() {
            log::warn!("rejected configuration {config:?}: {err}");
            return Err(err);
        }
        self.replace_board(config);
        Ok(())
    }

    fn replace_board(&mut self, config: GameConfig) {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        if let Ok(game) = Self::with_rng(config, rng) {
            *self = game;
        }
    }

    pub fn perform_action(&mut self, pos: Position, action: Action) -> ActionOutcome {
        match action {
            Action::Reveal => ActionOutcome::Reveal(self.reveal(pos)),
            Action::Flag => ActionOutcome::Flag(self.toggle_flag(pos)),
        }
    }

    pub fn reveal(&mut self, pos: Position) -> RevealOutcome {
        let previous_status = self.status;
        let mut outcome = RevealOutcome::unchanged(previous_status, self.remaining_mines);

        if self.status.is_finished() {
            return outcome;
        }
        match self.board.cell(pos) {
            Some(cell) if cell.state() == CellState::Hidden => {}
            _ => return outcome,
        }

        if self.status == GameStatus::NotStarted {
            self.board.place_mines(pos, &mut self.rng);
            self.set_status(GameStatus::InProgress);
        }

        let cell = self.board[pos];
        if cell.is_mine() {
            self.reveal_cell(pos, &mut outcome.changed);
            self.detonated = Some(pos);
            outcome.exposed_mines = self.board.mine_positions();
            self.set_status(GameStatus::Lost);
        } else if cell.adjacent_mines() > 0 {
            self.reveal_cell(pos, &mut outcome.changed);
        } else {
            self.flood_reveal(pos, &mut outcome.changed);
        }

        if self.status == GameStatus::InProgress
            && self.revealed_count == self.board.safe_cells_count()
        {
            self.set_status(GameStatus::Won);
        }

        outcome.status = self.status;
        outcome.remaining_mines = self.remaining_mines;
        outcome
    }

    /// Breadth-first reveal of the blank region around `start` and its numbered border.
    fn flood_reveal(&mut self, start: Position, changed: &mut Vec<CellChange>) {
        let mut queued = Array2::from_elem(self.board.dimensions(), false);
        let mut queue = VecDeque::from([start]);
        queued[slot(start)] = true;

        while let Some(pos) = queue.pop_front() {
            let cell = self.board[pos];
            if cell.is_revealed() {
                continue;
            }
            self.reveal_cell(pos, changed);
            if !cell.is_blank() {
                continue;
            }

            let next: Vec<Position> = self
                .flood_neighbors(pos)
                .filter(|&p| !queued[slot(p)] && self.board[p].state() == CellState::Hidden)
                .collect();
            for p in next {
                queued[slot(p)] = true;
                queue.push_back(p);
            }
        }

        log::trace!("flood fill from {start:?} revealed {} cells", changed.len());
    }

    fn flood_neighbors(&self, pos: Position) -> Box<dyn Iterator<Item = Position> + '_> {
        match self.config.flood {
            FloodPolicy::Moore => Box::new(self.board.neighbors(pos)),
            FloodPolicy::Orthogonal => Box::new(self.board.orthogonal_neighbors(pos)),
        }
    }

    fn reveal_cell(&mut self, pos: Position, changed: &mut Vec<CellChange>) {
        let Some(cell) = self.board.cell_mut(pos) else {
            return;
        };
        if cell.is_revealed() {
            return;
        }

        debug_assert!(!cell.is_flagged(), "flagged cell at {pos:?} revealed");
        cell.state = CellState::Revealed;
        let adjacent_mines = (!cell.is_mine).then_some(cell.adjacent_mines);
        let is_mine = cell.is_mine;

        if !is_mine {
            self.revealed_count += 1;
        }
        changed.push(CellChange {
            position: pos,
            state: CellState::Revealed,
            adjacent_mines,
        });
    }

    pub fn toggle_flag(&mut self, pos: Position) -> FlagOutcome {
        let mut outcome = FlagOutcome {
            position: pos,
            state: self.board.cell(pos).map(|cell| cell.state()),
            changed: false,
            remaining_mines: self.remaining_mines,
        };
        if self.status.is_finished() {
            return outcome;
        }
        let Some(cell) = self.board.cell_mut(pos) else {
            return outcome;
        };

        let (state, delta) = match cell.state {
            CellState::Hidden => (CellState::Flagged, -1),
            CellState::Flagged => (CellState::Hidden, 1),
            CellState::Revealed => return outcome,
        };
        cell.state = state;
        self.remaining_mines += delta;

        outcome.state = Some(state);
        outcome.changed = true;
        outcome.remaining_mines = self.remaining_mines;
        outcome
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            log::info!("game status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            &self.board,
            self.status,
            self.remaining_mines,
            self.detonated,
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Mines left according to the flags placed; negative when over-flagged.
    pub fn remaining_mines(&self) -> i64 {
        self.remaining_mines
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        self.board.dimensions()
    }
}

/// Array index of an in-bounds position.
fn slot(pos: Position) -> (usize, usize) {
    (pos.row as usize, pos.col as usize)
}
