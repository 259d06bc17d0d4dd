use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument};

use super::board::CONNECT;
use super::{Board, Dimensions, Player, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// Rejected drop. Only raised for columns outside the board; full columns
/// and moves after the game ended are ignored, see [`DropOutcome::Ignored`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range (board has {cols} columns)")]
    InvalidColumn { column: usize, cols: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    ColumnFull,
    GameOver,
}

/// What a call to [`GameState::drop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// A token landed at `position`. `outcome` is set when this move ended
    /// the game.
    Placed {
        player: Player,
        position: Position,
        outcome: Option<GameOutcome>,
    },
    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl DropOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, DropOutcome::Placed { .. })
    }
}

/// High-level game status, suitable for a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress { current: Player },
    Won(Player),
    Draw,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress { current } => write!(f, "Current Player: {current}"),
            GameStatus::Won(player) => write!(f, "{player} Wins!"),
            GameStatus::Draw => f.write_str("Draw!"),
        }
    }
}

/// The game engine: board, whose turn it is, and how the game ended.
///
/// Mutated only through [`GameState::drop`] and [`GameState::reset`].
/// `last_move` is kept for highlighting and never read by the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    outcome: Option<GameOutcome>,
    last_move: Option<Position>,
}

impl GameState {
    /// Create initial game state on a 6x7 board
    pub fn initial() -> Self {
        Self::with_dimensions(Dimensions::default())
    }

    /// Create initial game state on a board of the given size
    #[instrument(level = "debug")]
    pub fn with_dimensions(dims: Dimensions) -> Self {
        GameState {
            board: Board::with_dimensions(dims),
            current_player: Player::FIRST,
            outcome: None,
            last_move: None,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn dimensions(&self) -> Dimensions {
        self.board.dimensions()
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    /// Cell of the most recent accepted drop
    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn move_count(&self) -> usize {
        self.board.count_filled()
    }

    pub fn status(&self) -> GameStatus {
        match self.outcome {
            None => GameStatus::InProgress {
                current: self.current_player,
            },
            Some(GameOutcome::Winner(player)) => GameStatus::Won(player),
            Some(GameOutcome::Draw) => GameStatus::Draw,
        }
    }

    /// The winner's four-in-a-row, if the game was won
    pub fn winning_line(&self) -> Option<[Position; CONNECT]> {
        let winner = self.winner()?;
        self.board.winning_line(winner.to_cell())
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..self.board.cols())
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's token into `column`.
    ///
    /// Out-of-range columns are an error. A full column, or any column once
    /// the game is over, is ignored and leaves the state untouched.
    pub fn drop(&mut self, column: usize) -> Result<DropOutcome, MoveError> {
        let cols = self.board.cols();
        if column >= cols {
            return Err(MoveError::InvalidColumn { column, cols });
        }

        if self.is_terminal() {
            debug!(column, "drop ignored: game over");
            return Ok(DropOutcome::Ignored(IgnoreReason::GameOver));
        }

        let player = self.current_player;
        let Some(row) = self.board.drop_piece(column, player.to_cell()) else {
            debug!(column, "drop ignored: column full");
            return Ok(DropOutcome::Ignored(IgnoreReason::ColumnFull));
        };

        let position = Position::new(row, column);
        self.last_move = Some(position);
        debug!(%player, row, column, "token placed");

        // Fullness is evaluated after the token is placed, so the move that
        // fills the last cell ends the game.
        if self.board.has_four(player.to_cell()) {
            self.outcome = Some(GameOutcome::Winner(player));
            info!(%player, moves = self.move_count(), "game won");
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
            info!(moves = self.move_count(), "game drawn");
        } else {
            self.current_player = player.other();
        }

        Ok(DropOutcome::Placed {
            player,
            position,
            outcome: self.outcome,
        })
    }

    /// Apply a move and return the new state, leaving `self` unchanged
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        let mut next = self.clone();
        next.drop(column)?;
        Ok(next)
    }

    /// Return to the initial configuration, keeping the board size.
    pub fn reset(&mut self) {
        *self = Self::with_dimensions(self.dimensions());
        info!("game reset");
    }

    /// Value copy of everything a renderer needs.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            rows: self.board.rows(),
            cols: self.board.cols(),
            board: self
                .board
                .rows_iter()
                .map(|row| row.iter().map(|&cell| Player::from_cell(cell)).collect())
                .collect(),
            current_player: self.current_player,
            game_over: self.is_terminal(),
            winner: self.winner(),
            last_move: self.last_move,
            winning_line: self.winning_line(),
            status: self.status().to_string(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Serializable view of a [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub rows: usize,
    pub cols: usize,
    /// `board[row][col]`, row 0 at the top.
    pub board: Vec<Vec<Option<Player>>>,
    pub current_player: Player,
    pub game_over: bool,
    pub winner: Option<Player>,
    pub last_move: Option<Position>,
    pub winning_line: Option<[Position; CONNECT]>,
    pub status: String,
}
