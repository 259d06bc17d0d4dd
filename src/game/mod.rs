//! Core Connect Four game logic: board representation, player types, and the
//! game state machine that applies drops and detects wins and draws.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Dimensions, Direction, Position, COLS, CONNECT, ROWS};
pub use player::Player;
pub use state::{DropOutcome, GameOutcome, GameSnapshot, GameState, GameStatus, IgnoreReason, MoveError};
