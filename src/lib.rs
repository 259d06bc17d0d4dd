//! # Connect Four
//!
//! A Connect Four game engine. A [`game::GameState`] owns the board, whose
//! turn it is and how the game ended; callers drive it with
//! [`game::GameState::drop`] and [`game::GameState::reset`] and read back the
//! observable state (or a serializable [`game::GameSnapshot`]) after every
//! operation.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, player, state machine
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod config;
pub mod error;
pub mod game;
