//! Hounds and Hare Core - Game engine and AI
//!
//! This crate provides the core game logic for Hounds and Hare:
//! - Board graph (eleven cells, two tips)
//! - Game state, move generation and outcome detection
//! - Position evaluation with mobility heuristic
//! - Minimax AI with alpha-beta pruning
//! - Player strategies and the game loop

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod players;
pub mod runner;
pub mod config;

// Re-exports for convenient access
pub use board::{Cell, neighbors, neighbors_of, GOAL, ENTRY, HUB};
pub use error::{GameError, ParseMoveError};
pub use game::{GameState, Move, Side, Piece, HoundId, Outcome, WinReason, STALL_LIMIT};
pub use eval::{Heuristics, evaluate, WIN_VALUE};
pub use ai::{best_move, SearchPlayer, SearchResult};
pub use players::{Strategy, RandomStrategy, FirstLegalStrategy, SearchStrategy, HumanStrategy, LineSource};
pub use runner::{play_game, play_from, GameRecord, MatchTally};
pub use config::{PlayerSpec, MatchConfig};
