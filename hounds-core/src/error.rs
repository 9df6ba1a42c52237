//! Error types

use crate::game::{Move, Side};

/// Errors raised by the game engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell {0} is not on the board (valid cells are 0-10)")]
    InvalidCell(u8),

    #[error("illegal move {mv} for {side}")]
    IllegalMove { side: Side, mv: Move },

    #[error("it is not {side}'s turn")]
    OutOfTurn { side: Side },

    #[error("the game is already over")]
    GameOver,

    #[error("cell {0} is given more than one piece")]
    CellConflict(u8),
}

/// Errors raised while parsing a move from text
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    #[error("expected two cells, e.g. \"8 5\" or \"8-5\"")]
    MissingCell,

    #[error("'{0}' is not a cell number")]
    NotANumber(String),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),

    #[error(transparent)]
    Cell(#[from] GameError),
}
