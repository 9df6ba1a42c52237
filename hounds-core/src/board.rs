//! Board graph: eleven cells arranged in five columns
//!
//! ```text
//!           1 --- 4 --- 7
//!         / | \   |   / |
//!       0 - 2 --- 5 --- 8 --- 10
//!         \ | /   |   \ |
//!           3 --- 6 --- 9
//! ```
//!
//! Cell 0 is the Hare's goal, cell 10 the Hare's entry. The entry tip only
//! touches cell 8, the hub where the three rows converge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Number of cells on the board
pub const CELL_COUNT: usize = 11;

/// Highest column index (the entry tip)
pub const MAX_COLUMN: u8 = 4;

/// A validated board position (0-10)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cell(u8);

/// Hare's goal tip
pub const GOAL: Cell = Cell(0);

/// Hare's entry tip
pub const ENTRY: Cell = Cell(10);

/// Hub cell, the only neighbor of the entry tip
pub const HUB: Cell = Cell(8);

/// Starting cells for hounds One, Two and Three
pub const HOUND_START: [Cell; 3] = [Cell(1), Cell(2), Cell(3)];

impl Cell {
    /// Create a cell, rejecting indices off the board
    pub fn new(index: u8) -> Result<Self, GameError> {
        if (index as usize) < CELL_COUNT {
            Ok(Self(index))
        } else {
            Err(GameError::InvalidCell(index))
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column from the goal side: 0 for the goal tip, 4 for the entry tip
    pub const fn column(self) -> u8 {
        COLUMNS[self.0 as usize]
    }

    /// Check if this cell is one of the two tips reserved for the Hare
    pub fn is_tip(self) -> bool {
        self == GOAL || self == ENTRY
    }

    /// All cells in index order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..CELL_COUNT as u8).map(Cell)
    }
}

impl TryFrom<u8> for Cell {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Cell::new(index)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const COLUMNS: [u8; CELL_COUNT] = [0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4];

/// Adjacency lists, ascending. Symmetric.
const ADJACENCY: [&[Cell]; CELL_COUNT] = [
    &[Cell(1), Cell(2), Cell(3)],
    &[Cell(0), Cell(2), Cell(4), Cell(5)],
    &[Cell(0), Cell(1), Cell(3), Cell(5)],
    &[Cell(0), Cell(2), Cell(5), Cell(6)],
    &[Cell(1), Cell(5), Cell(7)],
    &[Cell(1), Cell(2), Cell(3), Cell(4), Cell(6), Cell(7), Cell(8), Cell(9)],
    &[Cell(3), Cell(5), Cell(9)],
    &[Cell(4), Cell(5), Cell(8)],
    &[Cell(5), Cell(7), Cell(9), Cell(10)],
    &[Cell(5), Cell(6), Cell(8)],
    &[Cell(8)],
];

/// Cells adjacent to `cell`
pub fn neighbors(cell: Cell) -> &'static [Cell] {
    ADJACENCY[cell.index()]
}

/// Cells adjacent to a raw index, failing for indices off the board
pub fn neighbors_of(index: u8) -> Result<&'static [Cell], GameError> {
    Cell::new(index).map(neighbors)
}

/// Check if two cells share an edge
pub fn is_adjacent(a: Cell, b: Cell) -> bool {
    neighbors(a).contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_validity() {
        assert!(Cell::new(0).is_ok());
        assert!(Cell::new(10).is_ok());
        assert_eq!(Cell::new(11), Err(GameError::InvalidCell(11)));
        assert!(neighbors_of(200).is_err());
    }

    #[test]
    fn test_adjacency_symmetric() {
        for a in Cell::all() {
            for &b in neighbors(a) {
                assert_ne!(a, b);
                assert!(is_adjacent(b, a), "{} -> {} has no reverse edge", a, b);
            }
        }
    }

    #[test]
    fn test_adjacency_sorted_and_local() {
        for a in Cell::all() {
            let adj = neighbors(a);
            assert!(adj.windows(2).all(|w| w[0] < w[1]));
            for &b in adj {
                assert!(a.column().abs_diff(b.column()) <= 1);
            }
        }
    }

    #[test]
    fn test_entry_only_touches_hub() {
        assert_eq!(neighbors(ENTRY), &[HUB]);
        assert_eq!(ENTRY.column(), MAX_COLUMN);
        assert_eq!(GOAL.column(), 0);
    }

    #[test]
    fn test_serde_rejects_off_board() {
        let cell: Cell = serde_json::from_str("7").unwrap();
        assert_eq!(cell.index(), 7);
        assert!(serde_json::from_str::<Cell>("11").is_err());
    }
}
