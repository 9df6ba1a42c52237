//! Game state, move generation and outcome detection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{neighbors, Cell, CELL_COUNT, ENTRY, GOAL, HOUND_START};
use crate::error::{GameError, ParseMoveError};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Consecutive sideways hound moves that hand the Hare the win
pub const STALL_LIMIT: u8 = 10;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Side to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Hounds,
    Hare,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Hounds => Side::Hare,
            Side::Hare => Side::Hounds,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Hounds => write!(f, "Hounds"),
            Side::Hare => write!(f, "Hare"),
        }
    }
}

/// Identity of one of the three hounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HoundId {
    One,
    Two,
    Three,
}

impl HoundId {
    pub const ALL: [HoundId; 3] = [HoundId::One, HoundId::Two, HoundId::Three];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    Hound(HoundId),
    Hare,
}

impl Piece {
    pub fn side(self) -> Side {
        match self {
            Piece::Hound(_) => Side::Hounds,
            Piece::Hare => Side::Hare,
        }
    }
}

/// A relocation of the piece standing on `from`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

impl Move {
    pub fn new(from: Cell, to: Cell) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Parses "8 5", "8-5" or "8,5"
impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s
            .split(|c: char| c.is_whitespace() || c == '-' || c == ',')
            .filter(|p| !p.is_empty());

        let from = parse_cell(parts.next())?;
        let to = parse_cell(parts.next())?;

        if let Some(extra) = parts.next() {
            return Err(ParseMoveError::TrailingInput(extra.to_string()));
        }

        Ok(Move { from, to })
    }
}

fn parse_cell(token: Option<&str>) -> Result<Cell, ParseMoveError> {
    let token = token.ok_or(ParseMoveError::MissingCell)?;
    let index: u8 = token
        .parse()
        .map_err(|_| ParseMoveError::NotANumber(token.to_string()))?;
    Ok(Cell::new(index)?)
}

/// Why a game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    /// Hare stands on the goal tip
    ReachedGoal,
    /// Hare is in a column behind every hound
    SlippedPast,
    /// Hounds moved sideways `STALL_LIMIT` times in a row
    Stalling,
    /// Hare has no move on its turn
    Trapped,
    /// No hound can move on the hounds' turn
    HoundsBlocked,
    /// A player gave up or supplied an illegal move
    Forfeit,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WinReason::ReachedGoal => "hare reached the goal",
            WinReason::SlippedPast => "hare slipped past the hounds",
            WinReason::Stalling => "hounds stalled",
            WinReason::Trapped => "hare trapped",
            WinReason::HoundsBlocked => "hounds blocked",
            WinReason::Forfeit => "forfeit",
        };
        f.write_str(text)
    }
}

/// Winner and reason of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Side,
    pub reason: WinReason,
}

impl Outcome {
    pub fn new(winner: Side, reason: WinReason) -> Self {
        Self { winner, reason }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} win ({})", self.winner, self.reason)
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable game position. Transitions return a fresh value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    /// Cell -> occupant
    occupancy: [Option<Piece>; CELL_COUNT],

    /// Piece positions for quick access
    hounds: [Cell; 3],
    hare: Cell,

    turn: Side,
    sideways_streak: u8,

    /// Moves applied since the opening position
    ply: u16,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Opening position: hounds on 1, 2, 3, Hare on the entry tip, hounds to move
    pub fn new_game() -> Self {
        Self::build(HOUND_START, ENTRY, Side::Hounds, 0)
    }

    /// Build an arbitrary position. Fails if two pieces share a cell.
    pub fn from_positions(
        hounds: [Cell; 3],
        hare: Cell,
        turn: Side,
        sideways_streak: u8,
    ) -> Result<Self, GameError> {
        let mut seen = [false; CELL_COUNT];
        for cell in hounds.iter().chain(std::iter::once(&hare)) {
            if seen[cell.index()] {
                return Err(GameError::CellConflict(u8::from(*cell)));
            }
            seen[cell.index()] = true;
        }
        Ok(Self::build(hounds, hare, turn, sideways_streak))
    }

    fn build(hounds: [Cell; 3], hare: Cell, turn: Side, sideways_streak: u8) -> Self {
        let mut occupancy = [None; CELL_COUNT];
        for id in HoundId::ALL {
            occupancy[hounds[id.index()].index()] = Some(Piece::Hound(id));
        }
        occupancy[hare.index()] = Some(Piece::Hare);

        Self {
            occupancy,
            hounds,
            hare,
            turn,
            sideways_streak,
            ply: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn sideways_streak(&self) -> u8 {
        self.sideways_streak
    }

    pub fn ply(&self) -> u16 {
        self.ply
    }

    pub fn hare(&self) -> Cell {
        self.hare
    }

    pub fn hound(&self, id: HoundId) -> Cell {
        self.hounds[id.index()]
    }

    pub fn hounds(&self) -> [Cell; 3] {
        self.hounds
    }

    pub fn piece_at(&self, cell: Cell) -> Option<Piece> {
        self.occupancy[cell.index()]
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        self.occupancy[cell.index()].is_none()
    }

    /// Column of the hound furthest back
    pub fn rearmost_hound_column(&self) -> u8 {
        self.hounds.iter().map(|c| c.column()).fold(u8::MAX, u8::min)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal moves for `side`, hounds in id order, destinations ascending.
    /// Empty when the side is stuck.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        self.moves_for(side).collect()
    }

    /// Number of legal moves for `side`
    pub fn mobility(&self, side: Side) -> usize {
        self.moves_for(side).count()
    }

    fn moves_for(&self, side: Side) -> impl Iterator<Item = Move> + '_ {
        let origins: &[Cell] = match side {
            Side::Hounds => &self.hounds,
            Side::Hare => std::slice::from_ref(&self.hare),
        };

        origins.iter().flat_map(move |&from| {
            neighbors(from)
                .iter()
                .copied()
                .filter(move |&to| self.is_empty(to) && may_step(side, from, to))
                .map(move |to| Move { from, to })
        })
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and apply a move, returning the next position
    pub fn apply_move(&self, side: Side, mv: Move) -> Result<GameState, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        if side != self.turn {
            return Err(GameError::OutOfTurn { side });
        }
        if !self.moves_for(side).any(|m| m == mv) {
            return Err(GameError::IllegalMove { side, mv });
        }
        Ok(self.successor(mv))
    }

    /// Apply a move already known to be legal. The turn passes to the
    /// opponent of whichever side owns the moved piece. A move from an empty
    /// cell leaves the position untouched.
    pub(crate) fn successor(&self, mv: Move) -> GameState {
        let occupant = self.occupancy[mv.from.index()];
        debug_assert!(occupant.is_some(), "no piece on cell {}", mv.from);
        let Some(piece) = occupant else {
            return self.clone();
        };

        let mut next = self.clone();
        next.occupancy[mv.from.index()] = None;
        next.occupancy[mv.to.index()] = Some(piece);
        next.turn = piece.side().opponent();

        match piece {
            Piece::Hare => next.hare = mv.to,
            Piece::Hound(id) => {
                next.hounds[id.index()] = mv.to;
                next.sideways_streak = if mv.to.column() > mv.from.column() {
                    0
                } else {
                    next.sideways_streak.saturating_add(1)
                };
            }
        }

        next.ply = self.ply.saturating_add(1);
        next
    }

    // ========================================================================
    // OUTCOME
    // ========================================================================

    /// Winner and reason, or None while the game is running
    pub fn outcome(&self) -> Option<Outcome> {
        if self.hare == GOAL {
            return Some(Outcome::new(Side::Hare, WinReason::ReachedGoal));
        }

        if self.hare.column() < self.rearmost_hound_column() {
            return Some(Outcome::new(Side::Hare, WinReason::SlippedPast));
        }

        if self.sideways_streak >= STALL_LIMIT {
            return Some(Outcome::new(Side::Hare, WinReason::Stalling));
        }

        match self.turn {
            Side::Hare if self.mobility(Side::Hare) == 0 => {
                Some(Outcome::new(Side::Hounds, WinReason::Trapped))
            }
            Side::Hounds if self.mobility(Side::Hounds) == 0 => {
                Some(Outcome::new(Side::Hare, WinReason::HoundsBlocked))
            }
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome().map(|o| o.winner)
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Side-specific movement restriction on top of adjacency and emptiness
fn may_step(side: Side, from: Cell, to: Cell) -> bool {
    match side {
        Side::Hare => true,
        Side::Hounds => from != GOAL && !to.is_tip() && to.column() >= from.column(),
    }
}

// ============================================================================
// RENDERING
// ============================================================================

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = |i: usize| -> String {
            match self.occupancy[i] {
                Some(Piece::Hound(id)) => format!("h{}", id.index() + 1),
                Some(Piece::Hare) => " A".to_string(),
                None => format!("{:>2}", i),
            }
        };

        writeln!(f, "     {} -- {} -- {}", t(1), t(4), t(7))?;
        writeln!(f, "   /  |  \\  |  /  |")?;
        writeln!(f, "{} - {} -- {} -- {} -- {}", t(0), t(2), t(5), t(8), t(10))?;
        writeln!(f, "   \\  |  /  |  \\  |")?;
        writeln!(f, "     {} -- {} -- {}", t(3), t(6), t(9))?;
        match self.outcome() {
            Some(outcome) => write!(f, "Game over: {}", outcome),
            None => write!(
                f,
                "{} to move (sideways streak {})",
                self.turn, self.sideways_streak
            ),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HUB;

    fn c(i: u8) -> Cell {
        Cell::new(i).unwrap()
    }

    fn mv(from: u8, to: u8) -> Move {
        Move::new(c(from), c(to))
    }

    fn position(hounds: [u8; 3], hare: u8, turn: Side, streak: u8) -> GameState {
        GameState::from_positions(hounds.map(c), c(hare), turn, streak).unwrap()
    }

    fn assert_piece_counts(state: &GameState) {
        let hares = Cell::all().filter(|&c| state.piece_at(c) == Some(Piece::Hare)).count();
        let hounds = Cell::all()
            .filter(|&c| matches!(state.piece_at(c), Some(Piece::Hound(_))))
            .count();
        let empty = Cell::all().filter(|&c| state.is_empty(c)).count();
        assert_eq!((hares, hounds, empty), (1, 3, 7));
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new_game();
        assert_eq!(game.turn(), Side::Hounds);
        assert_eq!(game.sideways_streak(), 0);
        assert_eq!(game.hare(), ENTRY);
        assert_eq!(game.hounds(), [c(1), c(2), c(3)]);
        assert!(!game.is_terminal());
        assert_piece_counts(&game);
    }

    #[test]
    fn test_hare_opening_has_single_move() {
        let game = GameState::new_game();
        assert_eq!(game.legal_moves(Side::Hare), vec![Move::new(ENTRY, HUB)]);
    }

    #[test]
    fn test_hound_opening_moves() {
        let game = GameState::new_game();
        let moves = game.legal_moves(Side::Hounds);
        assert_eq!(
            moves,
            vec![mv(1, 4), mv(1, 5), mv(2, 5), mv(3, 5), mv(3, 6)]
        );
        for m in moves {
            assert!(m.to.column() >= m.from.column());
        }
    }

    #[test]
    fn test_hounds_never_move_backward_or_onto_tips() {
        // Hound on 8 could step back to 5 or onto the entry tip; neither is allowed
        let game = position([8, 1, 2], 6, Side::Hounds, 0);
        let from_eight: Vec<_> = game
            .legal_moves(Side::Hounds)
            .into_iter()
            .filter(|m| m.from == c(8))
            .collect();
        assert_eq!(from_eight, vec![mv(8, 7), mv(8, 9)]);
    }

    #[test]
    fn test_hound_on_goal_tip_is_frozen() {
        let game = position([0, 4, 6], 9, Side::Hounds, 0);
        assert!(game.legal_moves(Side::Hounds).iter().all(|m| m.from != GOAL));
    }

    #[test]
    fn test_occupied_cells_block() {
        let game = position([5, 7, 9], 8, Side::Hare, 0);
        assert_eq!(game.legal_moves(Side::Hare), vec![mv(8, 10)]);
    }

    #[test]
    fn test_apply_move_is_pure() {
        let game = GameState::new_game();
        let before = game.clone();
        let a = game.apply_move(Side::Hounds, mv(2, 5)).unwrap();
        let b = game.apply_move(Side::Hounds, mv(2, 5)).unwrap();
        assert_eq!(a, b);
        assert_eq!(game, before);
        assert_eq!(a.piece_at(c(5)), Some(Piece::Hound(HoundId::Two)));
        assert!(a.is_empty(c(2)));
        assert_eq!(a.turn(), Side::Hare);
        assert_eq!(a.ply(), 1);
        assert_piece_counts(&a);
    }

    #[test]
    fn test_apply_move_rejects() {
        let game = GameState::new_game();
        assert_eq!(
            game.apply_move(Side::Hare, mv(10, 8)),
            Err(GameError::OutOfTurn { side: Side::Hare })
        );
        assert_eq!(
            game.apply_move(Side::Hounds, mv(1, 0)),
            Err(GameError::IllegalMove { side: Side::Hounds, mv: mv(1, 0) })
        );
        assert_eq!(
            game.apply_move(Side::Hounds, mv(1, 2)),
            Err(GameError::IllegalMove { side: Side::Hounds, mv: mv(1, 2) })
        );
    }

    #[test]
    fn test_sideways_streak() {
        let game = position([4, 2, 6], 8, Side::Hounds, 3);
        let sideways = game.apply_move(Side::Hounds, mv(2, 1)).unwrap();
        assert_eq!(sideways.sideways_streak(), 4);

        let hare_moved = sideways.apply_move(Side::Hare, mv(8, 9)).unwrap();
        assert_eq!(hare_moved.sideways_streak(), 4);

        let forward = hare_moved.apply_move(Side::Hounds, mv(4, 7)).unwrap();
        assert_eq!(forward.sideways_streak(), 0);
    }

    #[test]
    fn test_stalling_hands_hare_the_win() {
        // Shuffle one hound between 1 and 2 while the Hare waits on 7 and 8
        let mut game = position([1, 5, 6], 8, Side::Hounds, 0);
        let shuffle = [mv(1, 2), mv(2, 1)];
        let hare_steps = [mv(8, 7), mv(7, 8)];

        for i in 0..STALL_LIMIT as usize {
            assert!(!game.is_terminal(), "ended early after {} hound moves", i);
            game = game.apply_move(Side::Hounds, shuffle[i % 2]).unwrap();
            if game.is_terminal() {
                break;
            }
            game = game.apply_move(Side::Hare, hare_steps[i % 2]).unwrap();
        }

        assert_eq!(game.sideways_streak(), STALL_LIMIT);
        assert_eq!(game.winner(), Some(Side::Hare));
        assert_eq!(game.outcome().map(|o| o.reason), Some(WinReason::Stalling));
    }

    #[test]
    fn test_hare_on_goal_wins() {
        let game = position([4, 5, 6], 0, Side::Hounds, 0);
        assert!(game.is_terminal());
        assert_eq!(game.outcome(), Some(Outcome::new(Side::Hare, WinReason::ReachedGoal)));

        // Regardless of streak
        let stalled = position([4, 5, 6], 0, Side::Hare, STALL_LIMIT);
        assert_eq!(stalled.outcome().map(|o| o.reason), Some(WinReason::ReachedGoal));
    }

    #[test]
    fn test_hare_slipped_past() {
        let game = position([4, 5, 9], 2, Side::Hounds, 0);
        assert_eq!(game.outcome(), Some(Outcome::new(Side::Hare, WinReason::SlippedPast)));

        // Same column as a hound is not past
        let level = position([1, 5, 9], 2, Side::Hounds, 0);
        assert_eq!(level.outcome(), None);
    }

    #[test]
    fn test_trapped_hare() {
        let game = position([7, 9, 8], 10, Side::Hare, 0);
        assert!(game.legal_moves(Side::Hare).is_empty());
        assert_eq!(game.outcome(), Some(Outcome::new(Side::Hounds, WinReason::Trapped)));

        // Only the Hare's own turn counts
        let hounds_turn = position([7, 9, 8], 10, Side::Hounds, 0);
        assert_ne!(hounds_turn.winner(), Some(Side::Hounds));
    }

    #[test]
    fn test_blocked_hounds() {
        // Hounds on column 3 have nowhere forward; sideways cells are full
        let game = position([7, 8, 9], 10, Side::Hounds, 0);
        assert!(game.legal_moves(Side::Hounds).is_empty());
        assert_eq!(game.outcome(), Some(Outcome::new(Side::Hare, WinReason::HoundsBlocked)));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no piece on cell 4")]
    fn test_successor_from_empty_cell_asserts() {
        GameState::new_game().successor(mv(4, 7));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_successor_from_empty_cell_is_noop() {
        let game = GameState::new_game();
        assert_eq!(game.successor(mv(4, 7)), game);
    }

    #[test]
    fn test_terminal_state_rejects_moves() {
        let game = position([4, 5, 6], 0, Side::Hounds, 0);
        assert_eq!(game.apply_move(Side::Hounds, mv(4, 7)), Err(GameError::GameOver));
    }

    #[test]
    fn test_from_positions_conflict() {
        let err = GameState::from_positions([c(1), c(1), c(3)], c(10), Side::Hounds, 0);
        assert_eq!(err, Err(GameError::CellConflict(1)));
    }

    #[test]
    fn test_parse_move() {
        assert_eq!("8 5".parse::<Move>(), Ok(mv(8, 5)));
        assert_eq!("10-8".parse::<Move>(), Ok(mv(10, 8)));
        assert_eq!(" 3 , 6 ".parse::<Move>(), Ok(mv(3, 6)));
        assert_eq!("8".parse::<Move>(), Err(ParseMoveError::MissingCell));
        assert!(matches!("x 5".parse::<Move>(), Err(ParseMoveError::NotANumber(_))));
        assert!(matches!("1 2 3".parse::<Move>(), Err(ParseMoveError::TrailingInput(_))));
        assert_eq!(
            "12 5".parse::<Move>(),
            Err(ParseMoveError::Cell(GameError::InvalidCell(12)))
        );
        assert_eq!(mv(8, 5).to_string(), "8-5");
    }

    #[test]
    fn test_render() {
        let text = GameState::new_game().to_string();
        assert!(text.contains("h1"));
        assert!(text.contains(" A"));
        assert!(text.contains("Hounds to move"));
        assert_eq!(text.lines().count(), 6);
    }
}
