//! Game loop and result bookkeeping

use serde::Serialize;

use crate::game::{GameState, Move, Outcome, Side, WinReason};
use crate::players::Strategy;

/// A finished game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub outcome: Outcome,
    pub moves: Vec<Move>,
    pub final_state: GameState,
}

impl GameRecord {
    pub fn plies(&self) -> usize {
        self.moves.len()
    }
}

/// Play a game from the opening position
pub fn play_game(hounds: &mut dyn Strategy, hare: &mut dyn Strategy) -> GameRecord {
    play_from(GameState::new_game(), hounds, hare, |_, _| {})
}

/// Play until a winner is determined, calling `on_move` after each applied move.
///
/// A strategy that returns no move, or a move `apply_move` rejects, forfeits
/// for its side. Games always end: hounds have finitely many forward moves and
/// the stalling rule caps every sideways run.
pub fn play_from<F>(
    initial: GameState,
    hounds: &mut dyn Strategy,
    hare: &mut dyn Strategy,
    mut on_move: F,
) -> GameRecord
where
    F: FnMut(&GameState, Move),
{
    let mut state = initial;
    let mut moves = Vec::new();

    loop {
        if let Some(outcome) = state.outcome() {
            tracing::debug!("Game over after {} plies: {}", moves.len(), outcome);
            return GameRecord { outcome, moves, final_state: state };
        }

        let side = state.turn();
        let strategy: &mut dyn Strategy = match side {
            Side::Hounds => &mut *hounds,
            Side::Hare => &mut *hare,
        };

        let Some(mv) = strategy.choose_move(&state) else {
            tracing::info!("{} ({}) has no move and forfeits", side, strategy.name());
            return forfeit(side, moves, state);
        };

        match state.apply_move(side, mv) {
            Ok(next) => {
                moves.push(mv);
                state = next;
                on_move(&state, mv);
            }
            Err(e) => {
                tracing::warn!("{} ({}) forfeits: {}", side, strategy.name(), e);
                return forfeit(side, moves, state);
            }
        }
    }
}

fn forfeit(loser: Side, moves: Vec<Move>, state: GameState) -> GameRecord {
    GameRecord {
        outcome: Outcome::new(loser.opponent(), WinReason::Forfeit),
        moves,
        final_state: state,
    }
}

// ============================================================================
// TALLY
// ============================================================================

/// Aggregated results over several games
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MatchTally {
    pub games: usize,
    pub hounds_wins: usize,
    pub hare_wins: usize,
    pub forfeits: usize,
    pub total_plies: usize,
}

impl MatchTally {
    pub fn record(&mut self, game: &GameRecord) {
        self.add(game.outcome, game.plies());
    }

    /// Count one finished game
    pub fn add(&mut self, outcome: Outcome, plies: usize) {
        self.games += 1;
        self.total_plies += plies;
        match outcome.winner {
            Side::Hounds => self.hounds_wins += 1,
            Side::Hare => self.hare_wins += 1,
        }
        if outcome.reason == WinReason::Forfeit {
            self.forfeits += 1;
        }
    }

    /// Combine two tallies
    pub fn combine(&self, other: &MatchTally) -> MatchTally {
        MatchTally {
            games: self.games + other.games,
            hounds_wins: self.hounds_wins + other.hounds_wins,
            hare_wins: self.hare_wins + other.hare_wins,
            forfeits: self.forfeits + other.forfeits,
            total_plies: self.total_plies + other.total_plies,
        }
    }

    pub fn wins(&self, side: Side) -> usize {
        match side {
            Side::Hounds => self.hounds_wins,
            Side::Hare => self.hare_wins,
        }
    }

    pub fn win_rate(&self, side: Side) -> f32 {
        if self.games == 0 {
            0.0
        } else {
            self.wins(side) as f32 / self.games as f32
        }
    }

    pub fn avg_plies(&self) -> f32 {
        if self.games == 0 {
            0.0
        } else {
            self.total_plies as f32 / self.games as f32
        }
    }
}
