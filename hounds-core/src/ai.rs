//! Depth-limited minimax with alpha-beta pruning

use crate::eval::{evaluate, evaluate_with_depth, Heuristics};
use crate::game::{GameState, Move, Side};

// ============================================================================
// SEARCH PLAYER
// ============================================================================

/// Alpha-beta searcher with a fixed depth and heuristic weights
#[derive(Clone, Debug)]
pub struct SearchPlayer {
    pub depth: u32,
    pub heuristics: Heuristics,
}

impl SearchPlayer {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self { depth, heuristics }
    }

    /// Get best move for the side to move
    pub fn best_move(&self, state: &GameState) -> Option<Move> {
        self.search(state).best
    }

    /// Full search result for the side to move
    pub fn search(&self, state: &GameState) -> SearchResult {
        search(state, state.turn(), self.depth, &self.heuristics)
    }

    /// Evaluate a position for the side to move
    pub fn evaluate(&self, state: &GameState) -> f32 {
        evaluate(state, state.turn(), &self.heuristics)
    }
}

/// Outcome of a root search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// None when the side has no legal move
    pub best: Option<Move>,
    /// Value of `best` for the searching side
    pub score: f32,
    /// Positions visited, root included
    pub nodes: u64,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Best move for `side` using the plain mobility heuristic
pub fn best_move(state: &GameState, side: Side, depth_limit: u32) -> Option<Move> {
    search(state, side, depth_limit, &Heuristics::default()).best
}

/// Alpha-beta search from `side`'s point of view
pub fn search(
    state: &GameState,
    side: Side,
    depth_limit: u32,
    heuristics: &Heuristics,
) -> SearchResult {
    let result = root(state, side, depth_limit, heuristics, true);

    tracing::debug!(
        "{} search depth {}: best={:?} score={} nodes={}",
        side,
        depth_limit,
        result.best.map(|m| m.to_string()),
        result.score,
        result.nodes
    );

    result
}

/// Unpruned minimax, same scoring as `search`. Reference for verifying pruning.
pub fn search_unpruned(
    state: &GameState,
    side: Side,
    depth_limit: u32,
    heuristics: &Heuristics,
) -> SearchResult {
    root(state, side, depth_limit, heuristics, false)
}

// ============================================================================
// MINIMAX
// ============================================================================

struct Search<'a> {
    side: Side,
    limit: i32,
    heuristics: &'a Heuristics,
    prune: bool,
    nodes: u64,
}

fn root(
    state: &GameState,
    side: Side,
    depth_limit: u32,
    heuristics: &Heuristics,
    prune: bool,
) -> SearchResult {
    let mut ctx = Search {
        side,
        limit: depth_limit as i32,
        heuristics,
        prune,
        nodes: 1,
    };

    let moves = state.legal_moves(side);
    if moves.is_empty() {
        return SearchResult {
            best: None,
            score: evaluate_with_depth(state, side, heuristics, ctx.limit),
            nodes: 1,
        };
    }

    let mut best = None;
    let mut best_score = f32::NEG_INFINITY;
    let mut alpha = f32::NEG_INFINITY;

    for mv in moves {
        let child = state.successor(mv);
        let score = ctx.minimax(&child, 1, alpha, f32::INFINITY, false);

        // Strict comparison keeps the first of equally scored moves
        if score > best_score {
            best_score = score;
            best = Some(mv);
        }
        alpha = alpha.max(score);
    }

    SearchResult {
        best,
        score: best_score,
        nodes: ctx.nodes,
    }
}

impl Search<'_> {
    fn minimax(
        &mut self,
        state: &GameState,
        depth: i32,
        mut alpha: f32,
        mut beta: f32,
        maximizing: bool,
    ) -> f32 {
        self.nodes += 1;

        if state.is_terminal() {
            return evaluate_with_depth(state, self.side, self.heuristics, self.limit - depth);
        }

        if depth >= self.limit {
            return evaluate(state, self.side, self.heuristics);
        }

        let mover = if maximizing {
            self.side
        } else {
            self.side.opponent()
        };

        let moves = state.legal_moves(mover);
        if moves.is_empty() {
            return evaluate(state, self.side, self.heuristics);
        }

        if maximizing {
            let mut best = f32::NEG_INFINITY;
            for mv in moves {
                let score = self.minimax(&state.successor(mv), depth + 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if self.prune && alpha >= beta {
                    break;
                }
            }
            best
        } else {
            let mut best = f32::INFINITY;
            for mv in moves {
                let score = self.minimax(&state.successor(mv), depth + 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if self.prune && alpha >= beta {
                    break;
                }
            }
            best
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
