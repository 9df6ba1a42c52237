//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::MAX_COLUMN;
use crate::game::{GameState, Side};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Weight for mobility (own legal moves minus opponent's)
    pub mobility_weight: f32,
    /// Weight for the Hare's progress toward the goal tip
    pub goal_weight: f32,
    /// Weight for the column spread of the hounds (a loose line favours the Hare)
    pub cohesion_weight: f32,
}

impl Default for Heuristics {
    /// Plain mobility differential
    fn default() -> Self {
        Self {
            mobility_weight: 1.0,
            goal_weight: 0.0,
            cohesion_weight: 0.0,
        }
    }
}

impl Heuristics {
    /// Mobility plus goal distance and hound cohesion
    pub fn rich() -> Self {
        Self {
            mobility_weight: 1.0,
            goal_weight: 2.0,
            cohesion_weight: 0.5,
        }
    }
}

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// Evaluate position from `perspective`'s point of view
pub fn evaluate(state: &GameState, perspective: Side, heuristics: &Heuristics) -> f32 {
    if let Some(outcome) = state.outcome() {
        return if outcome.winner == perspective {
            WIN_VALUE
        } else {
            -WIN_VALUE
        };
    }

    let mut score = 0.0f32;

    if heuristics.mobility_weight.abs() > 0.001 {
        let mine = state.mobility(perspective) as f32;
        let theirs = state.mobility(perspective.opponent()) as f32;
        score += heuristics.mobility_weight * (mine - theirs);
    }

    // Terms below are positive when they favour the Hare
    let mut hare_edge = 0.0f32;

    if heuristics.goal_weight.abs() > 0.001 {
        let progress = MAX_COLUMN - state.hare().column();
        hare_edge += heuristics.goal_weight * progress as f32;
    }

    if heuristics.cohesion_weight.abs() > 0.001 {
        let columns = state.hounds().map(|c| c.column());
        let front = columns.iter().copied().fold(0, u8::max);
        let back = columns.iter().copied().fold(u8::MAX, u8::min);
        hare_edge += heuristics.cohesion_weight * (front - back) as f32;
    }

    match perspective {
        Side::Hare => score + hare_edge,
        Side::Hounds => score - hare_edge,
    }
}

/// Evaluate with depth bonus for preferring faster wins
pub fn evaluate_with_depth(
    state: &GameState,
    perspective: Side,
    heuristics: &Heuristics,
    remaining_depth: i32,
) -> f32 {
    match state.winner() {
        Some(winner) if winner == perspective => WIN_VALUE + remaining_depth as f32,
        Some(_) => -WIN_VALUE - remaining_depth as f32,
        None => evaluate(state, perspective, heuristics),
    }
}
