//! Play command - a single game with the board printed after each move

use anyhow::Result;
use clap::Args;

use hounds_core::config::DEFAULT_DEPTH;
use hounds_core::{play_from, GameRecord, GameState, Move, Side};

use crate::PlayerKind;

#[derive(Args)]
pub struct PlayArgs {
    /// Player for the hounds
    #[arg(long, value_enum, default_value = "search")]
    pub hounds: PlayerKind,

    /// Player for the hare
    #[arg(long, value_enum, default_value = "human")]
    pub hare: PlayerKind,

    /// AI search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Use goal distance and hound cohesion in evaluation
    #[arg(long)]
    pub rich: bool,

    /// Only print the result
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let hounds_spec = args.hounds.to_spec(args.depth, args.rich);
    let hare_spec = args.hare.to_spec(args.depth, args.rich);

    let mut hounds = hounds_spec.build(seed);
    let mut hare = hare_spec.build(seed.map(|s| s.wrapping_add(1)));

    tracing::info!(
        "Starting game: hounds={} hare={}",
        hounds.name(),
        hare.name()
    );

    let initial = GameState::new_game();
    if !args.quiet {
        println!("{}\n", initial);
    }

    let quiet = args.quiet;
    let record = play_from(initial, hounds.as_mut(), hare.as_mut(), |state, mv| {
        if !quiet {
            println!("{}\n", describe_move(state, mv));
            println!("{}\n", state);
        }
    });

    report(&record);
    Ok(())
}

/// "Hounds play 2-5" style line for the move that produced `state`
fn describe_move(state: &GameState, mv: Move) -> String {
    let mover: Side = state.turn().opponent();
    format!("Ply {}: {} play {}", state.ply(), mover, mv)
}

fn report(record: &GameRecord) {
    let moves: Vec<String> = record.moves.iter().map(|m| m.to_string()).collect();
    println!("Result: {} after {} plies", record.outcome, record.plies());
    println!("Moves: {}", moves.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use hounds_core::Cell;

    #[test]
    fn test_describe_move() {
        let mv = Move::new(Cell::new(2).unwrap(), Cell::new(5).unwrap());
        let state = GameState::new_game().apply_move(Side::Hounds, mv).unwrap();
        assert_eq!(describe_move(&state, mv), "Ply 1: Hounds play 2-5");
    }
}
