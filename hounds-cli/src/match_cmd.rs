//! Match command - play a series of games between two players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_config(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use hounds_core::config::DEFAULT_DEPTH;
use hounds_core::{play_game, MatchConfig, MatchTally, Outcome, Side, WinReason};

use crate::PlayerKind;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Match config JSON file (overrides the player flags)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Player for the hounds
    #[arg(long, value_enum, default_value = "search")]
    pub hounds: PlayerKind,

    /// Player for the hare
    #[arg(long, value_enum, default_value = "random")]
    pub hare: PlayerKind,

    /// Number of games to play [default: 100, or the config file's value]
    #[arg(long)]
    pub games: Option<usize>,

    /// AI search depth [default: 5] (ignored with --config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Use goal distance and hound cohesion in evaluation (ignored with --config)
    #[arg(long)]
    pub rich: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

const DEFAULT_GAMES: usize = 100;

/// Result of a single game
#[derive(Clone, Debug)]
struct GameSummary {
    game_number: usize,
    outcome: Outcome,
    plies: usize,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    hounds_name: String,
    hare_name: String,
    games: Vec<GameSummary>,
    tally: MatchTally,
    by_reason: FxHashMap<WinReason, usize>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the players (flags or config file)
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = resolve_config(&args, seed)?;

    tracing::info!(
        "Starting match: {:?} vs {:?} ({} games)",
        config.hounds,
        config.hare,
        config.games
    );

    let results = play_match(&config, !args.json);

    report_results(&results, args.json);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Build the match config from the file if given, the flags otherwise.
/// An explicit `--games` or `--seed` wins over the file.
fn resolve_config(args: &MatchArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            if args.depth.is_some() || args.rich {
                tracing::warn!(
                    "--depth and --rich are ignored: players come from {}",
                    path.display()
                );
            }
            MatchConfig::load(path)?
        }
        None => {
            if args.hounds == PlayerKind::Human || args.hare == PlayerKind::Human {
                anyhow::bail!("human players cannot take part in a match; use `hounds play`");
            }
            let depth = args.depth.unwrap_or(DEFAULT_DEPTH);
            MatchConfig {
                hounds: args.hounds.to_spec(depth, args.rich),
                hare: args.hare.to_spec(depth, args.rich),
                games: DEFAULT_GAMES,
                seed: None,
            }
        }
    };

    if let Some(games) = args.games {
        config.games = games;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    Ok(config)
}

/// Play all games in parallel
fn play_match(config: &MatchConfig, show_progress: bool) -> MatchResults {
    let seeds = game_seeds(config.seed, config.games);

    let progress = if show_progress {
        create_progress_bar(config.games as u64)
    } else {
        ProgressBar::hidden()
    };

    let games: Vec<GameSummary> = seeds
        .par_iter()
        .enumerate()
        .map(|(i, &game_seed)| {
            let summary = play_single_game(config, i + 1, game_seed);
            progress.inc(1);
            summary
        })
        .collect();

    progress.finish_and_clear();

    for game in &games {
        tracing::debug!(
            "Game {}: {} ({} plies)",
            game.game_number,
            game.outcome,
            game.plies
        );
    }

    let (tally, by_reason) = compute_match_statistics(&games);

    MatchResults {
        hounds_name: config.hounds.name(),
        hare_name: config.hare.name(),
        games,
        tally,
        by_reason,
    }
}

/// Report match results
fn report_results(results: &MatchResults, json: bool) {
    if json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game with freshly built strategies
fn play_single_game(config: &MatchConfig, game_number: usize, game_seed: u64) -> GameSummary {
    let mut hounds = config.hounds.build(Some(game_seed));
    let mut hare = config.hare.build(Some(game_seed.wrapping_add(1)));

    let record = play_game(hounds.as_mut(), hare.as_mut());

    GameSummary {
        game_number,
        outcome: record.outcome,
        plies: record.plies(),
    }
}

/// Tally wins per side and per reason
fn compute_match_statistics(games: &[GameSummary]) -> (MatchTally, FxHashMap<WinReason, usize>) {
    let mut tally = MatchTally::default();
    let mut by_reason: FxHashMap<WinReason, usize> = FxHashMap::default();

    for game in games {
        tally.add(game.outcome, game.plies);
        *by_reason.entry(game.outcome.reason).or_insert(0) += 1;
    }

    (tally, by_reason)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// One seed per game, derived from the match seed or entropy
fn game_seeds(seed: Option<u64>, games: usize) -> Vec<u64> {
    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    (0..games).map(|_| rng.gen()).collect()
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games") {
        bar.set_style(style);
    }
    bar
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Reasons in a fixed order for stable output
const REASONS: [WinReason; 6] = [
    WinReason::ReachedGoal,
    WinReason::SlippedPast,
    WinReason::Stalling,
    WinReason::Trapped,
    WinReason::HoundsBlocked,
    WinReason::Forfeit,
];

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Side,
        reason: WinReason,
        plies: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        hounds: &'a str,
        hare: &'a str,
        #[serde(flatten)]
        tally: &'a MatchTally,
        avg_plies: f32,
        hounds_win_rate: f32,
        by_reason: Vec<(WinReason, usize)>,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        hounds: &results.hounds_name,
        hare: &results.hare_name,
        tally: &results.tally,
        avg_plies: results.tally.avg_plies(),
        hounds_win_rate: results.tally.win_rate(Side::Hounds),
        by_reason: REASONS
            .iter()
            .filter_map(|r| results.by_reason.get(r).map(|&n| (*r, n)))
            .collect(),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.outcome.winner,
                reason: g.outcome.reason,
                plies: g.plies,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let tally = &results.tally;
    let total = tally.games;

    println!("\n=== Match Results ===");
    println!("Hounds: {}", results.hounds_name);
    println!("Hare:   {}", results.hare_name);
    println!("Total games: {}", total);
    println!(
        "Hounds wins: {} ({:.1}%)",
        tally.hounds_wins,
        percent(tally.hounds_wins, total)
    );
    println!(
        "Hare wins:   {} ({:.1}%)",
        tally.hare_wins,
        percent(tally.hare_wins, total)
    );
    println!("Avg plies:   {:.1}", tally.avg_plies());

    println!("\nBy reason:");
    for reason in REASONS {
        if let Some(&n) = results.by_reason.get(&reason) {
            println!("  {:<30} {}", reason.to_string(), n);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hounds_core::PlayerSpec;

    fn summary(game_number: usize, winner: Side, reason: WinReason, plies: usize) -> GameSummary {
        GameSummary {
            game_number,
            outcome: Outcome::new(winner, reason),
            plies,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let (tally, by_reason) = compute_match_statistics(&[]);
        assert_eq!(tally, MatchTally::default());
        assert!(by_reason.is_empty());
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            summary(1, Side::Hounds, WinReason::Trapped, 10),
            summary(2, Side::Hare, WinReason::SlippedPast, 20),
            summary(3, Side::Hounds, WinReason::Trapped, 30),
            summary(4, Side::Hare, WinReason::Forfeit, 0),
        ];

        let (tally, by_reason) = compute_match_statistics(&games);
        assert_eq!(tally.hounds_wins, 2);
        assert_eq!(tally.hare_wins, 2);
        assert_eq!(tally.forfeits, 1);
        assert_eq!(tally.avg_plies(), 15.0);
        assert_eq!(by_reason.get(&WinReason::Trapped), Some(&2));
        assert_eq!(by_reason.get(&WinReason::Stalling), None);
    }

    fn args(config: Option<PathBuf>, games: Option<usize>) -> MatchArgs {
        MatchArgs {
            config,
            hounds: PlayerKind::Search,
            hare: PlayerKind::Random,
            games,
            depth: None,
            rich: false,
            json: false,
        }
    }

    #[test]
    fn test_resolve_config_from_flags() {
        let config = resolve_config(&args(None, None), Some(8)).unwrap();
        assert_eq!(config.games, DEFAULT_GAMES);
        assert_eq!(config.seed, Some(8));
        assert_eq!(
            config.hounds,
            PlayerSpec::Search { depth: DEFAULT_DEPTH, heuristics: Default::default() }
        );

        let mut human = args(None, None);
        human.hare = PlayerKind::Human;
        assert!(resolve_config(&human, None).is_err());
    }

    #[test]
    fn test_resolve_config_from_file() {
        let path = std::env::temp_dir().join(format!("hounds_match_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{ "hounds": { "kind": "first" }, "hare": { "kind": "random" }, "games": 7, "seed": 1 }"#,
        )
        .unwrap();

        let from_file = resolve_config(&args(Some(path.clone()), None), None).unwrap();
        assert_eq!(from_file.hounds, PlayerSpec::First);
        assert_eq!(from_file.games, 7);
        assert_eq!(from_file.seed, Some(1));

        let mut overridden = args(Some(path.clone()), Some(3));
        overridden.depth = Some(9);
        let config = resolve_config(&overridden, Some(4)).unwrap();
        assert_eq!(config.games, 3);
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.hounds, PlayerSpec::First);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_game_seeds_deterministic() {
        assert_eq!(game_seeds(Some(42), 5), game_seeds(Some(42), 5));
        assert_ne!(game_seeds(Some(42), 5), game_seeds(Some(43), 5));
    }

    #[test]
    fn test_match_is_reproducible() {
        let config = MatchConfig {
            hounds: PlayerSpec::Random { seed: None },
            hare: PlayerSpec::Random { seed: None },
            games: 8,
            seed: Some(3),
        };
        let a = play_match(&config, false);
        let b = play_match(&config, false);
        assert_eq!(a.tally, b.tally);
        assert_eq!(a.tally.games, 8);
        assert_eq!(a.hounds_name, "random");
        let reasons: Vec<_> = a.games.iter().map(|g| g.outcome).collect();
        let again: Vec<_> = b.games.iter().map(|g| g.outcome).collect();
        assert_eq!(reasons, again);
    }
}
