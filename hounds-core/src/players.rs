//! Player strategies
//!
//! Every strategy answers one question: given a position, which move does
//! the side to move make? `None` means the player gives up, which the runner
//! scores as a forfeit.

use std::io::{self, BufRead, Write};

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::SearchPlayer;
use crate::eval::Heuristics;
use crate::game::{GameState, Move};

/// Source of moves for one side of a game
pub trait Strategy {
    fn name(&self) -> &str;

    /// Move for the side to move, or None to forfeit
    fn choose_move(&mut self, state: &GameState) -> Option<Move>;
}

// ============================================================================
// RANDOM
// ============================================================================

/// Uniform choice among legal moves
pub struct RandomStrategy {
    rng: ChaCha8Rng,
}

impl RandomStrategy {
    /// Seeded for reproducible games, from entropy otherwise
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        state.legal_moves(state.turn()).choose(&mut self.rng).copied()
    }
}

// ============================================================================
// FIRST LEGAL
// ============================================================================

/// Always plays the first generated move
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstLegalStrategy;

impl Strategy for FirstLegalStrategy {
    fn name(&self) -> &str {
        "first"
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        state.legal_moves(state.turn()).first().copied()
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Alpha-beta search
pub struct SearchStrategy {
    player: SearchPlayer,
    name: String,
}

impl SearchStrategy {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            player: SearchPlayer::new(depth, heuristics),
            name: Self::label(depth),
        }
    }

    pub(crate) fn label(depth: u32) -> String {
        format!("search(depth={})", depth)
    }
}

impl Strategy for SearchStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        self.player.best_move(state)
    }
}

// ============================================================================
// HUMAN
// ============================================================================

/// Line-oriented input for a human player
pub trait LineSource {
    /// Append one line to `buf`, returning the bytes read (0 at end of input)
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

/// Locks stdin only for the duration of each read, so several human
/// players can share the terminal.
impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

impl<R: io::Read> LineSource for io::BufReader<R> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Text prompt over any line source and writer
pub struct HumanStrategy<R, W> {
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> HumanStrategy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt until a legal move is entered. Ok(None) on end of input or "quit".
    fn prompt(&mut self, state: &GameState) -> io::Result<Option<Move>> {
        let side = state.turn();
        let legal = state.legal_moves(side);

        loop {
            write!(self.output, "{} move (from to, '?' for moves, 'quit'): ", side)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let line = line.trim();
            if line.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }

            if line == "?" {
                let listed: Vec<String> = legal.iter().map(|m| m.to_string()).collect();
                writeln!(self.output, "Legal moves: {}", listed.join(" "))?;
                continue;
            }

            match line.parse::<Move>() {
                Ok(mv) if legal.contains(&mv) => return Ok(Some(mv)),
                Ok(mv) => writeln!(self.output, "{} is not legal here", mv)?,
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }
}

impl HumanStrategy<io::Stdin, io::Stdout> {
    /// Prompt on the terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: LineSource, W: Write> Strategy for HumanStrategy<R, W> {
    fn name(&self) -> &str {
        "human"
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        match self.prompt(state) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::warn!("Input failed, treating as forfeit: {}", e);
                None
            }
        }
    }
}
