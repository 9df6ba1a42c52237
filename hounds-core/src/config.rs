//! Player and match configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::eval::Heuristics;
use crate::players::{FirstLegalStrategy, HumanStrategy, RandomStrategy, SearchStrategy, Strategy};

/// Default alpha-beta depth
pub const DEFAULT_DEPTH: u32 = 5;

/// How one side chooses its moves
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerSpec {
    Search {
        #[serde(default = "default_depth")]
        depth: u32,
        #[serde(default)]
        heuristics: Heuristics,
    },
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    First,
    Human,
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_games() -> usize {
    10
}

impl PlayerSpec {
    /// Build the strategy. A random player without its own seed uses `game_seed`.
    pub fn build(&self, game_seed: Option<u64>) -> Box<dyn Strategy> {
        match self {
            PlayerSpec::Search { depth, heuristics } => {
                Box::new(SearchStrategy::new(*depth, heuristics.clone()))
            }
            PlayerSpec::Random { seed } => Box::new(RandomStrategy::new(seed.or(game_seed))),
            PlayerSpec::First => Box::new(FirstLegalStrategy),
            PlayerSpec::Human => Box::new(HumanStrategy::stdio()),
        }
    }

    /// Label of the strategy `build` would return
    pub fn name(&self) -> String {
        match self {
            PlayerSpec::Search { depth, .. } => SearchStrategy::label(*depth),
            PlayerSpec::Random { .. } => "random".to_string(),
            PlayerSpec::First => "first".to_string(),
            PlayerSpec::Human => "human".to_string(),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, PlayerSpec::Human)
    }
}

/// A series of games between two player specs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub hounds: PlayerSpec,
    pub hare: PlayerSpec,
    #[serde(default = "default_games")]
    pub games: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MatchConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match config: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse match config: {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: MatchConfig = serde_json::from_str(content)?;
        if config.hounds.is_human() || config.hare.is_human() {
            anyhow::bail!("human players cannot take part in a match");
        }
        Ok(config)
    }
}
