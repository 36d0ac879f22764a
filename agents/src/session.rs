//! The play session and move selector.
//!
//! A [`Session`] holds everything that outlives a single search: the rules
//! engine, the MCTS transposition cache and the random generator. Callers
//! pick a [`Strategy`] per move.

use crate::{
    error::SearchError,
    mcts::{MctsAgent, MctsConfig},
    minimax::MinimaxAgent,
    oracle::{Oracle, StandardChess},
    random::RandomAgent,
    search::AlphaBetaAgent,
    transposition::TranspositionCache,
    Agent,
};
use chess_core::Color;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Available move-search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Minimax,
    AlphaBeta,
    Mcts,
    Random,
}

impl Strategy {
    /// Builds the agent for this strategy.
    pub fn agent<O: Oracle>(self, config: &SelectConfig) -> Box<dyn Agent<O>> {
        match self {
            Strategy::Minimax => Box::new(MinimaxAgent::new(config.depth)),
            Strategy::AlphaBeta => Box::new(AlphaBetaAgent::new(config.depth)),
            Strategy::Mcts => Box::new(MctsAgent::new(config.mcts())),
            Strategy::Random => Box::new(RandomAgent::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Minimax => "minimax",
            Strategy::AlphaBeta => "alphabeta",
            Strategy::Mcts => "mcts",
            Strategy::Random => "random",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected minimax, alphabeta, mcts or random)")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "alphabeta" | "alpha-beta" => Ok(Strategy::AlphaBeta),
            "mcts" => Ok(Strategy::Mcts),
            "random" => Ok(Strategy::Random),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Per-call search settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectConfig {
    /// Ply depth for minimax and alpha-beta.
    pub depth: u8,
    /// MCTS wall-clock budget.
    pub timeout: Duration,
    /// MCTS UCB1 constant.
    pub exploration_constant: f64,
    pub max_iterations: Option<u32>,
    pub rollout_ply_limit: Option<u32>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            timeout: Duration::from_secs(1),
            exploration_constant: SQRT_2,
            max_iterations: None,
            rollout_ply_limit: None,
        }
    }
}

impl SelectConfig {
    pub fn mcts(&self) -> MctsConfig {
        MctsConfig {
            exploration_constant: self.exploration_constant,
            timeout: self.timeout,
            max_iterations: self.max_iterations,
            rollout_ply_limit: self.rollout_ply_limit,
        }
    }
}

/// The value or statistics behind a chosen move.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostics {
    /// Minimax and alpha-beta: backed-up evaluation and positions visited.
    Score { value: f64, nodes: u64 },
    /// MCTS: the chosen child's statistics.
    Visits {
        wins: f64,
        simulations: u32,
        root_simulations: u32,
        iterations: u32,
    },
    Random { candidates: usize },
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostics::Score { value, nodes } => {
                write!(f, "score {value:+.1} ({nodes} nodes)")
            }
            Diagnostics::Visits {
                wins,
                simulations,
                root_simulations,
                iterations,
            } => write!(
                f,
                "{wins:.1}/{simulations} wins ({root_simulations} root simulations, {iterations} iterations)"
            ),
            Diagnostics::Random { candidates } => write!(f, "random pick of {candidates}"),
        }
    }
}

/// A chosen move and why it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<M> {
    pub mv: M,
    pub diagnostics: Diagnostics,
}

/// State shared by every search in one game.
pub struct Session<O: Oracle> {
    oracle: O,
    cache: TranspositionCache<O::Position, O::Move>,
    rng: ChaCha20Rng,
}

impl Session<StandardChess> {
    /// A standard chess session.
    pub fn standard(seed: u64) -> Self {
        Session::new(StandardChess, seed)
    }
}

impl<O: Oracle> Session<O> {
    pub fn new(oracle: O, seed: u64) -> Self {
        Self {
            oracle,
            cache: TranspositionCache::new(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Bounds the cache: an MCTS search starting with more than `capacity`
    /// nodes cached clears it first.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = TranspositionCache::with_capacity(capacity);
        self
    }

    /// Chooses a move for `color`. `Ok(None)` means the game is over.
    pub fn select_move(
        &mut self,
        position: &O::Position,
        color: Color,
        strategy: Strategy,
        config: &SelectConfig,
    ) -> Result<Option<Selection<O::Move>>, SearchError> {
        let mut agent = strategy.agent::<O>(config);
        debug!(agent = agent.name(), %color, "selecting move");
        agent.select(self, position, color)
    }

    /// Forgets all MCTS statistics.
    pub fn reset(&mut self) {
        debug!(nodes = self.cache.len(), "session reset");
        self.cache.clear();
    }

    pub fn cache(&self) -> &TranspositionCache<O::Position, O::Move> {
        &self.cache
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub(crate) fn search_parts(
        &mut self,
    ) -> (
        &O,
        &mut TranspositionCache<O::Position, O::Move>,
        &mut ChaCha20Rng,
    ) {
        (&self.oracle, &mut self.cache, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Position;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("minimax".parse(), Ok(Strategy::Minimax));
        assert_eq!("alpha-beta".parse(), Ok(Strategy::AlphaBeta));
        assert_eq!("AlphaBeta".parse(), Ok(Strategy::AlphaBeta));
        assert_eq!("mcts".parse(), Ok(Strategy::Mcts));
        assert_eq!("random".parse(), Ok(Strategy::Random));
        assert!("negamax".parse::<Strategy>().is_err());

        for strategy in [
            Strategy::Minimax,
            Strategy::AlphaBeta,
            Strategy::Mcts,
            Strategy::Random,
        ] {
            assert_eq!(strategy.to_string().parse(), Ok(strategy));
        }
    }

    #[test]
    fn test_default_config() {
        let config = SelectConfig::default();
        assert_eq!(config.depth, 3);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.mcts(), MctsConfig::default());
    }

    #[test]
    fn test_every_strategy_returns_legal_move() {
        let mut session = Session::standard(9);
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
        let config = SelectConfig {
            depth: 2,
            max_iterations: Some(100),
            rollout_ply_limit: Some(40),
            timeout: Duration::from_secs(30),
            ..SelectConfig::default()
        };
        let legal = position.legal_moves();

        for strategy in [
            Strategy::Minimax,
            Strategy::AlphaBeta,
            Strategy::Mcts,
            Strategy::Random,
        ] {
            let selection = session
                .select_move(&position, Color::White, strategy, &config)
                .unwrap()
                .unwrap();
            assert!(legal.contains(&selection.mv), "{strategy}");
        }
    }

    #[test]
    fn test_game_over_returns_none() {
        let mut session = Session::standard(0);
        let mated = Position::from_fen("R5k1/5ppp/8/8/8/8/5PPP/6K1 b - - 1 1").unwrap();
        let config = SelectConfig::default();

        for strategy in [Strategy::Minimax, Strategy::AlphaBeta, Strategy::Mcts] {
            let selection = session
                .select_move(&mated, Color::Black, strategy, &config)
                .unwrap();
            assert!(selection.is_none());
        }
    }

    #[test]
    fn test_reset_clears_cache() {
        let mut session = Session::standard(1);
        let config = SelectConfig {
            max_iterations: Some(10),
            rollout_ply_limit: Some(20),
            ..SelectConfig::default()
        };

        session
            .select_move(&Position::new(), Color::White, Strategy::Mcts, &config)
            .unwrap();
        assert!(!session.cache().is_empty());

        session.reset();
        assert!(session.cache().is_empty());
    }

    #[test]
    fn test_cache_over_capacity_is_cleared() {
        let mut session = Session::standard(2).with_cache_capacity(5);
        let config = SelectConfig {
            max_iterations: Some(10),
            rollout_ply_limit: Some(20),
            ..SelectConfig::default()
        };
        let position = Position::new();

        session
            .select_move(&position, Color::White, Strategy::Mcts, &config)
            .unwrap();
        // Root plus one child per iteration.
        assert_eq!(session.cache().len(), 11);

        session
            .select_move(&position, Color::White, Strategy::Mcts, &config)
            .unwrap();
        assert_eq!(session.cache().len(), 11);
    }
}
