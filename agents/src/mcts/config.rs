//! MCTS configuration parameters.

use std::f64::consts::SQRT_2;
use std::time::Duration;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// UCB1 exploration constant `c`. Higher values favor less-visited children.
    pub exploration_constant: f64,

    /// Wall-clock budget per search.
    pub timeout: Duration,

    /// Optional cap on iterations, checked alongside the deadline.
    pub max_iterations: Option<u32>,

    /// Playouts longer than this many plies are scored as draws.
    /// `None` plays every rollout to the end of the game.
    pub rollout_ply_limit: Option<u32>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: SQRT_2,
            timeout: Duration::from_secs(1),
            max_iterations: None,
            rollout_ply_limit: None,
        }
    }
}

impl MctsConfig {
    /// Create a small, iteration-bounded config for testing.
    pub fn for_testing() -> Self {
        Self {
            exploration_constant: SQRT_2,
            timeout: Duration::from_secs(60),
            max_iterations: Some(200),
            rollout_ply_limit: Some(80),
        }
    }

    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    pub fn with_rollout_ply_limit(mut self, plies: u32) -> Self {
        self.rollout_ply_limit = Some(plies);
        self
    }
}
