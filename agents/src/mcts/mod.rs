//! Monte Carlo Tree Search with random playouts.
//!
//! Statistics live in the session's [`crate::transposition::TranspositionCache`],
//! so consecutive searches in one game keep building on the same tree.

pub mod config;
pub mod node;
pub mod search;

pub use config::MctsConfig;
pub use node::{GameState, NodeId, SearchNode};
pub use search::{MctsResult, MctsSearch, Playout};

use crate::{
    error::SearchError,
    oracle::Oracle,
    session::{Diagnostics, Selection, Session},
    Agent,
};
use chess_core::Color;
use tracing::debug;

pub struct MctsAgent {
    name: String,
    config: MctsConfig,
}

impl MctsAgent {
    pub fn new(config: MctsConfig) -> Self {
        MctsAgent {
            name: format!("MCTS(timeout={}ms)", config.timeout.as_millis()),
            config,
        }
    }
}

impl<O: Oracle> Agent<O> for MctsAgent {
    /// Searches for the side to move at `position`. `color` is only logged.
    fn select(
        &mut self,
        session: &mut Session<O>,
        position: &O::Position,
        color: Color,
    ) -> Result<Option<Selection<O::Move>>, SearchError> {
        let (oracle, cache, rng) = session.search_parts();

        if oracle.turn_color(position) != color {
            debug!(%color, "MCTS asked to move for the side not on move");
        }

        if cache.is_over_capacity() {
            debug!(
                nodes = cache.len(),
                capacity = cache.capacity(),
                "transposition cache over capacity, clearing"
            );
            cache.clear();
        }

        let result = MctsSearch::new(oracle, cache, rng, self.config.clone(), position).run()?;

        Ok(result.best_move.map(|mv| Selection {
            mv,
            diagnostics: Diagnostics::Visits {
                wins: result.wins,
                simulations: result.simulations,
                root_simulations: result.root_simulations,
                iterations: result.iterations,
            },
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
