//! Move selection for chess: minimax, alpha-beta and MCTS over a material
//! evaluator, driven through a [`Session`].

pub mod error;
pub mod evaluation;
pub mod mcts;
pub mod minimax;
pub mod oracle;
pub mod random;
pub mod search;
pub mod session;
pub mod transposition;

use chess_core::Color;

/// Core trait for move-choosing agents
pub trait Agent<O: Oracle> {
    /// Chooses a move for `color` at `position`, or `None` if the game is over.
    fn select(
        &mut self,
        session: &mut Session<O>,
        position: &O::Position,
        color: Color,
    ) -> Result<Option<Selection<O::Move>>, SearchError>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use error::SearchError;
pub use evaluation::{evaluate, material_score, piece_value, WIN_SCORE};
pub use mcts::{MctsAgent, MctsConfig, MctsResult, MctsSearch, NodeId, Playout, SearchNode};
pub use minimax::{minimax, MinimaxAgent};
pub use oracle::{Oracle, StandardChess};
pub use random::RandomAgent;
pub use search::{alpha_beta, order_moves, AlphaBetaAgent, SearchResult};
pub use session::{Diagnostics, ParseStrategyError, SelectConfig, Selection, Session, Strategy};
pub use transposition::TranspositionCache;
