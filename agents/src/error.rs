use chess_core::RulesError;
use thiserror::Error;

/// Errors that end a single search call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The rules engine rejected a move or a position.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// MCTS ran out of budget before the root gained a single child.
    #[error("MCTS root was never expanded after {iterations} iterations; retry with a larger budget")]
    InsufficientSearch { iterations: u32 },
}
