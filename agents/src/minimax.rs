use crate::{
    error::SearchError,
    evaluation::evaluate,
    oracle::Oracle,
    search::SearchResult,
    session::{Diagnostics, Selection, Session},
    Agent,
};
use chess_core::Color;
use tracing::debug;

/// Exhaustive fixed-depth search. No pruning, so this is the reference value
/// for [`crate::search::alpha_beta`].
///
/// Ties keep the first move in oracle order.
pub fn minimax<O: Oracle>(
    oracle: &O,
    position: &O::Position,
    perspective: Color,
    maximizing: bool,
    depth: u8,
) -> Result<SearchResult<O::Move>, SearchError> {
    if depth == 0 {
        return Ok(SearchResult::leaf(evaluate(oracle, position, perspective)));
    }

    // Empty iff the game is over.
    let moves = oracle.legal_moves(position);
    if moves.is_empty() {
        return Ok(SearchResult::leaf(evaluate(oracle, position, perspective)));
    }

    let mut best = SearchResult {
        best_move: None,
        value: if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        },
        nodes: 1,
    };

    for mv in moves {
        let child = oracle.apply_move(position, mv)?;
        let reply = minimax(oracle, &child, perspective, !maximizing, depth - 1)?;
        best.nodes += reply.nodes;

        let improves = if maximizing {
            reply.value > best.value
        } else {
            reply.value < best.value
        };
        if improves {
            best.value = reply.value;
            best.best_move = Some(mv);
        }
    }

    Ok(best)
}

pub struct MinimaxAgent {
    name: String,
    depth: u8,
}

impl MinimaxAgent {
    /// A depth of 0 would never pick a move, so it is raised to 1.
    pub fn new(depth: u8) -> Self {
        let depth = depth.max(1);
        MinimaxAgent {
            name: format!("Minimax(depth={})", depth),
            depth,
        }
    }
}

impl<O: Oracle> Agent<O> for MinimaxAgent {
    fn select(
        &mut self,
        session: &mut Session<O>,
        position: &O::Position,
        color: Color,
    ) -> Result<Option<Selection<O::Move>>, SearchError> {
        let result = minimax(session.oracle(), position, color, true, self.depth)?;
        debug!(
            depth = self.depth,
            value = result.value,
            nodes = result.nodes,
            "minimax search finished"
        );

        Ok(result.best_move.map(|mv| Selection {
            mv,
            diagnostics: Diagnostics::Score {
                value: result.value,
                nodes: result.nodes,
            },
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
