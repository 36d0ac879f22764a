use crate::{
    error::SearchError,
    evaluation::evaluate,
    oracle::Oracle,
    session::{Diagnostics, Selection, Session},
    Agent,
};
use chess_core::Color;
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Outcome of a depth-limited search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<M> {
    pub best_move: Option<M>,
    pub value: f64,
    /// Positions visited, including the root.
    pub nodes: u64,
}

impl<M> SearchResult<M> {
    /// A result for a position that is not searched further.
    pub fn leaf(value: f64) -> Self {
        Self {
            best_move: None,
            value,
            nodes: 1,
        }
    }
}

/// Minimax with alpha-beta pruning.
///
/// Children are tried best-first according to the static evaluation, and the
/// root value always equals [`crate::minimax::minimax`]'s for the same inputs.
/// Returns `(move, alpha)` for a maximizing node and `(move, beta)` otherwise.
pub fn alpha_beta<O: Oracle>(
    oracle: &O,
    position: &O::Position,
    perspective: Color,
    maximizing: bool,
    depth: u8,
    mut alpha: f64,
    mut beta: f64,
) -> Result<SearchResult<O::Move>, SearchError> {
    if depth == 0 {
        return Ok(SearchResult::leaf(evaluate(oracle, position, perspective)));
    }

    let moves = oracle.legal_moves(position);
    if moves.is_empty() {
        return Ok(SearchResult::leaf(evaluate(oracle, position, perspective)));
    }

    let children = order_moves(oracle, position, moves, perspective, maximizing)?;

    let mut best_move = None;
    let mut nodes = 1;

    for (mv, child) in &children {
        let reply = alpha_beta(
            oracle,
            child,
            perspective,
            !maximizing,
            depth - 1,
            alpha,
            beta,
        )?;
        nodes += reply.nodes;

        if maximizing {
            if reply.value > alpha {
                alpha = reply.value;
                best_move = Some(*mv);
            }
        } else if reply.value < beta {
            beta = reply.value;
            best_move = Some(*mv);
        }

        if beta <= alpha {
            trace!(depth, alpha, beta, "cutoff");
            break;
        }
    }

    Ok(SearchResult {
        best_move,
        value: if maximizing { alpha } else { beta },
        nodes,
    })
}

/// Applies every move once and sorts the resulting children by static score:
/// best for `perspective` first when maximizing, worst first otherwise.
///
/// The sort is stable, so equal scores keep oracle order.
pub fn order_moves<O: Oracle>(
    oracle: &O,
    position: &O::Position,
    moves: Vec<O::Move>,
    perspective: Color,
    maximizing: bool,
) -> Result<Vec<(O::Move, O::Position)>, SearchError> {
    let mut scored = moves
        .into_iter()
        .map(|mv| {
            let child = oracle.apply_move(position, mv)?;
            let score = evaluate(oracle, &child, perspective);
            Ok((score, mv, child))
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    scored.sort_by(|(a, ..), (b, ..)| {
        let ascending = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        if maximizing {
            ascending.reverse()
        } else {
            ascending
        }
    });

    Ok(scored
        .into_iter()
        .map(|(_, mv, child)| (mv, child))
        .collect())
}

pub struct AlphaBetaAgent {
    name: String,
    depth: u8,
}

impl AlphaBetaAgent {
    /// A depth of 0 would never pick a move, so it is raised to 1.
    pub fn new(depth: u8) -> Self {
        let depth = depth.max(1);
        AlphaBetaAgent {
            name: format!("AlphaBeta(depth={})", depth),
            depth,
        }
    }
}

impl<O: Oracle> Agent<O> for AlphaBetaAgent {
    fn select(
        &mut self,
        session: &mut Session<O>,
        position: &O::Position,
        color: Color,
    ) -> Result<Option<Selection<O::Move>>, SearchError> {
        let result = alpha_beta(
            session.oracle(),
            position,
            color,
            true,
            self.depth,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )?;
        debug!(
            depth = self.depth,
            value = result.value,
            nodes = result.nodes,
            "alpha-beta search finished"
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
