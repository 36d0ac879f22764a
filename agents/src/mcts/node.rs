//! MCTS tree nodes.
//!
//! Nodes live in the [`crate::transposition::TranspositionCache`] arena and
//! refer to each other by [`NodeId`].

use chess_core::Color;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A position together with whose turn it is and how it was reached.
#[derive(Debug, Clone)]
pub struct GameState<P, M> {
    pub position: P,
    pub color_to_move: Color,
    /// The move that produced this position from its parent. `None` for a root.
    pub originating_move: Option<M>,
}

/// A node of the search tree.
///
/// `children` and `unexpanded_moves` always partition the legal moves of
/// `state.position`. `wins` never exceeds `simulations`.
#[derive(Debug, Clone)]
pub struct SearchNode<P, M> {
    pub state: GameState<P, M>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub unexpanded_moves: Vec<M>,
    pub wins: f64,
    pub simulations: u32,
    /// Game over at this position. Terminal nodes never get children.
    pub terminal: bool,
}

impl<P, M> SearchNode<P, M> {
    pub fn new(
        state: GameState<P, M>,
        parent: Option<NodeId>,
        legal_moves: Vec<M>,
        terminal: bool,
    ) -> Self {
        let unexpanded_moves = if terminal { Vec::new() } else { legal_moves };
        Self {
            state,
            parent,
            children: Vec::new(),
            unexpanded_moves,
            wins: 0.0,
            simulations: 0,
            terminal,
        }
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.unexpanded_moves.is_empty()
    }

    /// The player whose move led here. Playout wins are credited to them.
    #[inline]
    pub fn mover(&self) -> Color {
        self.state.color_to_move.opponent()
    }

    /// Fraction of playouts through this node won by its mover.
    pub fn win_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.wins / f64::from(self.simulations)
        }
    }

    /// UCB1: `wins/n + c * sqrt(ln(N)/n)`, infinite while unvisited.
    #[inline]
    pub fn ucb1(&self, parent_simulations: u32, exploration_constant: f64) -> f64 {
        if self.simulations == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(self.simulations);
        let ln_parent = f64::from(parent_simulations).ln();
        self.wins / n + exploration_constant * (ln_parent / n).sqrt()
    }
}
