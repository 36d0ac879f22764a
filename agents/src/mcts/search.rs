//! MCTS search loop.
//!
//! Each iteration runs four phases:
//! 1. Selection: descend by UCB1 while nodes are fully expanded
//! 2. Expansion: add one child for a random untried move
//! 3. Simulation: random playout to the end of the game
//! 4. Backpropagation: update statistics up to the search root

use chess_core::Color;
use rand::Rng;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::mcts::config::MctsConfig;
use crate::mcts::node::{GameState, NodeId, SearchNode};
use crate::oracle::Oracle;
use crate::transposition::TranspositionCache;

/// Result of a random playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playout {
    Draw,
    /// The side that delivered checkmate.
    Win(Color),
}

/// Result of an MCTS search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsResult<M> {
    /// Most simulated root child's move. `None` only for a finished game.
    pub best_move: Option<M>,
    /// Statistics of the chosen child.
    pub wins: f64,
    pub simulations: u32,
    /// Root simulations, including those from earlier searches.
    pub root_simulations: u32,
    /// Iterations completed by this search.
    pub iterations: u32,
}

/// One search over a session's cache, rooted at a single position.
pub struct MctsSearch<'a, O: Oracle, R: Rng> {
    oracle: &'a O,
    cache: &'a mut TranspositionCache<O::Position, O::Move>,
    rng: &'a mut R,
    config: MctsConfig,
    root: NodeId,
}

impl<'a, O: Oracle, R: Rng> MctsSearch<'a, O, R> {
    /// Roots the search at `position`, reusing its cached node if there is one.
    pub fn new(
        oracle: &'a O,
        cache: &'a mut TranspositionCache<O::Position, O::Move>,
        rng: &'a mut R,
        config: MctsConfig,
        position: &O::Position,
    ) -> Self {
        let key = oracle.serialize(position);
        let root = match cache.lookup(&key) {
            Some(id) => {
                trace!(node = id.0, "MCTS root found in cache");
                id
            }
            None => {
                let node = new_node(oracle, position.clone(), None, None);
                cache.insert_root(key, node)
            }
        };

        Self {
            oracle,
            cache,
            rng,
            config,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Runs until the configured timeout elapses.
    pub fn run(&mut self) -> Result<MctsResult<O::Move>, SearchError> {
        let deadline = Instant::now() + self.config.timeout;
        self.run_until(deadline)
    }

    /// Runs whole iterations while `Instant::now() < deadline`, stopping early
    /// at `max_iterations`. The deadline is only checked between iterations.
    pub fn run_until(&mut self, deadline: Instant) -> Result<MctsResult<O::Move>, SearchError> {
        let root = self.cache.get(self.root);
        if root.terminal {
            return Ok(MctsResult {
                best_move: None,
                wins: 0.0,
                simulations: 0,
                root_simulations: root.simulations,
                iterations: 0,
            });
        }

        let mut iterations = 0u32;
        while Instant::now() < deadline
            && self.config.max_iterations.map_or(true, |max| iterations < max)
        {
            self.iterate()?;
            iterations += 1;
        }

        let root = self.cache.get(self.root);
        let best = self
            .best_child()
            .ok_or(SearchError::InsufficientSearch { iterations })?;
        let best = self.cache.get(best);

        debug!(
            iterations,
            root_simulations = root.simulations,
            children = root.children.len(),
            cache_nodes = self.cache.len(),
            best_simulations = best.simulations,
            best_win_rate = best.win_rate(),
            "MCTS search finished"
        );

        Ok(MctsResult {
            best_move: best.state.originating_move,
            wins: best.wins,
            simulations: best.simulations,
            root_simulations: root.simulations,
            iterations,
        })
    }

    /// One select → expand → simulate → backpropagate cycle.
    pub fn iterate(&mut self) -> Result<(), SearchError> {
        let selected = self.select();
        let leaf = self.expand(selected)?;
        let outcome = self.simulate(leaf)?;
        self.backpropagate(leaf, outcome);

        trace!(
            selected = selected.0,
            leaf = leaf.0,
            ?outcome,
            "MCTS iteration complete"
        );
        Ok(())
    }

    /// Descends from the root through fully expanded, non-terminal nodes.
    fn select(&self) -> NodeId {
        let mut current = self.root;

        loop {
            let node = self.cache.get(current);
            if node.terminal || !node.is_fully_expanded() {
                return current;
            }
            match self.best_ucb_child(current) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Highest UCB1 child. Ties go to the earliest child.
    fn best_ucb_child(&self, id: NodeId) -> Option<NodeId> {
        let node = self.cache.get(id);
        let mut best: Option<(NodeId, f64)> = None;

        for &child in &node.children {
            let score = self
                .cache
                .get(child)
                .ucb1(node.simulations, self.config.exploration_constant);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }

        best.map(|(child, _)| child)
    }

    /// Adds a child for one random untried move and returns it. A terminal or
    /// exhausted node is returned unchanged.
    fn expand(&mut self, id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.cache.get(id);
        if node.terminal || node.unexpanded_moves.is_empty() {
            return Ok(id);
        }

        let choice = self.rng.gen_range(0..node.unexpanded_moves.len());
        let mv = node.unexpanded_moves[choice];
        let position = self.oracle.apply_move(&node.state.position, mv)?;

        self.cache.get_mut(id).unexpanded_moves.swap_remove(choice);

        let key = self.oracle.serialize(&position);
        let child = new_node(self.oracle, position, Some(id), Some(mv));
        Ok(self.cache.add_child(id, key, child))
    }

    /// Plays uniformly random moves from `id`'s position until the game ends
    /// or the rollout ply limit is reached.
    fn simulate(&mut self, id: NodeId) -> Result<Playout, SearchError> {
        let mut position = self.cache.get(id).state.position.clone();
        let mut plies = 0u32;

        loop {
            let moves = self.oracle.legal_moves(&position);
            if moves.is_empty() {
                break;
            }
            if self.config.rollout_ply_limit.is_some_and(|limit| plies >= limit) {
                return Ok(Playout::Draw);
            }

            let mv = moves[self.rng.gen_range(0..moves.len())];
            position = self.oracle.apply_move(&position, mv)?;
            plies += 1;
        }

        if self.oracle.is_checkmate(&position) {
            // The side to move is the one mated.
            Ok(Playout::Win(self.oracle.turn_color(&position).opponent()))
        } else {
            Ok(Playout::Draw)
        }
    }

    /// Credits the playout to every node from `id` up to the search root.
    ///
    /// Stops at the root even if it has a parent from an earlier search.
    fn backpropagate(&mut self, id: NodeId, outcome: Playout) {
        let mut current = Some(id);

        while let Some(node_id) = current {
            let node = self.cache.get_mut(node_id);
            node.simulations += 1;
            match outcome {
                Playout::Draw => node.wins += 0.5,
                Playout::Win(winner) if winner == node.mover() => node.wins += 1.0,
                Playout::Win(_) => {}
            }

            if node_id == self.root {
                break;
            }
            current = node.parent;
        }
    }

    /// Root child with the most simulations, first on ties.
    fn best_child(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;

        for &child in &self.cache.get(self.root).children {
            let simulations = self.cache.get(child).simulations;
            if best.map_or(true, |(_, most)| simulations > most) {
                best = Some((child, simulations));
            }
        }

        best.map(|(child, _)| child)
    }
}

fn new_node<O: Oracle>(
    oracle: &O,
    position: O::Position,
    parent: Option<NodeId>,
    originating_move: Option<O::Move>,
) -> SearchNode<O::Position, O::Move> {
    let terminal = oracle.is_game_over(&position);
    let legal_moves = if terminal {
        Vec::new()
    } else {
        oracle.legal_moves(&position)
    };
    let color_to_move = oracle.turn_color(&position);

    SearchNode::new(
        GameState {
            position,
            color_to_move,
            originating_move,
        },
        parent,
        legal_moves,
        terminal,
    )
}
