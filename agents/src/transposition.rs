//! Session-wide position → node cache.
//!
//! The cache owns every MCTS node in one arena. Parent and child links are
//! [`NodeId`]s into that arena, and a serialized-position index lets a later
//! search resume from statistics gathered earlier, whatever path led there.

use crate::mcts::node::{NodeId, SearchNode};
use std::collections::HashMap;

pub struct TranspositionCache<P, M> {
    nodes: Vec<SearchNode<P, M>>,
    index: HashMap<String, NodeId>,
    /// Node count above which the owning session clears the cache.
    capacity: Option<usize>,
}

impl<P, M> TranspositionCache<P, M> {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            capacity: None,
        }
    }

    /// A cache that reports itself over capacity past `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: NodeId) -> &SearchNode<P, M> {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<P, M> {
        &mut self.nodes[id.index()]
    }

    /// Stores a parentless node and indexes it under `key`.
    pub fn insert_root(&mut self, key: String, node: SearchNode<P, M>) -> NodeId {
        let id = self.push(node);
        self.index.insert(key, id);
        id
    }

    /// Stores a new child of `parent`.
    ///
    /// The child is always a fresh node, so the tree stays a tree. It is
    /// indexed under `key` only if no node holds that key yet.
    pub fn add_child(&mut self, parent: NodeId, key: String, node: SearchNode<P, M>) -> NodeId {
        let id = self.push(node);
        self.nodes[parent.index()].children.push(id);
        self.index.entry(key).or_insert(id);
        id
    }

    fn push(&mut self, node: SearchNode<P, M>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct positions indexed.
    pub fn positions(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_over_capacity(&self) -> bool {
        self.capacity.is_some_and(|cap| self.nodes.len() > cap)
    }

    /// Drops every node. Existing `NodeId`s become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }
}

impl<P, M> Default for TranspositionCache<P, M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::node::GameState;
    use chess_core::Color;

    fn node(parent: Option<NodeId>) -> SearchNode<&'static str, u8> {
        SearchNode::new(
            GameState {
                position: "p",
                color_to_move: Color::White,
                originating_move: None,
            },
            parent,
            vec![0, 1],
            false,
        )
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = TranspositionCache::new();
        let root = cache.insert_root("a".to_string(), node(None));

        assert_eq!(cache.lookup("a"), Some(root));
        assert_eq!(cache.lookup("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut cache = TranspositionCache::new();
        let root = cache.insert_root("a".to_string(), node(None));
        let child = cache.add_child(root, "b".to_string(), node(Some(root)));

        assert_eq!(cache.get(root).children, vec![child]);
        assert_eq!(cache.get(child).parent, Some(root));
        assert_eq!(cache.lookup("b"), Some(child));
    }

    #[test]
    fn test_ids_are_arena_indices() {
        let mut cache = TranspositionCache::new();
        let root = cache.insert_root("a".to_string(), node(None));
        let ids: Vec<NodeId> = (0..4)
            .map(|i| cache.add_child(root, format!("c{i}"), node(Some(root))))
            .collect();

        assert_eq!(root.index(), 0);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(id.index(), i + 1);
            assert_eq!(cache.get(*id).parent, Some(root));
        }
    }

    #[test]
    fn test_first_writer_keeps_key() {
        let mut cache = TranspositionCache::new();
        let root = cache.insert_root("a".to_string(), node(None));
        let first = cache.add_child(root, "b".to_string(), node(Some(root)));
        let second = cache.add_child(root, "b".to_string(), node(Some(root)));

        assert_ne!(first, second);
        assert_eq!(cache.lookup("b"), Some(first));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.positions(), 2);
    }

    #[test]
    fn test_capacity_and_clear() {
        let mut cache = TranspositionCache::with_capacity(1);
        let root = cache.insert_root("a".to_string(), node(None));
        assert!(!cache.is_over_capacity());

        cache.add_child(root, "b".to_string(), node(Some(root)));
        assert!(cache.is_over_capacity());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup("a"), None);
        assert_eq!(cache.capacity(), Some(1));
    }
}
