//! Segment trie.
//!
//! Each node owns its literal children, at most one parameter child and at
//! most one [`Endpoint`]. Parameter names are not stored on nodes: every
//! `:name` segment at a given depth shares the same parameter child, and the
//! names are recorded on the terminal endpoint instead.

use std::collections::BTreeMap;

use crate::routing::endpoint::Endpoint;

/// One level of the path trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: BTreeMap<String, TrieNode>,
    param_child: Option<Box<TrieNode>>,
    endpoint: Option<Endpoint>,
}

/// Which edge a lookup step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Literal,
    Param,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into the literal child for `segment`, creating it if absent.
    pub fn literal_child_mut(&mut self, segment: &str) -> &mut TrieNode {
        self.children.entry(segment.to_owned()).or_default()
    }

    /// Descend into the parameter child, creating it if absent.
    pub fn param_child_mut(&mut self) -> &mut TrieNode {
        self.param_child.get_or_insert_with(Box::default)
    }

    /// One lookup step: the literal child wins, the parameter child is the
    /// fallback.
    pub fn step(&self, segment: &str) -> Option<(&TrieNode, Edge)> {
        if let Some(child) = self.children.get(segment) {
            return Some((child, Edge::Literal));
        }
        self.param_child
            .as_deref()
            .map(|child| (child, Edge::Param))
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Install `endpoint` at this node, discarding any previous one.
    pub fn set_endpoint(&mut self, endpoint: Endpoint) -> &mut Endpoint {
        self.endpoint.insert(endpoint)
    }

    /// Visit every endpoint below (and including) this node, depth first:
    /// this node, literal children in key order, then the parameter child.
    pub fn visit<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Endpoint),
    {
        if let Some(ep) = &self.endpoint {
            f(ep);
        }
        for child in self.children.values() {
            child.visit(f);
        }
        if let Some(child) = &self.param_child {
            child.visit(f);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(TrieNode::node_count).sum::<usize>()
            + self.param_child.as_ref().map_or(0, |c| c.node_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_beats_param() {
        let mut root = TrieNode::new();
        root.literal_child_mut("me");
        root.param_child_mut();

        let (_, edge) = root.step("me").unwrap();
        assert_eq!(edge, Edge::Literal);

        let (_, edge) = root.step("42").unwrap();
        assert_eq!(edge, Edge::Param);
    }

    #[test]
    fn test_single_param_child() {
        let mut root = TrieNode::new();
        root.param_child_mut().literal_child_mut("a");
        root.param_child_mut().literal_child_mut("b");

        // root + one shared param child + two literals
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn test_step_missing() {
        let mut root = TrieNode::new();
        root.literal_child_mut("a");
        assert!(root.step("b").is_none());
    }

    #[test]
    fn test_set_endpoint_replaces() {
        let mut node = TrieNode::new();
        node.set_endpoint(Endpoint::new(1, "/a", vec![])).set_flag("x", true);
        node.set_endpoint(Endpoint::new(2, "/a", vec![]));

        let ep = node.endpoint().unwrap();
        assert_eq!(ep.id(), 2);
        assert!(!ep.flag("x"));
    }
}
