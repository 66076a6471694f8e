//! Level crossing set
//!
//! Produced once by the import stage and handed to the turn restriction pass
//! as a plain immutable input.

use railway_common::{Error, NodeId, Result};
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

use crate::graph::RailGraph;

pub const CROSSING_KEY: &str = "railway";
pub const CROSSING_VALUE: &str = "railway_crossing";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossingSet {
    nodes: FxHashSet<NodeId>,
}

impl CrossingSet {
    /// Nodes tagged `railway=railway_crossing`
    pub fn from_tagged_nodes<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, &'a BTreeMap<String, String>)>,
    {
        nodes
            .into_iter()
            .filter(|(_, tags)| is_crossing_tagged(tags))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Union of two sets, consuming both
    pub fn merge(mut self, other: CrossingSet) -> Self {
        self.nodes.extend(other.nodes);
        self
    }

    /// Every member must be a node of `graph`
    pub fn validate(&self, graph: &RailGraph) -> Result<()> {
        let n_nodes = graph.n_nodes();
        // Smallest offender, so the error is reproducible
        match self.nodes.iter().copied().filter(|&n| n >= n_nodes).min() {
            Some(node) => Err(Error::CrossingOutOfRange { node, n_nodes }),
            None => Ok(()),
        }
    }

    /// Members in ascending order
    pub fn sorted(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<NodeId> for CrossingSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

pub fn is_crossing_tagged(tags: &BTreeMap<String, String>) -> bool {
    tags.get(CROSSING_KEY).map(String::as_str) == Some(CROSSING_VALUE)
}
