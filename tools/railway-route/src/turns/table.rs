//! Turn-cost storage
//!
//! Sparse map from (dimension, from edge, via node, to edge) to a cost.
//! An absent key means the movement is free; `f64::INFINITY` forbids it.

use railway_common::{EdgeId, NodeId};
use std::collections::{BTreeMap, BTreeSet};

use crate::profile::TurnCostDimension;

/// Sort order is (dimension, via, from, to), the on-disk record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnCostKey {
    pub dimension: TurnCostDimension,
    pub via_node: NodeId,
    pub from_edge: EdgeId,
    pub to_edge: EdgeId,
}

impl TurnCostKey {
    pub fn new(
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
    ) -> Self {
        Self {
            dimension,
            via_node,
            from_edge,
            to_edge,
        }
    }

    /// Same movement traversed the other way
    pub fn reversed(self) -> Self {
        Self {
            from_edge: self.to_edge,
            to_edge: self.from_edge,
            ..self
        }
    }
}

/// Write/read access to a graph's turn-cost table
pub trait TurnCostStore {
    fn set(
        &mut self,
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
        cost: f64,
    );

    /// 0.0 when no entry exists
    fn get(
        &self,
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
    ) -> f64;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnCostTable {
    entries: BTreeMap<TurnCostKey, f64>,
}

impl TurnCostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_forbidden(
        &self,
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
    ) -> bool {
        self.get(dimension, from_edge, via_node, to_edge) == f64::INFINITY
    }

    pub fn entries(&self) -> impl Iterator<Item = (TurnCostKey, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn entries_for(
        &self,
        dimension: TurnCostDimension,
    ) -> impl Iterator<Item = (TurnCostKey, f64)> + '_ {
        self.entries()
            .filter(move |(key, _)| key.dimension == dimension)
    }

    /// Dimensions that hold at least one entry
    pub fn dimensions(&self) -> BTreeSet<TurnCostDimension> {
        self.entries.keys().map(|k| k.dimension).collect()
    }
}

impl TurnCostStore for TurnCostTable {
    fn set(
        &mut self,
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
        cost: f64,
    ) {
        let key = TurnCostKey::new(dimension, from_edge, via_node, to_edge);
        self.entries.insert(key, cost);
    }

    fn get(
        &self,
        dimension: TurnCostDimension,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
    ) -> f64 {
        let key = TurnCostKey::new(dimension, from_edge, via_node, to_edge);
        self.entries.get(&key).copied().unwrap_or(0.0)
    }
}
