///! Per-junction building blocks: leaving bearings, incident pairs, cost writes

use railway_common::{EdgeId, Error, NodeId, Result};

use crate::geo::{initial_bearing, Coord};
use crate::graph::{Incident, RailGraph};
use crate::profile::{Profile, TurnCostDimension};

use super::table::{TurnCostKey, TurnCostStore};

/// One track leaving a junction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub edge: EdgeId,
    pub adj_node: NodeId,
    /// Radians, `[0, 2π)`
    pub bearing: f64,
}

/// Bearing of travel from `origin` to the second vertex of an oriented polyline.
///
/// Later vertices are ignored: the local tangent at the junction.
pub fn leaving_bearing(edge: EdgeId, origin: Coord, geometry: &[Coord]) -> Result<f64> {
    match geometry {
        [_, second, ..] => Ok(initial_bearing(origin, *second)),
        _ => Err(Error::InvalidGeometry {
            edge,
            points: geometry.len(),
        }),
    }
}

/// Bearing leaving `node` along an incident edge.
///
/// Fails if the adjacency entry disagrees with the edge's endpoints.
pub fn leg(graph: &RailGraph, node: NodeId, incident: Incident) -> Result<Leg> {
    let edge = graph.edge(incident.edge)?;
    let far = if edge.u == node {
        edge.v
    } else if edge.v == node {
        edge.u
    } else {
        return Err(Error::EdgeNotIncident {
            edge: incident.edge,
            node,
        });
    };
    if far != incident.adj_node {
        return Err(Error::EdgeNotIncident {
            edge: incident.edge,
            node: incident.adj_node,
        });
    }

    let origin = graph.node(node)?.coord;
    let geometry = graph.oriented_geometry(incident.edge, node)?;
    Ok(Leg {
        edge: incident.edge,
        adj_node: incident.adj_node,
        bearing: leaving_bearing(incident.edge, origin, &geometry)?,
    })
}

/// Every unordered pair `(items[i], items[j])` with `i < j`, in index order
pub fn unordered_pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, &a)| items[i + 1..].iter().map(move |&b| (a, b)))
}

/// Writes symmetric infinite costs for every turn-cost capable profile
pub struct CostWriter<'a, S: TurnCostStore> {
    dimensions: Vec<TurnCostDimension>,
    store: &'a mut S,
}

impl<'a, S: TurnCostStore> CostWriter<'a, S> {
    pub fn new(profiles: &[Profile], store: &'a mut S) -> Self {
        Self {
            dimensions: profiles
                .iter()
                .filter_map(Profile::turn_cost_dimension)
                .collect(),
            store,
        }
    }

    /// Number of dimensions that receive writes
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    /// Forbid `from → to` and `to → from` via `via`; returns entries written
    pub fn forbid(&mut self, from_edge: EdgeId, via_node: NodeId, to_edge: EdgeId) -> usize {
        for &dim in &self.dimensions {
            let key = TurnCostKey::new(dim, from_edge, via_node, to_edge);
            for k in [key, key.reversed()] {
                self.store
                    .set(k.dimension, k.from_edge, k.via_node, k.to_edge, f64::INFINITY);
            }
        }
        self.dimensions.len() * 2
    }
}
