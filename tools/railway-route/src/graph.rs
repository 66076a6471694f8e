//! Finished railway routing graph
//!
//! Undirected multigraph with per-edge polylines and a CSR adjacency.
//! Topology is frozen once built: the turn restriction pass only reads it.

use railway_common::{EdgeId, Error, NodeId, Result};
use std::borrow::Cow;

use crate::geo::Coord;

/// Largest lat/lon gap, in degrees, between a polyline end and its node
pub const ENDPOINT_TOLERANCE_DEG: f64 = 1e-7;

fn touches(a: Coord, b: Coord) -> bool {
    (a.lat - b.lat).abs() <= ENDPOINT_TOLERANCE_DEG
        && (a.lon - b.lon).abs() <= ENDPOINT_TOLERANCE_DEG
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailNode {
    pub coord: Coord,
    /// Excluded from processing (e.g. dropped by component cleanup)
    pub removed: bool,
    pub osm_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RailEdge {
    pub u: NodeId,
    pub v: NodeId,
    /// Polyline from `u` to `v`, both endpoints included
    pub geometry: Vec<Coord>,
    pub osm_way_id: Option<i64>,
}

/// One entry of a node's adjacency: the edge and the node at its other end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incident {
    pub edge: EdgeId,
    pub adj_node: NodeId,
}

#[derive(Debug, Clone)]
pub struct RailGraph {
    nodes: Vec<RailNode>,
    edges: Vec<RailEdge>,
    offsets: Vec<usize>, // n_nodes + 1
    heads: Vec<NodeId>,
    edge_idx: Vec<EdgeId>,
}

impl RailGraph {
    /// Validate edges against nodes and assemble the adjacency.
    ///
    /// Every polyline must start at `u` and end at `v`. Incident lists keep
    /// edge insertion order. A self-loop is listed once.
    pub fn new(nodes: Vec<RailNode>, edges: Vec<RailEdge>) -> Result<Self> {
        let n_nodes = nodes.len() as u32;

        for (idx, edge) in edges.iter().enumerate() {
            for node in [edge.u, edge.v] {
                if node >= n_nodes {
                    return Err(Error::NodeOutOfRange { node, n_nodes });
                }
            }
            let (first, last) = match edge.geometry.as_slice() {
                [first, .., last] => (*first, *last),
                _ => {
                    return Err(Error::InvalidGeometry {
                        edge: idx as EdgeId,
                        points: edge.geometry.len(),
                    })
                }
            };
            for (end, node) in [(first, edge.u), (last, edge.v)] {
                if !touches(end, nodes[node as usize].coord) {
                    return Err(Error::GeometryEndpointMismatch {
                        edge: idx as EdgeId,
                        node,
                    });
                }
            }
        }

        // Degree count, then prefix sums
        let mut degree = vec![0usize; nodes.len()];
        for edge in &edges {
            degree[edge.u as usize] += 1;
            if edge.v != edge.u {
                degree[edge.v as usize] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }

        let total = offsets[offsets.len() - 1];
        let mut heads = vec![0 as NodeId; total];
        let mut edge_idx = vec![0 as EdgeId; total];
        let mut cursor = offsets[..nodes.len()].to_vec();

        for (idx, edge) in edges.iter().enumerate() {
            let pos = cursor[edge.u as usize];
            heads[pos] = edge.v;
            edge_idx[pos] = idx as EdgeId;
            cursor[edge.u as usize] += 1;

            if edge.v != edge.u {
                let pos = cursor[edge.v as usize];
                heads[pos] = edge.u;
                edge_idx[pos] = idx as EdgeId;
                cursor[edge.v as usize] += 1;
            }
        }

        Ok(Self {
            nodes,
            edges,
            offsets,
            heads,
            edge_idx,
        })
    }

    pub fn n_nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn n_edges(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn node(&self, node: NodeId) -> Result<&RailNode> {
        self.nodes.get(node as usize).ok_or(Error::NodeOutOfRange {
            node,
            n_nodes: self.n_nodes(),
        })
    }

    pub fn edge(&self, edge: EdgeId) -> Result<&RailEdge> {
        self.edges.get(edge as usize).ok_or(Error::EdgeOutOfRange {
            edge,
            n_edges: self.n_edges(),
        })
    }

    pub fn is_removed(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.removed)
    }

    /// Owned snapshot of a node's adjacency
    pub fn incident_edges(&self, node: NodeId) -> Result<Vec<Incident>> {
        self.node(node)?;
        let start = self.offsets[node as usize];
        let end = self.offsets[node as usize + 1];

        Ok(self.heads[start..end]
            .iter()
            .zip(&self.edge_idx[start..end])
            .map(|(&adj_node, &edge)| Incident { edge, adj_node })
            .collect())
    }

    /// Edge polyline oriented so that index 0 lies at `from`
    pub fn oriented_geometry(&self, edge: EdgeId, from: NodeId) -> Result<Cow<'_, [Coord]>> {
        let e = self.edge(edge)?;
        if e.u == from {
            Ok(Cow::Borrowed(&e.geometry))
        } else if e.v == from {
            Ok(Cow::Owned(e.geometry.iter().rev().copied().collect()))
        } else {
            Err(Error::EdgeNotIncident { edge, node: from })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(lat: f64, lon: f64) -> RailNode {
        RailNode {
            coord: Coord::new(lat, lon),
            removed: false,
            osm_id: None,
        }
    }

    fn straight(graph_nodes: &[RailNode], u: NodeId, v: NodeId) -> RailEdge {
        RailEdge {
            u,
            v,
            geometry: vec![graph_nodes[u as usize].coord, graph_nodes[v as usize].coord],
            osm_way_id: None,
        }
    }

    #[test]
    fn test_csr_adjacency() {
        let nodes = vec![node(0.0, 0.0), node(0.0, 0.01), node(0.01, 0.0)];
        let edges = vec![straight(&nodes, 0, 1), straight(&nodes, 0, 2), straight(&nodes, 1, 0)];
        let graph = RailGraph::new(nodes, edges).unwrap();

        let inc = graph.incident_edges(0).unwrap();
        assert_eq!(
            inc,
            vec![
                Incident { edge: 0, adj_node: 1 },
                Incident { edge: 1, adj_node: 2 },
                Incident { edge: 2, adj_node: 1 },
            ]
        );
        assert_eq!(graph.incident_edges(2).unwrap(), vec![Incident { edge: 1, adj_node: 0 }]);
    }

    #[test]
    fn test_self_loop_listed_once() {
        let nodes = vec![node(0.0, 0.0), node(0.0, 0.01)];
        let loop_edge = RailEdge {
            u: 0,
            v: 0,
            geometry: vec![
                Coord::new(0.0, 0.0),
                Coord::new(0.001, 0.001),
                Coord::new(0.0, 0.0),
            ],
            osm_way_id: None,
        };
        let graph = RailGraph::new(nodes.clone(), vec![loop_edge, straight(&nodes, 0, 1)]).unwrap();
        assert_eq!(graph.incident_edges(0).unwrap().len(), 2);
    }

    #[test]
    fn test_oriented_geometry() {
        let nodes = vec![node(0.0, 0.0), node(0.0, 0.02)];
        let edge = RailEdge {
            u: 0,
            v: 1,
            geometry: vec![Coord::new(0.0, 0.0), Coord::new(0.005, 0.01), Coord::new(0.0, 0.02)],
            osm_way_id: Some(7),
        };
        let graph = RailGraph::new(nodes, vec![edge]).unwrap();

        let fwd = graph.oriented_geometry(0, 0).unwrap();
        assert_eq!(fwd[0], Coord::new(0.0, 0.0));

        let rev = graph.oriented_geometry(0, 1).unwrap();
        assert_eq!(rev[0], Coord::new(0.0, 0.02));
        assert_eq!(rev[1], Coord::new(0.005, 0.01));
    }

    #[test]
    fn test_rejects_bad_edges() {
        let nodes = vec![node(0.0, 0.0), node(0.0, 0.01)];

        let dangling = RailEdge {
            u: 0,
            v: 5,
            geometry: vec![Coord::new(0.0, 0.0), Coord::new(0.0, 0.01)],
            osm_way_id: None,
        };
        assert!(matches!(
            RailGraph::new(nodes.clone(), vec![dangling]),
            Err(Error::NodeOutOfRange { node: 5, n_nodes: 2 })
        ));

        let degenerate = RailEdge {
            u: 0,
            v: 1,
            geometry: vec![Coord::new(0.0, 0.0)],
            osm_way_id: None,
        };
        assert!(matches!(
            RailGraph::new(nodes, vec![degenerate]),
            Err(Error::InvalidGeometry { edge: 0, points: 1 })
        ));
    }

    #[test]
    fn test_rejects_geometry_off_its_nodes() {
        let nodes = vec![node(0.0, 0.0), node(-0.001, 0.0)];

        // starts at a stray point instead of node 0
        let stray_start = RailEdge {
            u: 0,
            v: 1,
            geometry: vec![Coord::new(-0.002, 0.001), Coord::new(-0.001, 0.0)],
            osm_way_id: None,
        };
        assert!(matches!(
            RailGraph::new(nodes.clone(), vec![stray_start]),
            Err(Error::GeometryEndpointMismatch { edge: 0, node: 0 })
        ));

        let stray_end = RailEdge {
            u: 0,
            v: 1,
            geometry: vec![Coord::new(0.0, 0.0), Coord::new(-0.0011, 0.0)],
            osm_way_id: None,
        };
        assert!(matches!(
            RailGraph::new(nodes.clone(), vec![straight(&nodes, 0, 1), stray_end]),
            Err(Error::GeometryEndpointMismatch { edge: 1, node: 1 })
        ));

        // sub-centimetre noise is accepted
        let noisy = RailEdge {
            u: 0,
            v: 1,
            geometry: vec![Coord::new(0.0, 5e-8), Coord::new(-0.001, 0.0)],
            osm_way_id: None,
        };
        assert!(RailGraph::new(nodes, vec![noisy]).is_ok());
    }

    #[test]
    fn test_geometry_from_unrelated_node() {
        let nodes = vec![node(0.0, 0.0), node(0.0, 0.01), node(0.01, 0.0)];
        let edges = vec![straight(&nodes, 0, 1)];
        let graph = RailGraph::new(nodes, edges).unwrap();

        assert!(matches!(
            graph.oriented_geometry(0, 2),
            Err(Error::EdgeNotIncident { edge: 0, node: 2 })
        ));
        assert!(matches!(graph.incident_edges(9), Err(Error::NodeOutOfRange { .. })));
    }
}
