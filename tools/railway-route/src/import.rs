//! Graph document import
//!
//! Turns a JSON graph document into a finished [`RailGraph`] plus the
//! [`CrossingSet`] derived from node tags. Both are returned to the caller;
//! nothing is registered globally.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use railway_common::NodeId;

use crate::crossings::CrossingSet;
use crate::geo::Coord;
use crate::graph::{RailEdge, RailGraph, RailNode};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<i64>,
    #[serde(default)]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: NodeId,
    pub v: NodeId,
    /// `[lat, lon]` pairs from `u` to `v`; straight segment when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osm_way_id: Option<i64>,
}

pub struct ImportOutput {
    pub graph: RailGraph,
    pub crossings: CrossingSet,
}

impl GraphDocument {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse graph document {}", path.as_ref().display()))
    }
}

/// Build the graph and its crossing set from a document
pub fn import(doc: GraphDocument) -> railway_common::Result<ImportOutput> {
    let n_nodes = doc.nodes.len() as u32;

    let crossings = CrossingSet::from_tagged_nodes(
        doc.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.removed)
            .map(|(id, n)| (id as NodeId, &n.tags)),
    );

    let nodes: Vec<RailNode> = doc
        .nodes
        .iter()
        .map(|n| RailNode {
            coord: Coord::new(n.lat, n.lon),
            removed: n.removed,
            osm_id: n.osm_id,
        })
        .collect();

    let mut edges = Vec::with_capacity(doc.edges.len());
    for rec in doc.edges {
        let geometry = match rec.geometry {
            Some(points) => points.into_iter().map(Coord::from).collect(),
            None => {
                let endpoint = |id: NodeId| {
                    nodes
                        .get(id as usize)
                        .map(|n| n.coord)
                        .ok_or(railway_common::Error::NodeOutOfRange { node: id, n_nodes })
                };
                vec![endpoint(rec.u)?, endpoint(rec.v)?]
            }
        };
        edges.push(RailEdge {
            u: rec.u,
            v: rec.v,
            geometry,
            osm_way_id: rec.osm_way_id,
        });
    }

    let graph = RailGraph::new(nodes, edges)?;
    Ok(ImportOutput { graph, crossings })
}

/// Read a JSON list of node ids
pub fn load_crossing_ids<P: AsRef<Path>>(path: P) -> Result<CrossingSet> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
    let ids: Vec<NodeId> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse crossing ids {}", path.as_ref().display()))?;
    Ok(ids.into_iter().collect())
}
