//! Geometry-derived turn restrictions for railway junctions
//!
//! One pass over a finished graph. For every live node with at least two
//! incident edges, each unordered pair of legs is classified by the angle
//! between their leaving bearings; forbidden pairs get an infinite turn cost
//! in both directions for every profile that stores turn costs.
//!
//! The pass must run after topology is final and before the graph is handed
//! to routing. It is not resumable: the table cannot tell "not evaluated" from
//! "allowed", so a failed run means the whole import is discarded.

use railway_common::{NodeId, Result};
use tracing::{debug, info, warn};

use crate::crossings::CrossingSet;
use crate::graph::RailGraph;
use crate::profile::Profile;

pub mod policy;
pub mod processor;
pub mod table;

pub use policy::{bearing_difference, classify, JunctionKind, TurnDecision};
pub use processor::{leaving_bearing, leg, unordered_pairs, CostWriter, Leg};
pub use table::{TurnCostKey, TurnCostStore, TurnCostTable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnPassStats {
    /// Live nodes inspected
    pub nodes_visited: u64,
    pub nodes_removed: u64,
    /// Live nodes with two or more incident edges
    pub junctions: u64,
    /// Junctions that are level crossings
    pub crossings: u64,
    pub pairs_evaluated: u64,
    pub pairs_forbidden: u64,
    pub entries_written: u64,
}

/// Run the turn restriction pass.
///
/// Nodes are visited in ascending id. Any inconsistency aborts the pass.
pub fn apply_geometric_restrictions<S: TurnCostStore>(
    graph: &RailGraph,
    crossings: &CrossingSet,
    profiles: &[Profile],
    store: &mut S,
) -> Result<TurnPassStats> {
    crossings.validate(graph)?;

    let mut writer = CostWriter::new(profiles, store);
    if writer.dimension_count() == 0 {
        warn!(
            profiles = profiles.len(),
            "no profile supports turn costs, junction restrictions will not be stored"
        );
    }

    info!(
        nodes = graph.n_nodes(),
        edges = graph.n_edges(),
        crossings = crossings.len(),
        dimensions = writer.dimension_count(),
        "applying junction turn restrictions"
    );

    let mut stats = TurnPassStats::default();

    for node in 0..graph.n_nodes() {
        if graph.is_removed(node)? {
            stats.nodes_removed += 1;
            continue;
        }
        stats.nodes_visited += 1;

        let is_crossing = crossings.contains(node);
        restrict_junction(graph, node, is_crossing, &mut writer, &mut stats)?;
    }

    info!(
        junctions = stats.junctions,
        crossings = stats.crossings,
        pairs = stats.pairs_evaluated,
        forbidden = stats.pairs_forbidden,
        entries = stats.entries_written,
        "junction turn restrictions applied"
    );

    Ok(stats)
}

fn restrict_junction<S: TurnCostStore>(
    graph: &RailGraph,
    node: NodeId,
    is_crossing: bool,
    writer: &mut CostWriter<'_, S>,
    stats: &mut TurnPassStats,
) -> Result<()> {
    let incident = graph.incident_edges(node)?;
    if incident.len() < 2 {
        return Ok(());
    }

    stats.junctions += 1;
    if is_crossing {
        stats.crossings += 1;
    }

    let legs = incident
        .into_iter()
        .map(|inc| leg(graph, node, inc))
        .collect::<Result<Vec<Leg>>>()?;

    let kind = JunctionKind::from_crossing_flag(is_crossing);
    for (from, to) in unordered_pairs(&legs) {
        stats.pairs_evaluated += 1;

        let diff = bearing_difference(from.bearing, to.bearing);
        if classify(kind, diff) == TurnDecision::Forbidden {
            debug!(
                node,
                from_edge = from.edge,
                to_edge = to.edge,
                from_node = from.adj_node,
                to_node = to.adj_node,
                angle_deg = diff.to_degrees(),
                ?kind,
                "forbidden movement"
            );
            stats.pairs_forbidden += 1;
            stats.entries_written += writer.forbid(from.edge, node, to.edge) as u64;
        }
    }

    Ok(())
}
