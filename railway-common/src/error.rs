//! Error types for railway graph post-processing
//!
//! Every variant aborts the turn restriction pass.

use thiserror::Error;

use crate::{EdgeId, NodeId};

#[derive(Error, Debug)]
pub enum Error {
    /// Edge geometry cannot yield a direction of travel
    #[error("edge {edge} has {points} geometry point(s), at least 2 are required")]
    InvalidGeometry { edge: EdgeId, points: usize },

    /// Polyline does not start or end at the edge's endpoint node
    #[error("edge {edge} geometry does not touch its endpoint node {node}")]
    GeometryEndpointMismatch { edge: EdgeId, node: NodeId },

    /// Node id outside the graph
    #[error("node {node} is out of range (graph has {n_nodes} nodes)")]
    NodeOutOfRange { node: NodeId, n_nodes: u32 },

    /// Edge id outside the graph
    #[error("edge {edge} is out of range (graph has {n_edges} edges)")]
    EdgeOutOfRange { edge: EdgeId, n_edges: u32 },

    /// Adjacency lists an edge at a node it does not touch
    #[error("edge {edge} is not incident to node {node}")]
    EdgeNotIncident { edge: EdgeId, node: NodeId },

    /// Crossing set references a node the graph does not have
    #[error("crossing set references node {node}, graph has {n_nodes} nodes")]
    CrossingOutOfRange { node: NodeId, n_nodes: u32 },

    /// Requested profile is neither custom nor built-in
    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    /// Same profile requested or configured twice
    #[error("profile '{0}' is defined more than once")]
    DuplicateProfile(String),

    /// Invalid configuration or parameters
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for railway post-processing operations
pub type Result<T> = std::result::Result<T, Error>;
