pub mod cli;
pub mod crossings;
pub mod formats;
pub mod geo;
pub mod graph;
pub mod import;
pub mod profile;
pub mod turns;

pub use crossings::CrossingSet;
pub use graph::{Incident, RailEdge, RailGraph, RailNode};
pub use import::{import, GraphDocument, ImportOutput};
pub use profile::{Profile, ProfileConfig, ProfileRegistry, RailwayConfig, TurnCostDimension};
pub use turns::{apply_geometric_restrictions, TurnCostStore, TurnCostTable, TurnPassStats};
