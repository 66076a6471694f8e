//! Common identifiers and errors shared by the railway routing tools

pub mod error;

pub use error::{Error, Result};

/// Dense node identifier inside a finished routable graph
pub type NodeId = u32;

/// Dense edge identifier inside a finished routable graph
pub type EdgeId = u32;

#[cfg(test)]
mod tests {
    use crate::error::Error;

    #[test]
    fn crossing_out_of_range_reports_node_and_bound() {
        let err = Error::CrossingOutOfRange { node: 42, n_nodes: 10 };
        let msg = err.to_string();
        assert!(msg.contains("42"), "message should name the node: {msg}");
        assert!(msg.contains("10"), "message should name the bound: {msg}");
    }
}
