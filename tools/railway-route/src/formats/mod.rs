///! Binary file formats for derived routing artifacts

pub mod crc;
pub mod turn_costs;

pub use turn_costs::{TurnCostFile, TurnCostHeader, TurnCostRecord};
