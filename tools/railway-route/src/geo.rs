///! Geographic primitives: coordinates and initial bearings

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for Coord {
    /// `[lat, lon]`, the order used by graph documents
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

/// Great-circle initial bearing from `from` to `to` in radians.
///
/// 0 = north, clockwise, normalized to `[0, 2π)`. Identical points give 0.
pub fn initial_bearing(from: Coord, to: Coord) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let bearing = y.atan2(x).rem_euclid(TAU);

    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if bearing >= TAU {
        0.0
    } else {
        bearing
    }
}
