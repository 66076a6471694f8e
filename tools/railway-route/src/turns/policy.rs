///! Turn permission policy for railway junctions
///!
///! Rail vehicles cannot steer. At an ordinary switch a train may continue
///! onto the diverging track, but not reverse and not take a turn sharper than
///! ±45° from straight. At a level crossing only straight-through movement is
///! physically possible, with ±14.4° tolerance for geometry noise.
///!
///! Angles are radians. `angle_diff` is the absolute difference of two
///! leaving bearings in `[0, 2π)`; it is not folded into `[0, π]`, so every
///! band below is symmetric around π.

use std::f64::consts::PI;

/// Crossing: straight-through band
pub const CROSSING_MIN: f64 = 0.92 * PI;
pub const CROSSING_MAX: f64 = 1.08 * PI;

/// Switch: below/above these the movement is a reversal
pub const REVERSAL_BELOW: f64 = 0.3 * PI;
pub const REVERSAL_ABOVE: f64 = 1.7 * PI;

/// Switch: continuation band
pub const SWITCH_MIN: f64 = 0.75 * PI;
pub const SWITCH_MAX: f64 = 1.25 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunctionKind {
    Switch,
    Crossing,
}

impl JunctionKind {
    pub fn from_crossing_flag(is_crossing: bool) -> Self {
        if is_crossing {
            JunctionKind::Crossing
        } else {
            JunctionKind::Switch
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDecision {
    Allowed,
    Forbidden,
}

/// Absolute difference of two bearings, no wraparound
pub fn bearing_difference(a: f64, b: f64) -> f64 {
    (a - b).abs()
}

/// Classify the movement between two legs of a junction.
///
/// Threshold values themselves are allowed.
pub fn classify(kind: JunctionKind, angle_diff: f64) -> TurnDecision {
    match kind {
        JunctionKind::Crossing => {
            if (CROSSING_MIN..=CROSSING_MAX).contains(&angle_diff) {
                TurnDecision::Allowed
            } else {
                TurnDecision::Forbidden
            }
        }
        JunctionKind::Switch => {
            if angle_diff < REVERSAL_BELOW || angle_diff > REVERSAL_ABOVE {
                TurnDecision::Forbidden
            } else if (SWITCH_MIN..=SWITCH_MAX).contains(&angle_diff) {
                TurnDecision::Allowed
            } else {
                TurnDecision::Forbidden
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use JunctionKind::*;
    use TurnDecision::*;

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    /// Sample `[0, 2π)` in 0.5° steps
    fn sweep() -> impl Iterator<Item = f64> {
        (0..720).map(|i| deg(i as f64 * 0.5))
    }

    #[test]
    fn test_crossing_bands() {
        for d in sweep() {
            let expected = if (CROSSING_MIN..=CROSSING_MAX).contains(&d) { Allowed } else { Forbidden };
            assert_eq!(classify(Crossing, d), expected, "crossing at {:.2}°", d.to_degrees());
        }
        assert_eq!(classify(Crossing, deg(165.0)), Forbidden);
        assert_eq!(classify(Crossing, deg(166.0)), Allowed);
        assert_eq!(classify(Crossing, deg(194.0)), Allowed);
        assert_eq!(classify(Crossing, deg(195.0)), Forbidden);
    }

    #[test]
    fn test_switch_bands() {
        for d in sweep() {
            let expected = if d < REVERSAL_BELOW || d > REVERSAL_ABOVE {
                Forbidden
            } else if d >= SWITCH_MIN && d <= SWITCH_MAX {
                Allowed
            } else {
                Forbidden
            };
            assert_eq!(classify(Switch, d), expected, "switch at {:.2}°", d.to_degrees());
        }
        assert_eq!(classify(Switch, 0.0), Forbidden);
        assert_eq!(classify(Switch, deg(90.0)), Forbidden);
        assert_eq!(classify(Switch, deg(135.5)), Allowed);
        assert_eq!(classify(Switch, deg(180.0)), Allowed);
        assert_eq!(classify(Switch, deg(224.5)), Allowed);
        assert_eq!(classify(Switch, deg(300.0)), Forbidden);
        assert_eq!(classify(Switch, deg(359.5)), Forbidden);
    }

    #[test]
    fn test_thresholds_are_allowed() {
        assert_eq!(classify(Crossing, CROSSING_MIN), Allowed);
        assert_eq!(classify(Crossing, CROSSING_MAX), Allowed);
        assert_eq!(classify(Switch, SWITCH_MIN), Allowed);
        assert_eq!(classify(Switch, SWITCH_MAX), Allowed);

        // reversal limits fall in the forbidden diverging band either way
        assert_eq!(classify(Switch, REVERSAL_BELOW), Forbidden);
        assert_eq!(classify(Switch, REVERSAL_ABOVE), Forbidden);
    }

    #[test]
    fn test_symmetric_around_half_turn() {
        // offset keeps samples off the thresholds themselves
        for d in sweep().map(|d| d + deg(0.25)) {
            for kind in [Switch, Crossing] {
                assert_eq!(
                    classify(kind, d),
                    classify(kind, 2.0 * PI - d),
                    "{kind:?} not symmetric at {:.2}°",
                    d.to_degrees()
                );
            }
        }
    }

    #[test]
    fn test_bearing_difference_keeps_full_range() {
        assert!((bearing_difference(deg(350.0), deg(10.0)) - deg(340.0)).abs() < 1e-12);
        assert!((bearing_difference(deg(10.0), deg(350.0)) - deg(340.0)).abs() < 1e-12);
        assert_eq!(JunctionKind::from_crossing_flag(true), Crossing);
        assert_eq!(JunctionKind::from_crossing_flag(false), Switch);
    }
}
