//! Explicit piecewise-linear contours.
//!
//! The ascent/descent exercises use fixed staircase trajectories, and each
//! exercise has a second staircase for the user-attempt marker that follows
//! a similar but not identical path. A staircase is a list of ramps; each
//! ramp runs from the previous ramp's end position to its own `until` and
//! interpolates linearly between its two levels (flat when they are equal).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One piece of a staircase: for `x` up to `until`, interpolate `from..to`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub until: f32,
    pub from: f32,
    pub to: f32,
}

const fn ramp(until: f32, from: f32, to: f32) -> Ramp {
    Ramp { until, from, to }
}

const fn flat(until: f32, level: f32) -> Ramp {
    Ramp {
        until,
        from: level,
        to: level,
    }
}

/// A piecewise-linear contour.
///
/// Serialize only: the ramp table borrows from the static catalog, so
/// there is nothing owned to deserialize into.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staircase {
    pub ramps: &'static [Ramp],
    /// Level held past the last ramp.
    pub end_level: f32,
}

impl Staircase {
    pub fn y_at(&self, x: f32) -> f32 {
        let mut start_x = 0.0;
        for ramp in self.ramps {
            if x <= ramp.until {
                if ramp.from == ramp.to || ramp.until == start_x {
                    return ramp.to;
                }
                let progress = (x - start_x) / (ramp.until - start_x);
                return ramp.from + progress * (ramp.to - ramp.from);
            }
            start_x = ramp.until;
        }
        self.end_level
    }
}

/// Descent exercise: top-left to bottom-right, B4 level down to C4 level.
pub const DESCENT: Staircase = Staircase {
    ramps: &[
        flat(100.0, 40.0),
        ramp(150.0, 40.0, 100.0),
        flat(250.0, 100.0),
        ramp(300.0, 100.0, 160.0),
        flat(400.0, 160.0),
        ramp(450.0, 160.0, 220.0),
        flat(550.0, 220.0),
        ramp(600.0, 220.0, 280.0),
    ],
    end_level: 280.0,
};

/// User-attempt path for the descent: starts lower, lands higher.
pub const DESCENT_USER: Staircase = Staircase {
    ramps: &[
        flat(80.0, 60.0),
        ramp(180.0, 60.0, 110.0),
        flat(320.0, 110.0),
        ramp(420.0, 110.0, 180.0),
        flat(520.0, 180.0),
        ramp(620.0, 180.0, 260.0),
    ],
    end_level: 260.0,
};

/// Ascent exercise: the descent mirrored, C4 level up to B4 level.
pub const ASCENT: Staircase = Staircase {
    ramps: &[
        flat(100.0, 280.0),
        ramp(150.0, 280.0, 220.0),
        flat(250.0, 220.0),
        ramp(300.0, 220.0, 160.0),
        flat(400.0, 160.0),
        ramp(450.0, 160.0, 100.0),
        flat(550.0, 100.0),
        ramp(600.0, 100.0, 40.0),
    ],
    end_level: 40.0,
};

/// User-attempt path for the ascent: narrower climb, tops out lower.
pub const ASCENT_USER: Staircase = Staircase {
    ramps: &[
        flat(80.0, 260.0),
        ramp(180.0, 260.0, 210.0),
        flat(320.0, 210.0),
        ramp(420.0, 210.0, 140.0),
        flat(520.0, 140.0),
        ramp(620.0, 140.0, 60.0),
    ],
    end_level: 60.0,
};

/// User-attempt path for the melody exercise: a wave between the E4 and G4
/// levels with its own timing.
pub const MELODY_USER: Staircase = Staircase {
    ramps: &[
        flat(60.0, 260.0),
        ramp(120.0, 260.0, 200.0),
        ramp(180.0, 200.0, 120.0),
        flat(220.0, 120.0),
        ramp(280.0, 120.0, 200.0),
        flat(340.0, 200.0),
        ramp(400.0, 200.0, 120.0),
        flat(440.0, 120.0),
        ramp(500.0, 120.0, 200.0),
        flat(560.0, 200.0),
        ramp(620.0, 200.0, 120.0),
        flat(660.0, 120.0),
        ramp(700.0, 120.0, 200.0),
    ],
    end_level: 200.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descent_matches_known_points() {
        assert_eq!(DESCENT.y_at(0.0), 40.0);
        assert_eq!(DESCENT.y_at(100.0), 40.0);
        assert_eq!(DESCENT.y_at(125.0), 70.0); // midway down the first ramp
        assert_eq!(DESCENT.y_at(200.0), 100.0);
        assert_eq!(DESCENT.y_at(650.0), 280.0);
    }

    #[test]
    fn ascent_mirrors_descent() {
        let mut x = 0.0f32;
        while x <= 700.0 {
            assert!((ASCENT.y_at(x) - (320.0 - DESCENT.y_at(x))).abs() < 1e-4);
            x += 10.0;
        }
    }

    #[test]
    fn ramps_are_continuous() {
        for stairs in [&DESCENT, &DESCENT_USER, &ASCENT, &ASCENT_USER, &MELODY_USER] {
            let mut prev = stairs.y_at(0.0);
            let mut x = 0.5f32;
            while x <= 700.0 {
                let y = stairs.y_at(x);
                assert!(
                    (y - prev).abs() < 3.0,
                    "discontinuity at x={x}: {prev} -> {y}"
                );
                prev = y;
                x += 0.5;
            }
        }
    }
}
