//! Cubic-bezier easing

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Reel deceleration: fast start, long soft landing
pub const REEL_DECELERATION: CubicBezier = CubicBezier::new(0.2, 0.0, 0.0, 1.0);

const EPSILON: f64 = 1e-7;

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate at time fraction t (0.0 - 1.0)
    ///
    /// Returns progress in range 0.0 - 1.0 for curves whose y controls lie in [0, 1]
    pub fn evaluate(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_x(t);
        Self::sample(self.y1, self.y2, s)
    }

    // B(s) = 3(1-s)^2 s p1 + 3(1-s) s^2 p2 + s^3
    fn sample(p1: f64, p2: f64, s: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        ((a * s + b) * s + c) * s
    }

    fn slope(p1: f64, p2: f64, s: f64) -> f64 {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (3.0 * a * s + 2.0 * b) * s + c
    }

    /// Parameter s with x(s) == t
    fn solve_x(&self, t: f64) -> f64 {
        // Newton first, bisection if the slope flattens out
        let mut s = t;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, s) - t;
            if err.abs() < EPSILON {
                return s;
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = t;
        for _ in 0..64 {
            let x = Self::sample(self.x1, self.x2, s);
            if (x - t).abs() < EPSILON {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}
