use super::{Point2d, Vector2d};
use cgmath::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cubic bezier curve over `t` in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CubicBezier2d {
    points: [Point2d; 4],
}

impl CubicBezier2d {
    pub const fn new(points: &[Point2d; 4]) -> Self {
        Self { points: *points }
    }

    /// A straight line with uniform speed.
    pub fn line(start: Point2d, end: Point2d) -> Self {
        let s = start.to_vec();
        let e = end.to_vec();
        let ps = [s, s.lerp(e, 1. / 3.), s.lerp(e, 2. / 3.), e];
        Self {
            points: ps.map(Point2d::from_vec),
        }
    }

    pub fn points(&self) -> &[Point2d; 4] {
        &self.points
    }

    /// Splits the curve at `t` using de Casteljau's algorithm.
    pub fn subdivide(&self, t: f64) -> [CubicBezier2d; 2] {
        let [p00, p01, p02, p03] = self.points.map(|x| x.to_vec());
        let p10 = p00.lerp(p01, t);
        let p11 = p01.lerp(p02, t);
        let p12 = p02.lerp(p03, t);
        let p20 = p10.lerp(p11, t);
        let p21 = p11.lerp(p12, t);
        let p30 = p20.lerp(p21, t);
        let curves = [[p00, p10, p20, p30], [p30, p21, p12, p03]];
        curves.map(|p| CubicBezier2d {
            points: p.map(Point2d::from_vec),
        })
    }

    /// The part of the curve between `t0` and `t1`, reparameterized over `[0, 1]`.
    /// If `t1 < t0` the segment runs backwards.
    pub fn segment(&self, t0: f64, t1: f64) -> CubicBezier2d {
        if t1 < t0 {
            return self.segment(t1, t0).reversed();
        }
        let [head, _] = self.subdivide(t1);
        if t1 == 0.0 {
            return head;
        }
        let [_, segment] = head.subdivide(t0 / t1);
        segment
    }

    /// The same curve, traversed from end to start.
    pub fn reversed(mut self) -> Self {
        self.points.reverse();
        self
    }

    pub fn sample(&self, t: f64) -> Point2d {
        let t1 = 1.0 - t;
        Point2d::from_vec(
            t1 * t1 * t1 * self.points[0].to_vec()
                + 3.0 * t1 * t1 * t * self.points[1].to_vec()
                + 3.0 * t1 * t * t * self.points[2].to_vec()
                + t * t * t * self.points[3].to_vec(),
        )
    }

    /// Samples a derivative of the curve with respect to `t`.
    /// An `order` of zero is the position itself.
    pub fn derivative(&self, t: f64, order: usize) -> Vector2d {
        let [p0, p1, p2, p3] = self.points.map(|x| x.to_vec());
        let t1 = 1.0 - t;
        match order {
            0 => self.sample(t).to_vec(),
            1 => {
                (-3.0 * t1 * t1) * p0
                    + (9.0 * t * t - 12.0 * t + 3.0) * p1
                    + (-9.0 * t * t + 6.0 * t) * p2
                    + (3.0 * t * t) * p3
            }
            2 => 6.0 * t1 * (p2 - 2.0 * p1 + p0) + 6.0 * t * (p3 - 2.0 * p2 + p1),
            3 => 6.0 * (p3 - 3.0 * p2 + 3.0 * p1 - p0),
            _ => Vector2d::new(0.0, 0.0),
        }
    }
}
