use smallvec::smallvec;

use super::{share, Path, PathBase, PathPtr};
use crate::constraint::ConstraintSet;
use crate::error::Result;
use crate::math::CubicBezier2d;
use crate::{Configuration, Interval};

/// A planar path following a cubic bezier curve.
///
/// The curve's own parameter `[0, 1]` is mapped affinely onto the
/// parameter range of the path.
#[derive(Clone, Debug)]
pub struct BezierPath {
    base: PathBase,
    curve: CubicBezier2d,
}

impl BezierPath {
    pub fn new(curve: CubicBezier2d, range: Interval<f64>) -> Self {
        Self {
            base: PathBase::new(range, 2, 2),
            curve,
        }
    }

    /// Creates a constrained bezier path. The constraints are copied.
    pub fn with_constraints(
        curve: CubicBezier2d,
        range: Interval<f64>,
        constraints: &dyn ConstraintSet,
    ) -> Self {
        Self {
            base: PathBase::with_constraints(range, 2, 2, Some(constraints)),
            curve,
        }
    }

    /// Creates a shared bezier path.
    pub fn create(curve: CubicBezier2d, range: Interval<f64>) -> PathPtr {
        share(Box::new(Self::new(curve, range)))
    }

    pub fn curve(&self) -> &CubicBezier2d {
        &self.curve
    }

    /// Maps a path parameter onto the curve parameter.
    fn local(&self, param: f64) -> f64 {
        let range = self.base.param_range();
        if range.length() == 0.0 {
            0.0
        } else {
            range.inv_lerp(param)
        }
    }
}

impl Path for BezierPath {
    fn base(&self) -> &PathBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PathBase {
        &mut self.base
    }

    fn copy(&self) -> Box<dyn Path> {
        Box::new(self.clone())
    }

    fn impl_compute(&self, param: f64) -> Configuration {
        let p = self.curve.sample(self.local(param));
        smallvec![p.x, p.y]
    }

    fn impl_derivative(&self, param: f64, order: usize) -> Configuration {
        if order == 0 {
            return self.impl_compute(param);
        }
        let length = self.base.param_range().length();
        if length == 0.0 {
            return smallvec![0.0, 0.0];
        }
        let v = self.curve.derivative(self.local(param), order) * length.powi(-(order as i32));
        smallvec![v.x, v.y]
    }

    /// Extracts an exact sub-curve rather than a view.
    fn impl_extract(&self, param_interval: Interval<f64>) -> Result<Box<dyn Path>> {
        let param_interval = self.base.fit_interval(param_interval)?;
        if param_interval == self.base.param_range() {
            return Ok(self.copy());
        }
        let local = param_interval.map(|param| self.local(param));
        Ok(Box::new(Self {
            base: PathBase::with_constraints(param_interval, 2, 2, self.base.constraints()),
            curve: self.curve.segment(local.start, local.end),
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point2d;
    use assert_approx_eq::assert_approx_eq;

    fn curve() -> CubicBezier2d {
        CubicBezier2d::new(&[
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 4.0),
            Point2d::new(5.0, 4.0),
            Point2d::new(6.0, 0.0),
        ])
    }

    fn assert_config(a: &[f64], b: &[f64]) {
        assert_approx_eq!(a[0], b[0], 1e-9);
        assert_approx_eq!(a[1], b[1], 1e-9);
    }

    #[test]
    fn parameter_range_is_affine() {
        let path = BezierPath::new(curve(), Interval::new(10.0, 12.0));
        assert_config(&path.initial(), &[0.0, 0.0]);
        assert_config(&path.end(), &[6.0, 0.0]);
        assert_config(&path.configuration_at(11.0), &[3.0, 3.0]);
        let dq = path.derivative(10.0, 1);
        assert_config(&dq, &[1.5, 6.0]);
    }

    #[test]
    fn extraction_builds_sub_curve() {
        let path = BezierPath::create(curve(), Interval::new(0.0, 4.0));
        let sub = path.extract(Interval::new(1.0, 3.0)).unwrap();
        assert!(format!("{:?}", sub).starts_with("BezierPath"));
        assert_eq!(sub.param_range(), Interval::new(1.0, 3.0));
        for param in [1.0, 1.7, 2.5, 3.0] {
            assert_config(&sub.configuration_at(param), &path.configuration_at(param));
            assert_config(&sub.derivative(param, 1), &path.derivative(param, 1));
        }
    }

    #[test]
    fn reversal_flips_control_points() {
        let path = BezierPath::create(curve(), Interval::new(0.0, 4.0));
        let reversed = path.reverse().unwrap();
        assert_eq!(reversed.param_range(), Interval::new(4.0, 0.0));
        assert_config(&reversed.initial(), &path.end());
        assert_config(&reversed.end(), &path.initial());
        assert_config(&reversed.configuration_at(1.0), &path.configuration_at(1.0));
    }

    #[test]
    fn exact_range_is_a_copy() {
        let path = BezierPath::create(curve(), Interval::new(0.0, 4.0));
        let copy = path.extract(Interval::new(0.0, 4.0)).unwrap();
        assert_eq!(copy.param_range(), path.param_range());
        assert_config(&copy.configuration_at(2.0), &path.configuration_at(2.0));
    }
}
