use itertools::Itertools;
use smallvec::smallvec;

use super::{share, Path, PathBase, PathPtr};
use crate::constraint::ConstraintSet;
use crate::{Configuration, Interval};

/// A path interpolating linearly between two configurations.
#[derive(Clone, Debug)]
pub struct StraightPath {
    base: PathBase,
    initial: Configuration,
    end: Configuration,
}

impl StraightPath {
    /// Creates a straight path from `initial` to `end` over the given parameter range.
    ///
    /// # Panics
    /// If the configurations have different sizes.
    pub fn new(initial: &[f64], end: &[f64], range: Interval<f64>) -> Self {
        Self::build(initial, end, range, None)
    }

    /// Creates a constrained straight path. The constraints are copied.
    pub fn with_constraints(
        initial: &[f64],
        end: &[f64],
        range: Interval<f64>,
        constraints: &dyn ConstraintSet,
    ) -> Self {
        Self::build(initial, end, range, Some(constraints))
    }

    /// Creates a shared straight path.
    pub fn create(initial: &[f64], end: &[f64], range: Interval<f64>) -> PathPtr {
        share(Box::new(Self::new(initial, end, range)))
    }

    /// Creates a shared, constrained straight path.
    pub fn create_with_constraints(
        initial: &[f64],
        end: &[f64],
        range: Interval<f64>,
        constraints: &dyn ConstraintSet,
    ) -> PathPtr {
        share(Box::new(Self::with_constraints(
            initial,
            end,
            range,
            constraints,
        )))
    }

    fn build(
        initial: &[f64],
        end: &[f64],
        range: Interval<f64>,
        constraints: Option<&dyn ConstraintSet>,
    ) -> Self {
        assert_eq!(
            initial.len(),
            end.len(),
            "ends of a straight path must have the same size"
        );
        let size = initial.len();
        Self {
            base: PathBase::with_constraints(range, size, size, constraints),
            initial: initial.into(),
            end: end.into(),
        }
    }
}

impl Path for StraightPath {
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
        let range = self.base.param_range();
        if range.length() == 0.0 {
            return self.initial.clone();
        }
        let u = range.inv_lerp(param);
        self.initial
            .iter()
            .zip_eq(&self.end)
            .map(|(a, b)| (1.0 - u) * a + u * b)
            .collect()
    }

    fn impl_derivative(&self, param: f64, order: usize) -> Configuration {
        let length = self.base.param_range().length();
        match order {
            0 => self.impl_compute(param),
            1 if length != 0.0 => self
                .initial
                .iter()
                .zip_eq(&self.end)
                .map(|(a, b)| (b - a) / length)
                .collect(),
            _ => smallvec![0.0; self.initial.len()],
        }
    }
}
