use super::{Path, PathBase, PathPtr};
use crate::error::Result;
use crate::{Configuration, Interval};

/// A view of part of another path.
///
/// The view shares the parameter coordinates of the original path,
/// so its parameter range is the extracted interval itself. When the
/// interval runs backwards, the view traverses the original in reverse.
#[derive(Clone, Debug)]
pub struct ExtractedPath {
    base: PathBase,
    original: PathPtr,
}

impl ExtractedPath {
    /// Creates a view of `original` over `interval`, which must lie within
    /// the original's parameter range.
    pub fn new(original: PathPtr, interval: Interval<f64>) -> Self {
        let base = PathBase::with_constraints(
            interval,
            original.output_size(),
            original.output_derivative_size(),
            original.constraints(),
        );
        Self { base, original }
    }

    /// Creates a boxed view, ready to be [shared](super::share).
    pub fn create(original: PathPtr, interval: Interval<f64>) -> Box<dyn Path> {
        Box::new(Self::new(original, interval))
    }

    /// The path this is a view of.
    pub fn original(&self) -> &PathPtr {
        &self.original
    }
}

impl Path for ExtractedPath {
    fn base(&self) -> &PathBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PathBase {
        &mut self.base
    }

    fn copy(&self) -> Box<dyn Path> {
        Box::new(self.clone())
    }

    #[inline(always)]
    fn impl_compute(&self, param: f64) -> Configuration {
        self.original.impl_compute(param)
    }

    #[inline(always)]
    fn impl_derivative(&self, param: f64, order: usize) -> Configuration {
        self.original.impl_derivative(param, order)
    }

    /// Extracts from the original path directly, so views never nest.
    fn impl_extract(&self, param_interval: Interval<f64>) -> Result<Box<dyn Path>> {
        let param_interval = self.base.fit_interval(param_interval)?;
        if param_interval == self.base.param_range() {
            return Ok(self.copy());
        }
        let mut path = self.original.impl_extract(param_interval)?;
        let base = path.base_mut();
        base.clear_time_parameterization();
        if let Some(constraints) = self.base.constraints() {
            base.set_constraints(Some(constraints.copy()));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::path::StraightPath;
    use crate::time_parameterization::Linear;
    use assert_approx_eq::assert_approx_eq;
    use std::sync::Arc;

    fn assert_config(config: Configuration, expected: &[f64]) {
        assert_eq!(config.len(), expected.len());
        for (q, e) in config.iter().zip(expected) {
            assert_approx_eq!(*q, *e);
        }
    }

    fn line() -> PathPtr {
        StraightPath::create(&[0.0, 0.0], &[10.0, 20.0], Interval::new(0.0, 10.0))
    }

    #[test]
    fn view_samples_original() {
        let path = line();
        let view = ExtractedPath::new(path.clone(), Interval::new(2.0, 6.0));
        for param in [2.0, 3.5, 6.0] {
            assert_eq!(view.impl_compute(param), path.impl_compute(param));
        }
        assert_config(view.initial(), &[2.0, 4.0]);
        assert_config(view.end(), &[6.0, 12.0]);
        assert_approx_eq!(view.derivative(4.0, 1)[1], 2.0);
    }

    #[test]
    fn reversed_view_runs_backwards() {
        let path = line();
        let view = ExtractedPath::new(path, Interval::new(8.0, 1.0));
        assert_config(view.initial(), &[8.0, 16.0]);
        assert_config(view.end(), &[1.0, 2.0]);
        assert_eq!(view.length(), 7.0);
    }

    #[test]
    fn views_do_not_nest() {
        let path = line();
        let view = path.extract(Interval::new(1.0, 9.0)).unwrap();
        let inner = view.extract(Interval::new(2.0, 3.0)).unwrap();
        assert_eq!(inner.param_range(), Interval::new(2.0, 3.0));
        let inner = format!("{:?}", inner);
        assert!(inner.starts_with("ExtractedPath"));
        assert_eq!(Arc::strong_count(&path), 3);
    }

    #[test]
    fn full_range_of_view_is_a_view_copy() {
        let path = line();
        let view = path.extract(Interval::new(1.0, 9.0)).unwrap();
        let copy = view.extract(Interval::new(1.0, 9.0)).unwrap();
        assert!(!Arc::ptr_eq(&view, &copy));
        assert_eq!(copy.param_range(), view.param_range());
    }

    #[test]
    fn delegated_copy_drops_time_parameterization() {
        let mut original = StraightPath::new(&[0.0], &[10.0], Interval::new(0.0, 10.0));
        original
            .base_mut()
            .set_time_parameterization(Box::new(Linear::new(2.0, 0.0)), Interval::new(0.0, 5.0));
        let original = crate::path::share(Box::new(original));

        let view = ExtractedPath::new(original, Interval::new(10.0, 0.0));
        let path = view.impl_extract(Interval::new(0.0, 10.0)).unwrap();
        assert!(path.time_parameterization().is_none());
        assert_eq!(path.time_range(), Interval::new(0.0, 10.0));
    }
}
