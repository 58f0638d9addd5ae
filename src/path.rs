//! The path abstraction: a trajectory through configuration space over a
//! parameter domain, optionally reparameterized in time and constrained at
//! its endpoints.
//!
//! Paths are handed out as shared [PathPtr] handles. Every path keeps a weak
//! reference to its own handle, so that extracting part of it can produce an
//! [ExtractedPath] view without copying the underlying representation.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use itertools::Itertools;

pub use bezier::BezierPath;
pub use extracted::ExtractedPath;
pub use straight::StraightPath;

use crate::constraint::ConstraintSet;
use crate::error::{Endpoint, ProjectionError, Result};
use crate::time_parameterization::TimeParameterization;
use crate::{Configuration, Interval};

mod bezier;
mod extracted;
mod straight;

/// The step used for finite difference derivatives,
/// as a fraction of the length of the domain.
pub const DERIVATIVE_STEP: f64 = 0.0001;

/// The distance within which the bound of an extracted interval
/// is snapped onto the matching end of the domain.
pub const PARAM_TOLERANCE: f64 = 1e-9;

/// A shared handle to a path.
pub type PathPtr = Arc<dyn Path>;

/// Moves a path into a shared handle and initialises its self-reference.
pub fn share(path: Box<dyn Path>) -> PathPtr {
    let ptr: PathPtr = Arc::from(path);
    ptr.init(Arc::downgrade(&ptr));
    ptr
}

/// The state common to every path.
#[derive(Debug)]
pub struct PathBase {
    /// The intrinsic parameter domain.
    param_range: Interval<f64>,
    /// The externally visible domain.
    time_range: Interval<f64>,
    /// The size of a configuration.
    output_size: usize,
    /// The size of a configuration derivative.
    output_derivative_size: usize,
    /// The constraints the endpoints must satisfy.
    constraints: Option<Box<dyn ConstraintSet>>,
    /// Maps `time_range` onto `param_range`.
    time_param: Option<Box<dyn TimeParameterization>>,
    /// The handle owning this path, set once by [Path::init].
    self_ref: OnceLock<Weak<dyn Path>>,
}

impl PathBase {
    /// Creates the state of an unconstrained path.
    pub fn new(range: Interval<f64>, output_size: usize, output_derivative_size: usize) -> Self {
        Self {
            param_range: range,
            time_range: range,
            output_size,
            output_derivative_size,
            constraints: None,
            time_param: None,
            self_ref: OnceLock::new(),
        }
    }

    /// Creates the state of a path, taking a private copy of `constraints`.
    pub fn with_constraints(
        range: Interval<f64>,
        output_size: usize,
        output_derivative_size: usize,
        constraints: Option<&dyn ConstraintSet>,
    ) -> Self {
        Self {
            constraints: constraints.map(|c| c.copy()),
            ..Self::new(range, output_size, output_derivative_size)
        }
    }

    /// Copies this state, handing the copy an externally supplied constraint set.
    ///
    /// # Panics
    /// If this path already owns constraints.
    pub fn with_external_constraints(&self, constraints: Box<dyn ConstraintSet>) -> Self {
        assert!(
            self.constraints.is_none(),
            "cannot replace the constraints of a constrained path"
        );
        Self {
            constraints: Some(constraints),
            ..self.clone()
        }
    }

    /// Records the handle owning this path.
    ///
    /// # Panics
    /// If the path has already been initialised.
    pub fn init(&self, handle: Weak<dyn Path>) {
        if self.self_ref.set(handle).is_err() {
            panic!("path initialised twice");
        }
    }

    /// Gets a strong handle to this path.
    ///
    /// # Panics
    /// If the path has not been initialised with [Path::init].
    pub fn handle(&self) -> PathPtr {
        self.self_ref
            .get()
            .and_then(Weak::upgrade)
            .expect("path used before being initialised")
    }

    /// Attaches a time parameterization, making `time_range` the visible domain.
    pub fn set_time_parameterization(
        &mut self,
        time_param: Box<dyn TimeParameterization>,
        time_range: Interval<f64>,
    ) {
        self.time_param = Some(time_param);
        self.time_range = time_range;
    }

    /// Removes any time parameterization, so time and parameter coincide again.
    pub fn clear_time_parameterization(&mut self) {
        self.time_param = None;
        self.time_range = self.param_range;
    }

    /// Replaces the constraints of a path which is not yet shared.
    pub fn set_constraints(&mut self, constraints: Option<Box<dyn ConstraintSet>>) {
        self.constraints = constraints;
    }

    /// Checks that `interval` can be extracted from the parameter domain.
    ///
    /// Bounds within [PARAM_TOLERANCE] of an end of the domain are snapped onto it.
    pub fn fit_interval(&self, interval: Interval<f64>) -> Result<Interval<f64>> {
        let domain = self.param_range;
        let fitted = interval.map(|value| {
            domain
                .as_array()
                .into_iter()
                .find(|bound| (value - bound).abs() <= PARAM_TOLERANCE)
                .unwrap_or(value)
        });
        if domain.contains_interval(&fitted) {
            Ok(fitted)
        } else {
            Err(ProjectionError::OutsideDomain {
                requested: interval,
                domain,
            })
        }
    }

    pub fn param_range(&self) -> Interval<f64> {
        self.param_range
    }

    pub fn time_range(&self) -> Interval<f64> {
        self.time_range
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn output_derivative_size(&self) -> usize {
        self.output_derivative_size
    }

    pub fn constraints(&self) -> Option<&dyn ConstraintSet> {
        self.constraints.as_deref()
    }

    pub fn time_parameterization(&self) -> Option<&dyn TimeParameterization> {
        self.time_param.as_deref()
    }
}

impl Clone for PathBase {
    /// Deep-copies the constraints and time parameterization.
    /// The copy is not initialised.
    fn clone(&self) -> Self {
        Self {
            param_range: self.param_range,
            time_range: self.time_range,
            output_size: self.output_size,
            output_derivative_size: self.output_derivative_size,
            constraints: self.constraints.as_ref().map(|c| c.copy()),
            time_param: self.time_param.as_ref().map(|t| t.copy()),
            self_ref: OnceLock::new(),
        }
    }
}

impl fmt::Display for PathBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Interval { start, end } = self.time_range;
        write!(f, "time in [ {}, {} ]", start, end)?;
        if self.time_param.is_some() {
            let Interval { start, end } = self.param_range;
            write!(f, ", param in [ {}, {} ]", start, end)?;
        }
        Ok(())
    }
}

/// A continuous trajectory through configuration space.
///
/// Implementors provide the geometry through [impl_compute](Path::impl_compute)
/// and access to their [PathBase]. Extraction, reversal, time
/// reparameterization and validation are shared by all paths.
pub trait Path: fmt::Debug + Send + Sync {
    /// The state common to every path.
    fn base(&self) -> &PathBase;

    /// Mutable access to the common state, used while a path is not yet shared.
    fn base_mut(&mut self) -> &mut PathBase;

    /// Creates an independent, uninitialised copy of the path.
    fn copy(&self) -> Box<dyn Path>;

    /// Samples the path at the given parameter.
    fn impl_compute(&self, param: f64) -> Configuration;

    /// Samples the derivative of the path with respect to its parameter.
    ///
    /// The default implementation approximates the derivative by sampling
    /// two very nearby points along the path.
    fn impl_derivative(&self, param: f64, order: usize) -> Configuration {
        let lower = |p: f64| match order {
            0 | 1 => self.impl_compute(p),
            _ => self.impl_derivative(p, order - 1),
        };
        if order == 0 {
            return lower(param);
        }
        let range = self.param_range();
        let mut delta = range.length() * DERIVATIVE_STEP;
        if delta == 0.0 {
            delta = DERIVATIVE_STEP;
        }
        if !range.contains(param + delta) {
            delta = -delta;
        }
        scaled_difference(&lower(param + delta), &lower(param), 1.0 / delta)
    }

    /// Extracts the part of the path over a parameter interval.
    ///
    /// Implementations must return a full copy when `param_interval`
    /// is exactly the parameter range. See [default_extract].
    fn impl_extract(&self, param_interval: Interval<f64>) -> Result<Box<dyn Path>> {
        default_extract(self, param_interval)
    }

    /// Copies the path, giving the copy the supplied constraints.
    ///
    /// # Panics
    /// If this path already owns constraints.
    fn copy_with_constraints(&self, constraints: Box<dyn ConstraintSet>) -> Box<dyn Path> {
        let base = self.base().with_external_constraints(constraints);
        let mut path = self.copy();
        *path.base_mut() = base;
        path
    }

    /// Records the handle owning this path. Must be called exactly once,
    /// which [share] does.
    fn init(&self, handle: Weak<dyn Path>) {
        self.base().init(handle)
    }

    /// The configuration at the start of the path.
    fn initial(&self) -> Configuration {
        self.configuration_at(self.time_range().start)
    }

    /// The configuration at the end of the path.
    fn end(&self) -> Configuration {
        self.configuration_at(self.time_range().end)
    }

    fn time_range(&self) -> Interval<f64> {
        self.base().time_range()
    }

    fn param_range(&self) -> Interval<f64> {
        self.base().param_range()
    }

    fn output_size(&self) -> usize {
        self.base().output_size()
    }

    fn output_derivative_size(&self) -> usize {
        self.base().output_derivative_size()
    }

    fn constraints(&self) -> Option<&dyn ConstraintSet> {
        self.base().constraints()
    }

    fn time_parameterization(&self) -> Option<&dyn TimeParameterization> {
        self.base().time_parameterization()
    }

    /// The duration of the path.
    fn length(&self) -> f64 {
        self.time_range().length().abs()
    }

    /// Maps a time onto the path parameter.
    fn param_at(&self, t: f64) -> f64 {
        match self.time_parameterization() {
            Some(time_param) => time_param.value(t),
            None => t,
        }
    }

    /// Samples the path at time `t`, without applying the constraints.
    fn configuration_at(&self, t: f64) -> Configuration {
        self.impl_compute(self.param_at(t))
    }

    /// Samples the path at time `t` and projects the result onto the constraints.
    fn eval(&self, t: f64) -> Result<Configuration> {
        let param = self.param_at(t);
        let mut config = self.impl_compute(param);
        if let Some(constraints) = self.constraints() {
            if !constraints.apply(&mut config) {
                return Err(ProjectionError::Projection {
                    param,
                    reason: format!("could not apply constraints {}", constraints.name()),
                });
            }
        }
        Ok(config)
    }

    /// Samples the derivative of the path with respect to time.
    fn derivative(&self, t: f64, order: usize) -> Configuration {
        let Some(time_param) = self.time_parameterization() else {
            return self.impl_derivative(t, order);
        };
        let param = time_param.value(t);
        match order {
            0 => self.impl_compute(param),
            1 => {
                let ds = time_param.derivative(t, 1);
                self.impl_derivative(param, 1)
                    .iter()
                    .map(|dq| dq * ds)
                    .collect()
            }
            2 => {
                let ds = time_param.derivative(t, 1);
                let dds = time_param.derivative(t, 2);
                let dq = self.impl_derivative(param, 1);
                let ddq = self.impl_derivative(param, 2);
                ddq.iter()
                    .zip_eq(&dq)
                    .map(|(ddq, dq)| ddq * ds * ds + dq * dds)
                    .collect()
            }
            _ => {
                let mut delta = self.time_range().length() * DERIVATIVE_STEP;
                if delta == 0.0 {
                    delta = DERIVATIVE_STEP;
                }
                if !self.time_range().contains(t + delta) {
                    delta = -delta;
                }
                let lower = |t: f64| self.derivative(t, order - 1);
                scaled_difference(&lower(t + delta), &lower(t), 1.0 / delta)
            }
        }
    }

    /// Extracts the part of the path over the given time interval.
    ///
    /// An interval running backwards yields a path that is traversed in reverse.
    fn extract(&self, sub_interval: Interval<f64>) -> Result<PathPtr> {
        log::trace!("extracting {:?} from {}", sub_interval, self.base());
        let path = match self.time_parameterization() {
            Some(time_param) => {
                let param_interval = sub_interval.map(|t| time_param.value(t));
                let mut path = self.impl_extract(param_interval)?;
                path.base_mut()
                    .set_time_parameterization(time_param.copy(), sub_interval);
                path
            }
            None => self.impl_extract(sub_interval)?,
        };
        Ok(share(path))
    }

    /// Returns the path traversed backwards.
    fn reverse(&self) -> Result<PathPtr> {
        self.extract(self.time_range().reversed())
    }

    /// Checks that both ends of the path satisfy its constraints.
    fn check_path(&self) -> Result<()> {
        let Some(constraints) = self.constraints() else {
            return Ok(());
        };
        let check = |endpoint: Endpoint, configuration: Configuration| -> Result<()> {
            if constraints.is_satisfied(&configuration) {
                return Ok(());
            }
            log::error!("{:?}", constraints);
            log::error!("{} configuration: {:?}", endpoint, configuration);
            Err(ProjectionError::EndpointInfeasible {
                endpoint,
                constraints: constraints.name().to_owned(),
                configuration,
            })
        };
        check(Endpoint::Initial, self.initial())?;
        check(Endpoint::End, self.end())
    }
}

impl fmt::Display for dyn Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.base(), f)
    }
}

/// The extraction policy shared by all paths.
///
/// Returns a copy of `path` if `param_interval` is its whole parameter range,
/// and otherwise an [ExtractedPath] view referencing `path`.
///
/// # Panics
/// If `path` has not been initialised.
pub fn default_extract<P: Path + ?Sized>(
    path: &P,
    param_interval: Interval<f64>,
) -> Result<Box<dyn Path>> {
    let param_interval = path.base().fit_interval(param_interval)?;
    if param_interval == path.param_range() {
        return Ok(path.copy());
    }
    Ok(ExtractedPath::create(path.base().handle(), param_interval))
}

/// Computes `(a - b) * scale`.
fn scaled_difference(a: &[f64], b: &[f64], scale: f64) -> Configuration {
    a.iter().zip_eq(b).map(|(a, b)| (a - b) * scale).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constraint::JointBounds;
    use crate::time_parameterization::Linear;
    use assert_approx_eq::assert_approx_eq;

    fn line() -> PathPtr {
        StraightPath::create(&[0.0, 0.0], &[10.0, -5.0], Interval::new(0.0, 10.0))
    }

    #[test]
    fn display_shows_param_range_when_reparameterized() {
        let mut base = PathBase::new(Interval::new(0.0, 10.0), 1, 1);
        assert_eq!(base.to_string(), "time in [ 0, 10 ]");
        base.set_time_parameterization(Box::new(Linear::new(2.0, 0.0)), Interval::new(0.0, 5.0));
        assert_eq!(base.to_string(), "time in [ 0, 5 ], param in [ 0, 10 ]");
        base.clear_time_parameterization();
        assert_eq!(base.time_range(), Interval::new(0.0, 10.0));
    }

    #[test]
    fn fit_interval_snaps_to_domain() {
        let base = PathBase::new(Interval::new(0.0, 10.0), 1, 1);
        let fitted = base
            .fit_interval(Interval::new(10.0 + 1e-12, 2.0))
            .unwrap();
        assert_eq!(fitted, Interval::new(10.0, 2.0));
        assert!(base.fit_interval(Interval::new(-1.0, 2.0)).is_err());
        assert!(base.fit_interval(Interval::new(f64::NAN, 2.0)).is_err());
    }

    #[test]
    fn cloned_base_is_uninitialised() {
        let path = line();
        let copy = path.base().clone();
        assert!(copy.self_ref.get().is_none());
        assert!(Arc::ptr_eq(&path.base().handle(), &path));
    }

    #[test]
    #[should_panic(expected = "initialised twice")]
    fn init_twice_panics() {
        let path = line();
        path.init(Arc::downgrade(&path));
    }

    #[test]
    #[should_panic(expected = "before being initialised")]
    fn extract_before_init_panics() {
        let path = StraightPath::new(&[0.0], &[1.0], Interval::new(0.0, 1.0));
        let _ = path.extract(Interval::new(0.0, 0.5));
    }

    #[test]
    #[should_panic(expected = "constrained path")]
    fn external_constraints_require_unconstrained_source() {
        let bounds = JointBounds::at_least("positive", &[0.0]);
        let path = StraightPath::with_constraints(&[0.0], &[1.0], Interval::new(0.0, 1.0), &bounds);
        let _ = path.copy_with_constraints(bounds.copy());
    }

    #[test]
    fn copy_with_external_constraints() {
        let path = StraightPath::new(&[0.0], &[1.0], Interval::new(0.0, 1.0));
        let copy = path.copy_with_constraints(Box::new(JointBounds::at_least("positive", &[0.0])));
        assert_eq!(copy.constraints().map(|c| c.name()), Some("positive"));
        assert!(path.constraints().is_none());
    }

    /// `q = p^2`, undefined outside its parameter range.
    #[derive(Debug, Clone)]
    struct Parabola(PathBase);

    impl Path for Parabola {
        fn base(&self) -> &PathBase {
            &self.0
        }
        fn base_mut(&mut self) -> &mut PathBase {
            &mut self.0
        }
        fn copy(&self) -> Box<dyn Path> {
            Box::new(self.clone())
        }
        fn impl_compute(&self, param: f64) -> Configuration {
            let q = if self.0.param_range().contains(param) {
                param * param
            } else {
                f64::NAN
            };
            [q].into_iter().collect()
        }
    }

    #[test]
    fn finite_difference_derivative() {
        let path = Parabola(PathBase::new(Interval::new(0.0, 4.0), 1, 1));
        assert_approx_eq!(path.derivative(1.0, 1)[0], 2.0, 1e-2);
        assert_approx_eq!(path.derivative(4.0, 1)[0], 8.0, 1e-2);
        assert_approx_eq!(path.derivative(2.0, 2)[0], 2.0, 1e-2);
    }

    #[test]
    fn high_order_derivative_stays_in_time_range() {
        let mut path = Parabola(PathBase::new(Interval::new(0.0, 4.0), 1, 1));
        path.base_mut()
            .set_time_parameterization(Box::new(Linear::new(1.0, 0.0)), Interval::new(0.0, 4.0));
        for t in [0.0, 2.0, 4.0] {
            let dddq = path.derivative(t, 3)[0];
            assert!(!dddq.is_nan());
            assert_approx_eq!(dddq, 0.0, 1e-2);
        }
    }

    #[test]
    fn derivative_follows_time_law() {
        let mut path = StraightPath::new(&[0.0], &[10.0], Interval::new(0.0, 10.0));
        path.base_mut()
            .set_time_parameterization(Box::new(Linear::new(2.0, 0.0)), Interval::new(0.0, 5.0));
        assert_approx_eq!(path.derivative(1.0, 1)[0], 2.0);
        assert_approx_eq!(path.derivative(1.0, 2)[0], 0.0);
        assert_approx_eq!(path.configuration_at(2.5)[0], 5.0);
        assert_approx_eq!(path.end()[0], 10.0);
    }

    #[test]
    fn eval_projects_onto_constraints() {
        let bounds = JointBounds::new("cap", &[0.0, -1.0], &[5.0, 1.0]);
        let path = StraightPath::with_constraints(
            &[0.0, 0.0],
            &[10.0, -5.0],
            Interval::new(0.0, 10.0),
            &bounds,
        );
        let config = path.eval(8.0).unwrap();
        assert_eq!(config.as_slice(), &[5.0, -1.0]);
        assert_eq!(path.configuration_at(8.0).as_slice(), &[8.0, -4.0]);
    }
}
