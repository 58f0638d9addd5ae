//! Predicates over configurations used to validate paths.

use std::fmt::Debug;

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Configuration;

/// A set of constraints that configurations of a path must satisfy.
///
/// A constraint set is exclusively owned by a single path; paths call
/// [copy](ConstraintSet::copy) whenever they are copied, so implementations
/// never need interior synchronisation.
pub trait ConstraintSet: Debug + Send + Sync {
    /// A human-readable name, used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the configuration satisfies every constraint in the set.
    fn is_satisfied(&self, config: &[f64]) -> bool;

    /// Projects the configuration onto the constraints in place.
    /// Returns false if the projection failed.
    ///
    /// The default implementation does not move the configuration and only
    /// reports whether it is already satisfied.
    fn apply(&self, config: &mut Configuration) -> bool {
        self.is_satisfied(config)
    }

    /// Creates an independent copy of the constraint set.
    fn copy(&self) -> Box<dyn ConstraintSet>;
}

/// Lower and upper bounds on each degree of freedom.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointBounds {
    name: String,
    lower: Configuration,
    upper: Configuration,
}

impl JointBounds {
    /// Creates a new set of joint bounds.
    ///
    /// # Panics
    /// If `lower` and `upper` have different lengths.
    pub fn new(name: impl Into<String>, lower: &[f64], upper: &[f64]) -> Self {
        assert_eq!(
            lower.len(),
            upper.len(),
            "lower and upper bounds must have the same dimension"
        );
        Self {
            name: name.into(),
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    /// Bounds every degree of freedom from below only.
    pub fn at_least(name: impl Into<String>, lower: &[f64]) -> Self {
        let upper = vec![f64::INFINITY; lower.len()];
        Self::new(name, lower, &upper)
    }

    /// The number of bounded degrees of freedom.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }
}

impl ConstraintSet for JointBounds {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_satisfied(&self, config: &[f64]) -> bool {
        config.len() == self.dimension()
            && config
                .iter()
                .zip_eq(self.lower.iter().zip(&self.upper))
                .all(|(q, (lo, hi))| q >= lo && q <= hi)
    }

    /// Clamps each degree of freedom into its bounds.
    fn apply(&self, config: &mut Configuration) -> bool {
        if config.len() != self.dimension() {
            return false;
        }
        for (q, (lo, hi)) in config.iter_mut().zip_eq(self.lower.iter().zip(&self.upper)) {
            *q = q.clamp(*lo, *hi);
        }
        true
    }

    fn copy(&self) -> Box<dyn ConstraintSet> {
        Box::new(self.clone())
    }
}

/// A conjunction of constraint sets.
#[derive(Debug)]
pub struct ConstraintList {
    name: String,
    constraints: Vec<Box<dyn ConstraintSet>>,
}

impl ConstraintList {
    /// Creates an empty list, which every configuration satisfies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: vec![],
        }
    }

    /// Adds a constraint set to the list.
    pub fn with(mut self, constraints: impl ConstraintSet + 'static) -> Self {
        self.constraints.push(Box::new(constraints));
        self
    }

    /// Adds a boxed constraint set to the list.
    pub fn push(&mut self, constraints: Box<dyn ConstraintSet>) {
        self.constraints.push(constraints);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl ConstraintSet for ConstraintList {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_satisfied(&self, config: &[f64]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(config))
    }

    /// Applies each set in turn, then checks that later projections
    /// did not undo earlier ones.
    fn apply(&self, config: &mut Configuration) -> bool {
        self.constraints.iter().all(|c| c.apply(config)) && self.is_satisfied(config)
    }

    fn copy(&self) -> Box<dyn ConstraintSet> {
        Box::new(Self {
            name: self.name.clone(),
            constraints: self.constraints.iter().map(|c| c.copy()).collect(),
        })
    }
}
