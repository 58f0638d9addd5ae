//! Mappings from the externally visible time domain of a path
//! onto its intrinsic parameter domain.

use std::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use cubic::Cubic;

mod cubic;

/// A function mapping time onto the parameter of a path.
pub trait TimeParameterization: Debug + Send + Sync {
    /// The parameter corresponding to time `t`.
    fn value(&self, t: f64) -> f64;

    /// The derivative of the parameter with respect to time.
    /// An `order` of zero is the value itself.
    fn derivative(&self, t: f64, order: usize) -> f64;

    /// Creates an independent copy of the parameterization.
    fn copy(&self) -> Box<dyn TimeParameterization>;
}

/// A linear time law, `s = scale * t + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Linear {
    pub scale: f64,
    pub offset: f64,
}

impl Linear {
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }
}

impl TimeParameterization for Linear {
    fn value(&self, t: f64) -> f64 {
        self.scale * t + self.offset
    }

    fn derivative(&self, t: f64, order: usize) -> f64 {
        match order {
            0 => self.value(t),
            1 => self.scale,
            _ => 0.0,
        }
    }

    fn copy(&self) -> Box<dyn TimeParameterization> {
        Box::new(*self)
    }
}
