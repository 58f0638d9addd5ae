#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TimeParameterization;

/// A cubic time law.
///
/// Typically used as a rest-to-rest velocity profile: the parameter moves
/// from one end of the path to the other with zero velocity at both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cubic {
    coeffs: [f64; 4],
    offset: f64,
}

impl Cubic {
    pub const fn constant(s: f64) -> Self {
        Self {
            coeffs: [0.0, 0.0, 0.0, s],
            offset: 0.0,
        }
    }

    /// Fits a cubic through `(t1, s1)` and `(t2, s2)` with the given slopes.
    pub fn fit(t1: f64, s1: f64, dsdt1: f64, t2: f64, s2: f64, dsdt2: f64) -> Self {
        let w = t2 - t1;
        let a = 2. * s1 - 2. * s2 + w * dsdt1 + w * dsdt2;
        let b = -3. * s1 + 3. * s2 - 2. * w * dsdt1 - w * dsdt2;
        let c = w * dsdt1;
        let d = s1;
        Self {
            coeffs: [a * w.powi(-3), b * w.powi(-2), c * w.powi(-1), d],
            offset: -t1,
        }
    }

    /// Fits a cubic through `(t1, s1)` and `(t2, s2)` with zero slope at both ends.
    pub fn from_ends(t1: f64, s1: f64, t2: f64, s2: f64) -> Self {
        let (t, s) = (t2 - t1, s2 - s1);
        let a = -2.0 * s * t.powi(-3);
        let b = 3.0 * s * t.powi(-2);
        Self {
            coeffs: [a, b, 0.0, s1],
            offset: -t1,
        }
    }

    /// Returns a copy of this law delayed by `amount` units of time.
    pub fn delay(&self, amount: f64) -> Cubic {
        Self {
            coeffs: self.coeffs,
            offset: self.offset - amount,
        }
    }
}

impl TimeParameterization for Cubic {
    fn value(&self, t: f64) -> f64 {
        self.derivative(t, 0)
    }

    fn derivative(&self, t: f64, order: usize) -> f64 {
        let [a, b, c, d] = self.coeffs;
        let x = t + self.offset;
        match order {
            0 => a * x * x * x + b * x * x + c * x + d,
            1 => a * 3. * x * x + b * 2. * x + c,
            2 => a * 6. * x + b * 2.,
            3 => a * 6.,
            _ => 0.0,
        }
    }

    fn copy(&self) -> Box<dyn TimeParameterization> {
        Box::new(*self)
    }
}
