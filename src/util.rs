//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
///
/// The interval is oriented: `start` may be greater than `end`,
/// in which case the interval is traversed backwards.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// Applies `f` to both ends of the interval.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Interval<U> {
        Interval {
            start: f(self.start),
            end: f(self.end),
        }
    }

    /// Returns the same interval traversed in the opposite direction.
    pub fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Whether the interval runs backwards.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// The smaller of the two ends.
    pub fn lower(&self) -> T {
        if self.is_reversed() {
            self.end
        } else {
            self.start
        }
    }

    /// The larger of the two ends.
    pub fn upper(&self) -> T {
        if self.is_reversed() {
            self.start
        } else {
            self.end
        }
    }

    /// Returns true if this interval contains the value, regardless of orientation.
    pub fn contains(&self, value: T) -> bool {
        value >= self.lower() && value <= self.upper()
    }

    /// Returns true if both ends of `other` lie within this interval.
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the signed length of the interval, `end - start`.
    pub fn length(&self) -> T {
        self.end - self.start
    }
}

impl<T: Copy> Interval<T> {
    /// Gets the interval as an array.
    pub fn as_array(&self) -> [T; 2] {
        [self.start, self.end]
    }
}

impl<T: Float> Interval<T> {
    /// Returns the centre/mid-point of the interval.
    pub fn midpoint(&self) -> T {
        T::from(0.5).unwrap() * (self.start + self.end)
    }

    pub fn lerp(&self, t: T) -> T {
        self.start + t * (self.end - self.start)
    }

    pub fn inv_lerp(&self, value: T) -> T {
        (value - self.start) / (self.end - self.start)
    }
}

impl<T> From<(T, T)> for Interval<T> {
    fn from((start, end): (T, T)) -> Self {
        Self { start, end }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.start, &self.end)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn reversed_interval_bounds() {
        let interval = Interval::new(10.0, 2.0);
        assert!(interval.is_reversed());
        assert_eq!(interval.lower(), 2.0);
        assert_eq!(interval.upper(), 10.0);
        assert_eq!(interval.length(), -8.0);
        assert!(interval.contains(5.0));
        assert!(!interval.contains(11.0));
        assert_eq!(interval.reversed(), Interval::new(2.0, 10.0));
    }

    #[test]
    fn contains_interval_ignores_orientation() {
        let domain = Interval::new(0.0, 10.0);
        assert!(domain.contains_interval(&Interval::new(8.0, 3.0)));
        assert!(domain.contains_interval(&domain.reversed()));
        assert!(!domain.contains_interval(&Interval::new(-1.0, 3.0)));
    }

    #[test]
    fn lerp_follows_orientation() {
        let interval = Interval::new(4.0_f64, 0.0);
        assert_approx_eq!(interval.lerp(0.25), 3.0);
        assert_approx_eq!(interval.inv_lerp(1.0), 0.75);
        assert_approx_eq!(interval.midpoint(), 2.0);
    }
}
