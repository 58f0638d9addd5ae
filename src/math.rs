//! Planar geometry used by [BezierPath](crate::BezierPath).

use cgmath::{Point2, Vector2};
pub use bezier::CubicBezier2d;

mod bezier;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;
