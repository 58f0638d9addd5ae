//! Time-parameterized paths through a robot's configuration space.
//!
//! A [Path] maps a time domain onto configurations. Extracting part of a
//! path or reversing it produces either a copy or a cheap [ExtractedPath]
//! view, and any attached [TimeParameterization] is carried along so that
//! extracted paths keep working in the same time coordinates.

pub use cgmath;
pub use constraint::{ConstraintList, ConstraintSet, JointBounds};
pub use error::{Endpoint, ProjectionError, Result};
pub use path::{
    default_extract, share, BezierPath, ExtractedPath, Path, PathBase, PathPtr, StraightPath,
    DERIVATIVE_STEP, PARAM_TOLERANCE,
};
pub use smallvec;
pub use time_parameterization::TimeParameterization;
pub use util::Interval;

use smallvec::SmallVec;

mod constraint;
mod error;
pub mod math;
mod path;
pub mod time_parameterization;
mod util;

/// A configuration, or a derivative of one.
pub type Configuration = SmallVec<[f64; 8]>;
