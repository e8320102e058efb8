//! Numeric utilities for the sphere-fit calibration
//!
//! - [`Vector3`]: small 3-vector algebra in `f64`
//! - [`Welford`]: streaming mean and variance accumulator
//! - [`sphere_center`]: closed-form center of the sphere through four points

mod sphere;
mod vector;
mod welford;

pub use sphere::{DegenerateGeometry, sphere_center};
pub use vector::{Vector3, det3};
pub use welford::Welford;
