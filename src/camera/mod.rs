//! Camera viewpoints and view-to-view interpolation.

mod core;
mod interpolate;

pub use self::core::{CameraParams, CameraTarget};
pub(crate) use self::core::orthonormal_up;
pub use self::interpolate::{interpolate, rotation_between};
