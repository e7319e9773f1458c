//! Bezier spine curves for swept-surface modelling.
//!
//! A *spine curve* is the 3D centerline a tube surface is swept around. This
//! crate provides:
//!
//! - [`SpineCurve`] - the capability trait consumed by the canal-surface
//!   layer: evaluation, derivatives, arc length, local framing, domain
//! - [`BezierSpine`] - a 3D Bezier curve of arbitrary (low) degree whose
//!   components are Bernstein polynomials, with de Casteljau interval
//!   clipping and a subdivision bounding box
//! - [`Frame`] - an orthonormal local frame built from a tangent and a fixed
//!   reference vector
//! - [`Aabb`] - axis-aligned bounds with the relative+absolute safety
//!   extension used by canal bounding boxes
//!
//! # Example
//!
//! ```
//! use spine_curve::{BezierSpine, SpineCurve};
//! use nalgebra::Point3;
//!
//! let spine = BezierSpine::from_control_points(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 2.0, 0.0),
//!     Point3::new(3.0, 2.0, 0.0),
//!     Point3::new(4.0, 0.0, 0.0),
//! ])?;
//!
//! let mid = spine.point_at(0.5);
//! assert!(mid.y > 0.0);
//!
//! let length = spine.arc_length_between(0.0, 1.0, 1e-3);
//! assert!(length > 4.0);
//! # Ok::<(), spine_curve::SpineError>(())
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::needless_range_loop,
    clippy::suboptimal_flops,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

mod bezier;
mod bounds;
mod error;
mod frame;
mod traits;

pub use bezier::BezierSpine;
pub use bounds::Aabb;
pub use error::SpineError;
pub use frame::Frame;
pub use traits::SpineCurve;

// Re-export nalgebra types for convenience.
pub use nalgebra::{Point3, Vector3};

/// Result type for spine-curve operations.
pub type Result<T> = std::result::Result<T, SpineError>;
