//! Canal-surface meshing and self-intersection certification.
//!
//! A *canal surface* is the tube traced by circles of varying radius swept
//! along a 3D spine curve, orthogonal to the curve's local frame - the
//! surface representation used for anatomical tubes such as dendrites and
//! axons. This crate provides:
//!
//! - **Adaptive ring meshing**: [`CanalSurface::generate_mesh`] samples the
//!   spine so every ring-to-ring step matches the local radius (targeting
//!   equilateral triangles), alternates ring offsets into a brick pattern,
//!   fan-caps the ends, and supports chaining segments along a curve tree
//!   through shared rings
//! - **Bezier-specific analysis**: [`BezierCanal`] adds a certified,
//!   explicitly cached bounding box and the render-vector validity check
//! - **Self-intersection certification**: [`LinearCanal`] builds the local
//!   regularity polynomial and the global (single-tube and tube-pair)
//!   polynomial systems whose roots certify whether a tube physically
//!   overlaps itself
//!
//! # Quick Start
//!
//! ```
//! use mesh_canal::{CanalMesh, CanalSurface, ConstantRadius, MeshParams};
//! use spine_curve::BezierSpine;
//! use nalgebra::Point3;
//!
//! let spine = BezierSpine::from_control_points(&[
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//!     Point3::new(3.0, 0.0, 0.0),
//! ])?;
//!
//! let canal = CanalSurface::new(spine, ConstantRadius::new(0.25));
//! let params = MeshParams::default().with_phi_segments(12);
//!
//! let mut mesh = CanalMesh::new();
//! let joint = canal.generate_mesh(&mut mesh, &params, None, true)?;
//!
//! assert!(!mesh.is_empty());
//! assert_eq!(joint.end_ring.len(), 12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Self-Intersection
//!
//! ```
//! use mesh_canal::{Certificate, LinearCanal};
//! use nalgebra::Point3;
//!
//! let canal = LinearCanal::from_control_points(
//!     &[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(2.0, 0.0, 0.0),
//!         Point3::new(3.0, 0.0, 0.0),
//!     ],
//!     0.5,
//!     0.5,
//! )?;
//!
//! // A straight tube cannot overlap itself locally.
//! assert_eq!(canal.local_self_intersection_check(1e-6), Certificate::Clear);
//! # Ok::<(), mesh_canal::CanalError>(())
//! ```
//!
//! # Concurrency
//!
//! All operations are synchronous and side-effect-free apart from writes
//! into the caller's mesh sink and the explicit bounding-box cache. The only
//! shared state is the per-degree self-intersection coefficient table,
//! written once per degree and read-only afterwards; meshing independent
//! segments or checking disjoint tube pairs in parallel is safe. Chained
//! segments must be meshed in curve order, since each consumes ring handles
//! its predecessor produced.

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
mod error;
mod intersection;
mod radius;
mod sink;
mod surface;

pub use bezier::BezierCanal;
pub use error::{CanalError, CanalResult};
pub use intersection::{
    Certificate, LinearCanal, PairIntersectionSystem, SelfIntersectionSystem,
};
pub use radius::{ConstantRadius, LinearRadius, RadiusProfile};
pub use sink::{CanalMesh, Face, MeshSink};
pub use surface::{CanalSurface, MeshJoint, MeshParams, StartRing};

// Re-export the collaborating layers' primary types for convenience.
pub use bernstein_poly::{BernsteinPoly, BiBernsteinPoly, RootBox};
pub use spine_curve::{Aabb, BezierSpine, Frame, SpineCurve};
