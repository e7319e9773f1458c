//! Canal surfaces over Bezier spines: bounding boxes, clipping, and the
//! render-vector validity check.

use bernstein_poly::{isolate_roots, BernsteinPoly};
use nalgebra::Vector3;
use tracing::debug;

use spine_curve::{Aabb, BezierSpine, SpineCurve};

use crate::error::{CanalError, CanalResult};
use crate::radius::RadiusProfile;
use crate::sink::MeshSink;
use crate::surface::{CanalSurface, MeshJoint, MeshParams, StartRing};

/// Root-isolation tolerance for the render-vector check.
const RENDER_VECTOR_TOL: f64 = 1e-6;

/// A canal surface over a Bezier spine.
///
/// Wraps the generic [`CanalSurface`] (composition, so the Bezier spine can
/// never be "sliced" away by an assignment) and adds what only a polynomial
/// spine supports: a certified bounding box from recursive subdivision,
/// interval clipping, and the render-vector validity check.
///
/// The bounding box is an explicit cache: it is only readable after
/// [`Self::update_bounds`] and is invalidated by clipping. Reading a stale
/// box is a usage error, never silently recomputed.
#[derive(Debug, Clone)]
pub struct BezierCanal<F> {
    surface: CanalSurface<BezierSpine, F>,
    bounds: Option<Aabb>,
}

impl<F> BezierCanal<F>
where
    F: RadiusProfile<BezierSpine>,
{
    /// Create a canal over a Bezier spine; the domain is [0, 1].
    #[must_use]
    pub fn new(spine: BezierSpine, radius: F) -> Self {
        Self {
            surface: CanalSurface::new(spine, radius),
            bounds: None,
        }
    }

    /// The underlying generic canal surface.
    #[inline]
    #[must_use]
    pub fn surface(&self) -> &CanalSurface<BezierSpine, F> {
        &self.surface
    }

    /// The Bezier spine.
    #[inline]
    #[must_use]
    pub fn spine(&self) -> &BezierSpine {
        self.surface.spine()
    }

    /// The radius profile.
    #[inline]
    #[must_use]
    pub fn radius_profile(&self) -> &F {
        self.surface.radius_profile()
    }

    /// Generate the tube mesh; see [`CanalSurface::generate_mesh`].
    ///
    /// # Errors
    ///
    /// Propagates the mesh-generation errors of the underlying surface.
    pub fn generate_mesh<M: MeshSink>(
        &self,
        mesh: &mut M,
        params: &MeshParams,
        start: Option<&StartRing<'_>>,
        cap_end: bool,
    ) -> CanalResult<MeshJoint> {
        self.surface.generate_mesh(mesh, params, start, cap_end)
    }

    /// Restrict the canal to the parameter interval `[t0, t1]`, which
    /// becomes the new [0, 1] domain.
    ///
    /// The radius profile is clipped first - it needs the unclipped spine to
    /// evaluate its new end radii - and the cached bounding box is
    /// invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::MalformedInterval`] if `t0 > t1`.
    pub fn clip_to_interval(&mut self, t0: f64, t1: f64) -> CanalResult<()> {
        if t0 > t1 {
            return Err(CanalError::MalformedInterval { t0, t1 });
        }
        self.surface.radius.clip_to(t0, t1, &self.surface.spine);
        self.surface.spine = self.surface.spine.clipped(t0, t1)?;
        let (d0, d1) = self.surface.spine.domain();
        self.surface.t0 = d0;
        self.surface.t1 = d1;
        self.bounds = None;
        Ok(())
    }

    /// Recompute the cached bounding box.
    ///
    /// The spine is recursively subdivided to `depth` and the box of the
    /// subdivided control points (which contains the curve) is extended by
    /// the profile's maximum radius in every axis, then by a 2.5% relative
    /// margin floored at 1e-3 absolute per axis.
    pub fn update_bounds(&mut self, depth: u32) {
        let mut bb = self.surface.spine.bounding_box(depth);
        let rmax = self
            .surface
            .radius
            .max_radius(&self.surface.spine);
        bb.extend(0.0, Vector3::repeat(rmax));
        bb.extend(0.025, Vector3::repeat(1e-3));
        self.bounds = Some(bb);
    }

    /// The cached bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::BoundsNotComputed`] if [`Self::update_bounds`]
    /// has not run since construction or the last clip.
    pub fn bounds(&self) -> CanalResult<Aabb> {
        self.bounds.ok_or(CanalError::BoundsNotComputed)
    }

    /// Measure how safe `r` is as the fixed frame reference vector for this
    /// spine.
    ///
    /// Returns the minimum over the domain of
    /// `f(t) = |r x gamma'(t)|^2 / |gamma'(t)|^2`, found by isolating the
    /// roots of the stationary-point numerator `p'q - pq'` and evaluating
    /// `f` there and at both endpoints. The value is 0 exactly when `r` is
    /// parallel to the tangent somewhere; callers accept `r` when the
    /// returned minimum clears their threshold.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::Uncertified`] when root isolation cannot
    /// certify the stationary points.
    pub fn check_render_vector(&self, r: Vector3<f64>) -> CanalResult<f64> {
        let d = self.surface.spine.derivative();
        let dg = d.components();

        // Components of r x gamma'.
        let cross = [
            (&dg[2] * r.y) - (&dg[1] * r.z),
            (&dg[0] * r.z) - (&dg[2] * r.x),
            (&dg[1] * r.x) - (&dg[0] * r.y),
        ];
        let p = cross[0].square() + cross[1].square() + cross[2].square();
        let q = dg[0].square() + dg[1].square() + dg[2].square();

        // Stationary points of p/q are the roots of the quotient-rule
        // numerator.
        let z = p.derivative().multiply(&q) - p.multiply(&q.derivative());

        let ratio = |t: f64| -> f64 {
            let denom = q.eval(t);
            if denom > f64::MIN_POSITIVE {
                p.eval(t) / denom
            } else {
                // Singular spine point: the frame is unusable there, so the
                // reference vector cannot be certified better than 0.
                0.0
            }
        };

        let mut f_min = ratio(0.0).min(ratio(1.0));

        // z vanishes identically when f is constant (straight spines, or a
        // reference perpendicular to a planar spine). The test is relative
        // to the magnitude of the p'q and pq' terms, since cancellation
        // leaves rounding residue rather than exact zeros.
        let max_abs = |poly: &BernsteinPoly| -> f64 {
            poly.coeffs().iter().fold(0.0_f64, |m, c| m.max(c.abs()))
        };
        let z_eps = 1e-10 * (1.0 + max_abs(&p)) * (1.0 + max_abs(&q));
        if !z.is_zero(z_eps) {
            for root in isolate_roots(&z, 0.0, 1.0, RENDER_VECTOR_TOL)? {
                f_min = f_min.min(ratio(root.midpoint()));
            }
        }

        debug!(f_min, "render vector checked");
        Ok(f_min)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::radius::{ConstantRadius, LinearRadius};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn straight_spine() -> BezierSpine {
        BezierSpine::from_control_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    fn arch_spine() -> BezierSpine {
        BezierSpine::from_control_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(3.0, 2.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn bounds_unreadable_before_update() {
        let canal = BezierCanal::new(arch_spine(), ConstantRadius::new(0.5));
        let err = canal.bounds().unwrap_err();
        assert_eq!(err, CanalError::BoundsNotComputed);
    }

    #[test]
    fn bounds_contain_tube_with_margin() {
        let mut canal = BezierCanal::new(arch_spine(), ConstantRadius::new(0.5));
        canal.update_bounds(4);
        let bb = canal.bounds().unwrap();

        // Every spine sample expanded by the radius stays inside.
        for i in 0..=50 {
            let t = f64::from(i) / 50.0;
            let p = canal.spine().point_at(t);
            for offset in [
                Vector3::new(0.5, 0.0, 0.0),
                Vector3::new(-0.5, 0.0, 0.0),
                Vector3::new(0.0, 0.5, 0.0),
                Vector3::new(0.0, 0.0, 0.5),
            ] {
                assert!(bb.contains(&(p + offset)));
            }
        }

        // The absolute floor applies on the flat z axis: at least 1e-3
        // beyond radius reach.
        assert!(bb.max.z >= 0.5 + 1e-3);
        assert!(bb.min.z <= -0.5 - 1e-3);
    }

    #[test]
    fn clip_invalidates_bounds() {
        let mut canal = BezierCanal::new(arch_spine(), LinearRadius::new(0.5, 1.0));
        canal.update_bounds(4);
        assert!(canal.bounds().is_ok());

        canal.clip_to_interval(0.2, 0.8).unwrap();
        assert_eq!(canal.bounds().unwrap_err(), CanalError::BoundsNotComputed);
    }

    #[test]
    fn clip_rejects_malformed_interval() {
        let mut canal = BezierCanal::new(arch_spine(), ConstantRadius::new(0.5));
        let err = canal.clip_to_interval(0.8, 0.2).unwrap_err();
        assert!(matches!(err, CanalError::MalformedInterval { .. }));
    }

    #[test]
    fn clip_restricts_geometry_and_radii() {
        let mut canal = BezierCanal::new(arch_spine(), LinearRadius::new(1.0, 2.0));
        let original = canal.spine().clone();
        canal.clip_to_interval(0.25, 0.75).unwrap();

        assert_relative_eq!(
            canal.spine().point_at(0.0).coords,
            original.point_at(0.25).coords,
            epsilon = 1e-10
        );
        assert_relative_eq!(
            canal.spine().point_at(1.0).coords,
            original.point_at(0.75).coords,
            epsilon = 1e-10
        );

        // The clipped profile anchors at the old interior radii.
        let (r0, r1) = canal.radius_profile().radii();
        assert!(r0 > 1.0 && r0 < r1 && r1 < 2.0);
    }

    #[test]
    fn render_vector_perpendicular_to_straight_spine_is_safe() {
        let canal = BezierCanal::new(straight_spine(), ConstantRadius::new(0.5));
        // Tangent is +x everywhere; z is fully perpendicular.
        let f_min = canal.check_render_vector(Vector3::z()).unwrap();
        assert_relative_eq!(f_min, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn render_vector_parallel_to_tangent_is_unsafe() {
        let canal = BezierCanal::new(straight_spine(), ConstantRadius::new(0.5));
        let f_min = canal.check_render_vector(Vector3::x()).unwrap();
        assert_relative_eq!(f_min, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn render_vector_minimum_is_nonnegative_and_interior_aware() {
        let canal = BezierCanal::new(arch_spine(), ConstantRadius::new(0.5));
        // The tangent swings through the xy plane; y crosses near-parallel
        // somewhere in the interior, x is parallel at the apex region.
        for r in [Vector3::x(), Vector3::y(), Vector3::z()] {
            let f_min = canal.check_render_vector(r).unwrap();
            assert!(f_min >= 0.0);
        }
        // z stays perpendicular to the planar tangent: maximally safe.
        let fz = canal.check_render_vector(Vector3::z()).unwrap();
        let fx = canal.check_render_vector(Vector3::x()).unwrap();
        assert!(fz > fx);
    }
}
