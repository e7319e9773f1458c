//! Radius profiles for canal surfaces.

use spine_curve::SpineCurve;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameter step used for the arc-length integration inside radius
/// profiles.
const ARCLEN_STEP: f64 = 1e-3;

/// A radius profile: the cross-section radius of a canal surface as a
/// function of the spine parameter.
///
/// Profiles receive the spine curve on every query so they can express
/// curve-dependent laws (e.g. interpolation in arc length). A profile is
/// owned by its canal surface by value; clipping the surface clips the
/// profile in place.
pub trait RadiusProfile<C: SpineCurve> {
    /// Radius at parameter `t`. Must be non-negative on the curve domain.
    fn radius_at(&self, t: f64, curve: &C) -> f64;

    /// Restrict the profile to the subinterval `[t0, t1]` of the current
    /// domain, which is about to become the whole domain.
    ///
    /// Called with the *unclipped* curve, before the curve itself is
    /// clipped, so the profile can evaluate its new end values against the
    /// old parametrization.
    fn clip_to(&mut self, t0: f64, t1: f64, curve: &C);

    /// Smallest radius over the curve domain.
    fn min_radius(&self, curve: &C) -> f64;

    /// Largest radius over the curve domain.
    fn max_radius(&self, curve: &C) -> f64;
}

/// A constant radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantRadius {
    radius: f64,
}

impl ConstantRadius {
    /// Create a constant-radius profile.
    #[must_use]
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// The radius value.
    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl<C: SpineCurve> RadiusProfile<C> for ConstantRadius {
    fn radius_at(&self, _t: f64, _curve: &C) -> f64 {
        self.radius
    }

    fn clip_to(&mut self, _t0: f64, _t1: f64, _curve: &C) {}

    fn min_radius(&self, _curve: &C) -> f64 {
        self.radius
    }

    fn max_radius(&self, _curve: &C) -> f64 {
        self.radius
    }
}

/// Two end radii interpolated linearly in *arc length* along the spine.
///
/// Interpolating in arc length rather than in the raw parameter keeps the
/// taper rate constant along the tube even when the spine parametrization
/// has uneven speed.
///
/// # Example
///
/// ```
/// use mesh_canal::{LinearRadius, RadiusProfile};
/// use spine_curve::BezierSpine;
/// use nalgebra::Point3;
///
/// let spine = BezierSpine::from_control_points(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(3.0, 0.0, 0.0),
/// ])?;
/// let profile = LinearRadius::new(1.0, 2.0);
///
/// let mid = profile.radius_at(0.5, &spine);
/// assert!((mid - 1.5).abs() < 1e-6);
/// # Ok::<(), spine_curve::SpineError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearRadius {
    r0: f64,
    r1: f64,
}

impl LinearRadius {
    /// Create a profile interpolating from `r0` (at the domain start) to
    /// `r1` (at the domain end).
    #[must_use]
    pub fn new(r0: f64, r1: f64) -> Self {
        Self { r0, r1 }
    }

    /// The end radii `(r0, r1)`.
    #[inline]
    #[must_use]
    pub fn radii(&self) -> (f64, f64) {
        (self.r0, self.r1)
    }
}

impl<C: SpineCurve> RadiusProfile<C> for LinearRadius {
    fn radius_at(&self, t: f64, curve: &C) -> f64 {
        let (t0, t1) = curve.domain();
        let total = curve.arc_length_between(t0, t1, ARCLEN_STEP);
        if total <= f64::EPSILON {
            return self.r0;
        }
        let prefix = curve.arc_length_between(t0, t, ARCLEN_STEP);
        let ratio = (prefix / total).clamp(0.0, 1.0);
        self.r0 + (self.r1 - self.r0) * ratio
    }

    fn clip_to(&mut self, t0: f64, t1: f64, curve: &C) {
        // Evaluate against the unclipped curve; the new end radii become the
        // interpolation anchors of the restricted profile.
        let r0 = self.radius_at(t0, curve);
        let r1 = self.radius_at(t1, curve);
        self.r0 = r0;
        self.r1 = r1;
    }

    fn min_radius(&self, _curve: &C) -> f64 {
        self.r0.min(self.r1)
    }

    fn max_radius(&self, _curve: &C) -> f64 {
        self.r0.max(self.r1)
    }
}
