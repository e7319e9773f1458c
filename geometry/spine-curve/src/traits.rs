//! The spine-curve capability trait.

use nalgebra::{Point3, Vector3};

use crate::frame::Frame;

/// A parametric 3D curve with the capabilities the canal-surface layer
/// consumes.
///
/// Implementors provide position and the first two derivatives; arc length,
/// tangents, and local frames have default implementations on top of those.
///
/// The parameter domain is reported by [`Self::domain`]; for Bezier curves
/// it is always `[0, 1]`.
pub trait SpineCurve {
    /// Evaluate the curve position at parameter `t`.
    fn point_at(&self, t: f64) -> Point3<f64>;

    /// First derivative (velocity, not normalized) at `t`.
    fn derivative_at(&self, t: f64) -> Vector3<f64>;

    /// Second derivative (acceleration) at `t`.
    fn second_derivative_at(&self, t: f64) -> Vector3<f64>;

    /// Parameter domain `(t0, t1)` with `t0 <= t1`.
    fn domain(&self) -> (f64, f64);

    /// Unit tangent at `t`.
    ///
    /// Falls back to an arbitrary fixed direction at (numerically)
    /// stationary points.
    fn tangent_at(&self, t: f64) -> Vector3<f64> {
        self.derivative_at(t)
            .try_normalize(1e-12)
            .unwrap_or(Vector3::z())
    }

    /// Approximate the arc length between `t0` and `t1` by summing chords at
    /// parameter step `dt`.
    ///
    /// The step is clamped so at least one chord is taken; a final partial
    /// chord covers the remainder of the interval.
    fn arc_length_between(&self, t0: f64, t1: f64, dt: f64) -> f64 {
        let (start, end) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let dt = dt.abs().max(f64::EPSILON);

        let mut length = 0.0;
        let mut t = start;
        let mut p = self.point_at(start);
        while t < end {
            let t_next = (t + dt).min(end);
            let p_next = self.point_at(t_next);
            length += (p_next - p).norm();
            t = t_next;
            p = p_next;
        }
        length
    }

    /// The meshing frame at `t`, derived from a fixed reference vector.
    ///
    /// See [`Frame::from_tangent_and_reference`] for why this is used
    /// instead of the Frenet frame.
    fn render_frame(&self, t: f64, reference: Vector3<f64>) -> Frame {
        Frame::from_tangent_and_reference(self.derivative_at(t), reference)
    }

    /// The Frenet frame at `t` (tangent, principal normal, binormal).
    ///
    /// The principal normal is the second derivative with its tangential
    /// component projected out; on straight stretches an arbitrary
    /// perpendicular is substituted.
    fn frenet_frame(&self, t: f64) -> Frame {
        let tangent = self.tangent_at(t);
        let d2 = self.second_derivative_at(t);

        let normal = (d2 - tangent * tangent.dot(&d2))
            .try_normalize(1e-12)
            .unwrap_or_else(|| {
                Frame::from_tangent_and_reference(tangent, Vector3::z()).normal
            });
        let binormal = tangent.cross(&normal);

        Frame::new(tangent, normal, binormal)
    }
}
