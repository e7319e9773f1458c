//! Local orthonormal frames for ring placement.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An orthonormal frame at a point on a spine curve.
///
/// Ring vertices of a canal surface are placed in the `normal`/`binormal`
/// plane; `tangent` points along the curve.
///
/// Frames used for meshing are derived from a single fixed *reference
/// vector* rather than from the Frenet trihedron: the Frenet normal spins
/// around the curve near curvature extrema and inflections, which twists the
/// quads of a swept mesh. A fixed reference gives a stable frame wherever
/// the reference is not close to parallel with the tangent - the
/// render-vector validity check in the canal layer quantifies exactly that.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Unit tangent (forward along the curve).
    pub tangent: Vector3<f64>,
    /// Unit normal (first ring axis).
    pub normal: Vector3<f64>,
    /// Unit binormal (second ring axis, `tangent x normal`).
    pub binormal: Vector3<f64>,
}

impl Frame {
    /// Create a frame from components assumed to be orthonormal.
    #[must_use]
    pub fn new(tangent: Vector3<f64>, normal: Vector3<f64>, binormal: Vector3<f64>) -> Self {
        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Build a frame from a tangent and a reference vector.
    ///
    /// The normal is the unit direction of `reference x tangent`, so it is
    /// perpendicular to both; the binormal completes the right-handed basis.
    /// If the reference is (numerically) parallel to the tangent, an
    /// arbitrary perpendicular is substituted so the frame stays usable.
    #[must_use]
    pub fn from_tangent_and_reference(tangent: Vector3<f64>, reference: Vector3<f64>) -> Self {
        let tangent = tangent.try_normalize(f64::EPSILON).unwrap_or(Vector3::z());

        let normal = reference
            .cross(&tangent)
            .try_normalize(1e-12)
            .unwrap_or_else(|| arbitrary_perpendicular(&tangent));
        let binormal = tangent.cross(&normal);

        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Check orthonormality within tolerance.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.tangent.norm() - 1.0).abs() < tolerance
            && (self.normal.norm() - 1.0).abs() < tolerance
            && (self.binormal.norm() - 1.0).abs() < tolerance
            && self.tangent.dot(&self.normal).abs() < tolerance
            && self.tangent.dot(&self.binormal).abs() < tolerance
            && self.normal.dot(&self.binormal).abs() < tolerance
    }
}

/// Choose a unit vector perpendicular to `v`, using the axis `v` is least
/// aligned with.
fn arbitrary_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let abs_x = v.x.abs();
    let abs_y = v.y.abs();
    let abs_z = v.z.abs();

    let reference = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&reference)
        .try_normalize(f64::EPSILON)
        .unwrap_or(Vector3::y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn frame_from_reference_is_orthonormal() {
        let frame = Frame::from_tangent_and_reference(Vector3::x(), Vector3::z());
        assert!(frame.is_orthonormal(1e-12));
        assert_relative_eq!(frame.tangent, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn parallel_reference_falls_back() {
        let frame = Frame::from_tangent_and_reference(Vector3::x(), Vector3::x());
        assert!(frame.is_orthonormal(1e-10));
    }

    #[test]
    fn frames_stay_aligned_along_straight_curve() {
        // Same tangent, same reference: identical frames (no twist).
        let a = Frame::from_tangent_and_reference(Vector3::x(), Vector3::z());
        let b = Frame::from_tangent_and_reference(Vector3::x(), Vector3::z());
        assert_relative_eq!(a.normal, b.normal, epsilon = 1e-12);
        assert_relative_eq!(a.binormal, b.binormal, epsilon = 1e-12);
    }

    #[test]
    fn arbitrary_perpendicular_is_perpendicular() {
        for v in [
            Vector3::x(),
            Vector3::y(),
            Vector3::z(),
            Vector3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let perp = arbitrary_perpendicular(&v);
            assert_relative_eq!(v.dot(&perp), 0.0, epsilon = 1e-12);
            assert_relative_eq!(perp.norm(), 1.0, epsilon = 1e-12);
        }
    }
}
