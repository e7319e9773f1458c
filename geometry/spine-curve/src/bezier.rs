//! Bezier spine curves.

use bernstein_poly::BernsteinPoly;
use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::error::SpineError;
use crate::traits::SpineCurve;
use crate::Result;

/// A 3D Bezier curve of arbitrary degree, used as the centerline of a canal
/// surface.
///
/// Each spatial component is a Bernstein polynomial; the `i`-th control
/// point is the vector of `i`-th coefficients. The parameter domain is
/// always `[0, 1]`.
///
/// Values are plain data: cloning and clipping produce independent curves,
/// never shared mutable state.
///
/// # Example
///
/// ```
/// use spine_curve::{BezierSpine, SpineCurve};
/// use nalgebra::Point3;
///
/// let spine = BezierSpine::from_control_points(&[
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
/// ])?;
///
/// assert_eq!(spine.degree(), 2);
/// assert_eq!(spine.point_at(0.0), Point3::new(0.0, 0.0, 0.0));
/// # Ok::<(), spine_curve::SpineError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSpine {
    components: [BernsteinPoly; 3],
}

impl BezierSpine {
    /// Build a spine from its control points.
    ///
    /// The degree is `points.len() - 1`.
    ///
    /// # Errors
    ///
    /// Returns [`SpineError::InsufficientControlPoints`] for fewer than two
    /// control points (a single point is not a curve).
    pub fn from_control_points(points: &[Point3<f64>]) -> Result<Self> {
        if points.len() < 2 {
            return Err(SpineError::InsufficientControlPoints {
                required: 2,
                actual: points.len(),
            });
        }
        let component = |pick: fn(&Point3<f64>) -> f64| {
            BernsteinPoly::new(points.iter().map(pick).collect())
        };
        Ok(Self {
            components: [
                component(|p| p.x),
                component(|p| p.y),
                component(|p| p.z),
            ],
        })
    }

    /// Build a spine from three component polynomials of equal degree.
    ///
    /// # Errors
    ///
    /// Returns [`SpineError::ComponentDegreeMismatch`] if the degrees
    /// differ, or [`SpineError::InsufficientControlPoints`] for degree 0.
    pub fn from_components(components: [BernsteinPoly; 3]) -> Result<Self> {
        let [dx, dy, dz] = [
            components[0].degree(),
            components[1].degree(),
            components[2].degree(),
        ];
        if dx != dy || dy != dz {
            return Err(SpineError::ComponentDegreeMismatch {
                x: dx,
                y: dy,
                z: dz,
            });
        }
        if dx == 0 {
            return Err(SpineError::InsufficientControlPoints {
                required: 2,
                actual: 1,
            });
        }
        Ok(Self { components })
    }

    /// Curve degree.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.components[0].degree()
    }

    /// Degree of the first derivative.
    ///
    /// This is the single source for derivative-degree bookkeeping; the
    /// intersection algebra derives all its polynomial sizes from it.
    #[inline]
    #[must_use]
    pub fn derivative_degree(&self) -> usize {
        self.degree().saturating_sub(1)
    }

    /// Component polynomial for axis `0..3` (x, y, z).
    #[inline]
    #[must_use]
    pub fn component(&self, axis: usize) -> &BernsteinPoly {
        &self.components[axis]
    }

    /// All three component polynomials.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[BernsteinPoly; 3] {
        &self.components
    }

    /// The `i`-th control point.
    #[must_use]
    pub fn control_point(&self, i: usize) -> Point3<f64> {
        Point3::new(
            self.components[0].coeff(i),
            self.components[1].coeff(i),
            self.components[2].coeff(i),
        )
    }

    /// All control points.
    #[must_use]
    pub fn control_points(&self) -> Vec<Point3<f64>> {
        (0..=self.degree()).map(|i| self.control_point(i)).collect()
    }

    /// The derivative curve (degree one less).
    #[must_use]
    pub fn derivative(&self) -> Self {
        Self {
            components: [
                self.components[0].derivative(),
                self.components[1].derivative(),
                self.components[2].derivative(),
            ],
        }
    }

    /// Split at `t` into the curves over [0, t] and [t, 1], each
    /// reparametrized over [0, 1].
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let (x0, x1) = self.components[0].split(t);
        let (y0, y1) = self.components[1].split(t);
        let (z0, z1) = self.components[2].split(t);
        (
            Self {
                components: [x0, y0, z0],
            },
            Self {
                components: [x1, y1, z1],
            },
        )
    }

    /// Restrict the curve to `[t0, t1]`, reparametrized over [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`SpineError::MalformedInterval`] if `t0 > t1`.
    pub fn clipped(&self, t0: f64, t1: f64) -> Result<Self> {
        if t0 > t1 {
            return Err(SpineError::MalformedInterval { t0, t1 });
        }
        Ok(Self {
            components: [
                self.components[0].clipped(t0, t1),
                self.components[1].clipped(t0, t1),
                self.components[2].clipped(t0, t1),
            ],
        })
    }

    /// Control points of the curve after `depth` rounds of recursive
    /// midpoint subdivision (`2^depth` segments).
    ///
    /// The union of subdivided control polygons converges to the curve and
    /// always contains it (convex hull property), which is what the canal
    /// bounding box needs.
    #[must_use]
    pub fn subdivided_control_points(&self, depth: u32) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        self.collect_subdivided(depth, &mut points);
        points
    }

    fn collect_subdivided(&self, depth: u32, out: &mut Vec<Point3<f64>>) {
        if depth == 0 {
            out.extend(self.control_points());
        } else {
            let (left, right) = self.split(0.5);
            left.collect_subdivided(depth - 1, out);
            right.collect_subdivided(depth - 1, out);
        }
    }

    /// Axis-aligned bounding box from recursive subdivision to `depth`.
    ///
    /// The box is guaranteed to contain the curve and tightens as `depth`
    /// grows.
    #[must_use]
    pub fn bounding_box(&self, depth: u32) -> Aabb {
        Aabb::from_points(self.subdivided_control_points(depth).iter())
    }

    /// The regularity polynomial `t -> |gamma'(t)|^2` of degree
    /// `2 * derivative_degree`.
    ///
    /// The curve is regular (has a well-defined tangent everywhere) iff this
    /// polynomial is positive on [0, 1].
    #[must_use]
    pub fn regularity_poly(&self) -> BernsteinPoly {
        let d = self.derivative();
        d.components[0].square() + d.components[1].square() + d.components[2].square()
    }

    /// The stationary-point polynomial of the squared distance to a fixed
    /// point: `t -> gamma'(t) . (gamma(t) - point)`.
    ///
    /// Its roots in [0, 1] are the interior candidates for the closest (and
    /// farthest) curve point to `point`; degree is
    /// `degree + derivative_degree`.
    #[must_use]
    pub fn stationary_distance_poly(&self, point: &Point3<f64>) -> BernsteinPoly {
        let d = self.derivative();
        let n = self.degree();
        let mut acc = BernsteinPoly::zero();
        for axis in 0..3 {
            let offset = &self.components[axis] - &BernsteinPoly::constant(point[axis], n);
            acc = acc + d.components[axis].multiply(&offset);
        }
        acc
    }
}

impl SpineCurve for BezierSpine {
    fn point_at(&self, t: f64) -> Point3<f64> {
        Point3::new(
            self.components[0].eval(t),
            self.components[1].eval(t),
            self.components[2].eval(t),
        )
    }

    fn derivative_at(&self, t: f64) -> Vector3<f64> {
        let d = self.derivative();
        Vector3::new(
            d.components[0].eval(t),
            d.components[1].eval(t),
            d.components[2].eval(t),
        )
    }

    fn second_derivative_at(&self, t: f64) -> Vector3<f64> {
        let d2 = self.derivative().derivative();
        Vector3::new(
            d2.components[0].eval(t),
            d2.components[1].eval(t),
            d2.components[2].eval(t),
        )
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
