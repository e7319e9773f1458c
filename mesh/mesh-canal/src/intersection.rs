//! Self-intersection algebra for Bezier canal surfaces with linear radius.
//!
//! A tube can overlap itself two ways: locally (the radius exceeds the
//! radius of curvature, so neighbouring rings interpenetrate) and globally
//! (two distant stretches of the spine come closer than the sum of their
//! radii). Both conditions reduce to sign and root questions about
//! polynomials built from the spine coefficients:
//!
//! - the *local* condition is a univariate sign check on
//!   `r_max^2 |gamma' x gamma''|^2 - |gamma'|^6`
//! - the *global* condition needs the stationary pairs of the squared
//!   distance `|gamma(x) - gamma(y)|^2`, the common roots of its two partial
//!   derivatives projected onto the tangents
//!
//! For a single tube the diagonal `x = y` is a trivial zero of the distance
//! and must be factored out first; the degree-indexed coefficient table encodes
//! that factorization once per polynomial degree and is shared process-wide.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use bernstein_poly::{
    isolate_common_roots, isolate_roots, BernsteinPoly, BiBernsteinPoly, RootBox,
};
use nalgebra::{DMatrix, Point3};
use tracing::debug;

use spine_curve::{BezierSpine, SpineCurve};

use crate::bezier::BezierCanal;
use crate::error::{CanalError, CanalResult};
use crate::radius::{LinearRadius, RadiusProfile};

/// Outcome of a certified sign check.
///
/// `Inconclusive` is a legitimate non-negative answer: the numerical budget
/// ran out before the condition could be certified either way. Callers must
/// fall back (finer tolerance, conservative rejection) rather than treat it
/// as `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certificate {
    /// The condition was certified to hold.
    Clear,
    /// The condition was certified to fail.
    Violated,
    /// The check could not be completed within its numerical budget.
    Inconclusive,
}

/// The degree-indexed coefficient table for single-tube self-intersection.
///
/// Entry `(i, j)` is the bivariate polynomial
/// `G_ij = B_j(y) F_i(x, y) - B_i(y) F_j(x, y)` where
/// `F_i(x, y) = (B_i(x) - B_i(y)) / (x - y)` carries the below-diagonal
/// combinatorial structure of the Bernstein basis. Summed against the spine
/// coefficients, the table yields the distance vector with the trivial
/// diagonal zero divided out.
///
/// The table depends only on the degree, so it is built once per degree and
/// shared across all canals of that degree (see [`LinearCanal::new`]).
#[derive(Debug)]
pub(crate) struct GTable {
    degree: usize,
    entries: Vec<BiBernsteinPoly>,
}

impl GTable {
    fn build(degree: usize) -> Self {
        let n = degree;

        // Power-basis form of every Bernstein basis polynomial B_i^n.
        let basis_power: Vec<Vec<f64>> = (0..=n)
            .map(|i| BernsteinPoly::basis(n, i).to_power_basis())
            .collect();

        // F_i in bidegree (n-1, n-1): each power term c t^k of B_i^n
        // contributes c * sum_{m<k} x^m y^(k-1-m), the expansion of
        // c (x^k - y^k)/(x - y). Every cross term enters exactly once.
        let f: Vec<BiBernsteinPoly> = (0..=n)
            .map(|i| {
                let mut power = DMatrix::zeros(n, n);
                for k in 1..=n {
                    for m in 0..k {
                        power[(m, k - 1 - m)] += basis_power[i][k];
                    }
                }
                BiBernsteinPoly::from_power_basis(&power)
            })
            .collect();

        // B_i^n(y) embedded at bidegree (n, n), constant in x.
        let basis_y: Vec<BiBernsteinPoly> = (0..=n)
            .map(|i| BiBernsteinPoly::from_y(&BernsteinPoly::basis(n, i), n))
            .collect();

        let mut entries = Vec::with_capacity((n + 1) * (n + 1));
        for i in 0..=n {
            for j in 0..=n {
                entries.push(basis_y[j].multiply(&f[i]) - basis_y[i].multiply(&f[j]));
            }
        }

        debug!(degree, "built self-intersection coefficient table");
        Self { degree, entries }
    }

    fn get(&self, i: usize, j: usize) -> &BiBernsteinPoly {
        &self.entries[i * (self.degree + 1) + j]
    }
}

/// Fetch the shared table for a degree, building it on first use.
///
/// The map is written at most once per degree and read-only afterwards, so
/// concurrent canals of equal degree share one allocation.
fn g_table(degree: usize) -> Arc<GTable> {
    static TABLES: OnceLock<Mutex<HashMap<usize, Arc<GTable>>>> = OnceLock::new();
    let tables = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = match tables.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    guard
        .entry(degree)
        .or_insert_with(|| Arc::new(GTable::build(degree)))
        .clone()
}

/// The polynomial system certifying single-tube self-intersection.
///
/// Common roots of `(p, q)` in the open unit square are the stationary
/// pairs of the spine's self-distance with the trivial diagonal factored
/// out; comparing the distance at each root against the tube radii decides
/// physical overlap. Only two boundary edges are non-redundant (distance is
/// symmetric in its arguments), giving two univariate edge polynomials.
#[derive(Debug, Clone)]
pub struct SelfIntersectionSystem {
    /// Distance stationarity along the first parameter.
    pub p: BiBernsteinPoly,
    /// Distance stationarity along the second parameter.
    pub q: BiBernsteinPoly,
    /// Edge polynomial `gamma'(t) . (gamma(t) - gamma(0))`.
    pub edge_t0: BernsteinPoly,
    /// Edge polynomial `gamma'(t) . (gamma(t) - gamma(1))`.
    pub edge_t1: BernsteinPoly,
}

impl SelfIntersectionSystem {
    /// Isolate the candidate self-intersection parameter pairs, the common
    /// roots of `(p, q)` on the unit square.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::Uncertified`] when the solver exhausts its
    /// budget; the tube then cannot be certified intersection-free.
    pub fn candidate_roots(&self, tol: f64) -> CanalResult<Vec<RootBox>> {
        Ok(isolate_common_roots(&self.p, &self.q, tol)?)
    }
}

/// The polynomial system certifying intersection of two distinct tubes.
///
/// No symmetry reduction applies across two curves, so all four boundary
/// edges of the unit square get an edge polynomial.
#[derive(Debug, Clone)]
pub struct PairIntersectionSystem {
    /// Distance stationarity along the first tube's parameter.
    pub p: BiBernsteinPoly,
    /// Distance stationarity along the second tube's parameter.
    pub q: BiBernsteinPoly,
    /// Edge `x = 0`: `delta'(y) . (delta(y) - gamma(0))`.
    pub edge_x0: BernsteinPoly,
    /// Edge `x = 1`: `delta'(y) . (delta(y) - gamma(1))`.
    pub edge_x1: BernsteinPoly,
    /// Edge `y = 0`: `gamma'(x) . (gamma(x) - delta(0))`.
    pub edge_y0: BernsteinPoly,
    /// Edge `y = 1`: `gamma'(x) . (gamma(x) - delta(1))`.
    pub edge_y1: BernsteinPoly,
}

impl PairIntersectionSystem {
    /// Isolate the candidate intersection parameter pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::Uncertified`] when the solver exhausts its
    /// budget.
    pub fn candidate_roots(&self, tol: f64) -> CanalResult<Vec<RootBox>> {
        Ok(isolate_common_roots(&self.p, &self.q, tol)?)
    }
}

/// A Bezier canal surface whose radius interpolates linearly in arc length -
/// the representation the self-intersection algebra operates on.
///
/// Wraps a [`BezierCanal`] with a [`LinearRadius`] profile and the shared
/// per-degree coefficient table.
///
/// # Example
///
/// ```
/// use mesh_canal::LinearCanal;
/// use nalgebra::Point3;
///
/// let canal = LinearCanal::from_control_points(
///     &[
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 2.0, 0.0),
///         Point3::new(3.0, 2.0, 0.0),
///         Point3::new(4.0, 0.0, 0.0),
///     ],
///     0.25,
///     0.5,
/// )?;
///
/// assert_eq!(canal.radii(), (0.25, 0.5));
/// assert_eq!(canal.max_radius(), 0.5);
/// # Ok::<(), mesh_canal::CanalError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LinearCanal {
    canal: BezierCanal<LinearRadius>,
    table: Arc<GTable>,
}

impl LinearCanal {
    /// Create a linear-radius canal over a Bezier spine.
    #[must_use]
    pub fn new(spine: BezierSpine, r0: f64, r1: f64) -> Self {
        let table = g_table(spine.degree());
        Self {
            canal: BezierCanal::new(spine, LinearRadius::new(r0, r1)),
            table,
        }
    }

    /// Create a canal from spine control points and two end radii.
    ///
    /// # Errors
    ///
    /// Propagates spine construction errors (fewer than two control points).
    pub fn from_control_points(points: &[Point3<f64>], r0: f64, r1: f64) -> CanalResult<Self> {
        let spine = BezierSpine::from_control_points(points)?;
        Ok(Self::new(spine, r0, r1))
    }

    /// The wrapped Bezier canal (bounding box, render-vector check, mesh
    /// generation).
    #[inline]
    #[must_use]
    pub fn canal(&self) -> &BezierCanal<LinearRadius> {
        &self.canal
    }

    /// Mutable access to the wrapped canal (bounding-box updates).
    #[inline]
    #[must_use]
    pub fn canal_mut(&mut self) -> &mut BezierCanal<LinearRadius> {
        &mut self.canal
    }

    /// The Bezier spine.
    #[inline]
    #[must_use]
    pub fn spine(&self) -> &BezierSpine {
        self.canal.spine()
    }

    /// The end radii `(r0, r1)`.
    #[must_use]
    pub fn radii(&self) -> (f64, f64) {
        self.canal.radius_profile().radii()
    }

    /// The smaller end radius.
    #[must_use]
    pub fn min_radius(&self) -> f64 {
        self.canal.radius_profile().min_radius(self.spine())
    }

    /// The larger end radius.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.canal.radius_profile().max_radius(self.spine())
    }

    /// Restrict the canal to `[t0, t1]`; the degree (and thus the shared
    /// table) is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::MalformedInterval`] if `t0 > t1`.
    pub fn clip_to_interval(&mut self, t0: f64, t1: f64) -> CanalResult<()> {
        self.canal.clip_to_interval(t0, t1)
    }

    /// The spine regularity polynomial `|gamma'|^2`.
    #[must_use]
    pub fn regularity_poly(&self) -> BernsteinPoly {
        self.spine().regularity_poly()
    }

    /// Stationary points of the distance from the spine to a fixed point;
    /// see [`BezierSpine::stationary_distance_poly`].
    #[must_use]
    pub fn stationary_distance_poly(&self, point: &Point3<f64>) -> BernsteinPoly {
        self.spine().stationary_distance_poly(point)
    }

    /// The local self-intersection polynomial
    /// `r_max^2 |gamma' x gamma''|^2 - |gamma'|^6`.
    ///
    /// Where it is positive, the maximal radius exceeds the spine's radius
    /// of curvature and neighbouring rings interpenetrate. Non-positivity on
    /// [0, 1] is necessary (not sufficient) for the tube to be free of
    /// self-overlap; the global system covers distant-pair overlap.
    #[must_use]
    pub fn local_self_intersection_poly(&self) -> BernsteinPoly {
        let r_max = self.max_radius();
        let spine = self.spine();
        let d = spine.derivative();
        let d2 = d.derivative();
        let dg = d.components();
        let d2g = d2.components();

        // Components of gamma' x gamma''; each distinct product appears in
        // exactly one summand.
        let cross = [
            dg[1].multiply(&d2g[2]) - dg[2].multiply(&d2g[1]),
            dg[2].multiply(&d2g[0]) - dg[0].multiply(&d2g[2]),
            dg[0].multiply(&d2g[1]) - dg[1].multiply(&d2g[0]),
        ];
        let cross_sq =
            (cross[0].square() + cross[1].square() + cross[2].square()) * (r_max * r_max);

        let speed_sq = dg[0].square() + dg[1].square() + dg[2].square();
        let speed_sixth = speed_sq.multiply(&speed_sq).multiply(&speed_sq);

        // cross_sq lives two derivative-degrees below speed_sixth; elevate
        // before subtracting.
        cross_sq.elevated(6 * spine.derivative_degree()) - speed_sixth
    }

    /// Certify that the tube is free of *local* self-intersection.
    ///
    /// Checks that the local self-intersection polynomial is non-positive on
    /// [0, 1] via root isolation plus evaluation at the boundary and in the
    /// gaps between roots (the sign is constant there).
    #[must_use]
    pub fn local_self_intersection_check(&self, tol: f64) -> Certificate {
        let p_lsi = self.local_self_intersection_poly();

        let max_coeff = p_lsi
            .coeffs()
            .iter()
            .fold(f64::NEG_INFINITY, |m, c| m.max(*c));
        if max_coeff <= 0.0 {
            // The coefficient hull already certifies non-positivity.
            return Certificate::Clear;
        }

        let scale = p_lsi.coeffs().iter().fold(0.0_f64, |m, c| m.max(c.abs()));
        let threshold = 1e-12 * (1.0 + scale);

        if p_lsi.eval(0.0) > threshold || p_lsi.eval(1.0) > threshold {
            return Certificate::Violated;
        }

        let roots = match isolate_roots(&p_lsi, 0.0, 1.0, tol) {
            Ok(roots) => roots,
            Err(_) => return Certificate::Inconclusive,
        };

        // Stations: domain ends plus every bracket end; the polynomial has
        // one sign per gap.
        let mut stations = vec![0.0];
        for root in &roots {
            stations.push(root.lo);
            stations.push(root.hi);
        }
        stations.push(1.0);

        for pair in stations.windows(2) {
            let mid = 0.5 * (pair[0] + pair[1]);
            if p_lsi.eval(mid) > threshold {
                return Certificate::Violated;
            }
        }
        Certificate::Clear
    }

    /// Build the global self-intersection system for this tube.
    ///
    /// The distance vector between `gamma(x)` and `gamma(y)` vanishes
    /// identically on the diagonal; the shared coefficient table divides that
    /// trivial factor out, leaving `p` and `q` whose common roots are the
    /// genuine stationary pairs.
    #[must_use]
    pub fn self_intersection_system(&self) -> SelfIntersectionSystem {
        let spine = self.spine();
        let n = spine.degree();
        let gamma = spine.components();
        let d = spine.derivative();
        let dgamma = d.components();

        debug!(degree = n, "building global self-intersection system");

        // Non-trivial distance vector, one bivariate polynomial per
        // coordinate, as the table-weighted sum of spine coefficients.
        let mut dist_nt =
            [(); 3].map(|()| BiBernsteinPoly::zero(2 * n - 1, 2 * n - 1));
        for i in 0..=n {
            for j in 0..=n {
                let g = self.table.get(i, j);
                for (axis, dist) in dist_nt.iter_mut().enumerate() {
                    *dist = &*dist + &(g * gamma[axis].coeff(i));
                }
            }
        }

        // Project onto the tangent at x and at y.
        let mut p = BiBernsteinPoly::zero(0, 0);
        let mut q = BiBernsteinPoly::zero(0, 0);
        for axis in 0..3 {
            p = p + dist_nt[axis].multiply(&BiBernsteinPoly::from_x(&dgamma[axis], 0));
            q = q + dist_nt[axis].multiply(&BiBernsteinPoly::from_y(&dgamma[axis], 0));
        }

        // Two non-redundant boundary edges: distance from gamma(0) and from
        // gamma(1), each weighted by the tangent.
        let corner0 = spine.point_at(0.0);
        let corner1 = spine.point_at(1.0);
        let mut edge_t0 = BernsteinPoly::zero();
        let mut edge_t1 = BernsteinPoly::zero();
        for axis in 0..3 {
            let from0 = &gamma[axis] - &BernsteinPoly::constant(corner0[axis], n);
            let from1 = &gamma[axis] - &BernsteinPoly::constant(corner1[axis], n);
            edge_t0 = edge_t0 + dgamma[axis].multiply(&from0);
            edge_t1 = edge_t1 + dgamma[axis].multiply(&from1);
        }

        SelfIntersectionSystem {
            p,
            q,
            edge_t0,
            edge_t1,
        }
    }

    /// Build the intersection system for this tube (`gamma`, parameter `x`)
    /// against another (`delta`, parameter `y`).
    ///
    /// Two independent curves have no trivial diagonal, so the raw
    /// coefficient-difference distance vector is used directly.
    ///
    /// # Errors
    ///
    /// Returns [`CanalError::DegreeMismatch`] when the spine degrees differ.
    pub fn pair_intersection_system(&self, other: &Self) -> CanalResult<PairIntersectionSystem> {
        let n = self.spine().degree();
        if other.spine().degree() != n {
            return Err(CanalError::DegreeMismatch {
                left: n,
                right: other.spine().degree(),
            });
        }

        let gamma = self.spine().components();
        let delta = other.spine().components();
        let dg = self.spine().derivative();
        let dd = other.spine().derivative();
        let dgamma = dg.components();
        let ddelta = dd.components();

        debug!(degree = n, "building pair intersection system");

        // Distance vector in bidegree (n, n): coefficient (i, j) is the
        // difference of the i-th gamma and j-th delta control coordinates.
        let dist: [BiBernsteinPoly; 3] = [0, 1, 2].map(|axis| {
            BiBernsteinPoly::new(DMatrix::from_fn(n + 1, n + 1, |i, j| {
                gamma[axis].coeff(i) - delta[axis].coeff(j)
            }))
        });

        let mut p = BiBernsteinPoly::zero(0, 0);
        let mut q = BiBernsteinPoly::zero(0, 0);
        for axis in 0..3 {
            p = p + dist[axis].multiply(&BiBernsteinPoly::from_x(&dgamma[axis], 0));
            q = q + dist[axis].multiply(&BiBernsteinPoly::from_y(&ddelta[axis], 0));
        }

        // All four boundary edges: stationary points of the distance from
        // each curve to the other's endpoints.
        let gamma0 = self.spine().point_at(0.0);
        let gamma1 = self.spine().point_at(1.0);
        let delta0 = other.spine().point_at(0.0);
        let delta1 = other.spine().point_at(1.0);

        let edge = |curve: &[BernsteinPoly; 3],
                    dcurve: &[BernsteinPoly; 3],
                    corner: Point3<f64>|
         -> BernsteinPoly {
            let mut acc = BernsteinPoly::zero();
            for axis in 0..3 {
                let offset = &curve[axis] - &BernsteinPoly::constant(corner[axis], n);
                acc = acc + dcurve[axis].multiply(&offset);
            }
            acc
        };

        Ok(PairIntersectionSystem {
            p,
            q,
            edge_x0: edge(delta, ddelta, gamma0),
            edge_x1: edge(delta, ddelta, gamma1),
            edge_y0: edge(gamma, dgamma, delta0),
            edge_y1: edge(gamma, dgamma, delta1),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wiggle_canal() -> LinearCanal {
        LinearCanal::from_control_points(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 2.0, 0.5),
                Point3::new(3.0, -1.0, 1.0),
                Point3::new(4.0, 0.0, 0.0),
            ],
            0.3,
            0.6,
        )
        .unwrap()
    }

    /// Parabola spine `(2t - 1, (2t - 1)^2, 0)` with peak curvature 2 at
    /// the vertex.
    fn parabola_canal(r: f64) -> LinearCanal {
        LinearCanal::from_control_points(
            &[
                Point3::new(-1.0, 1.0, 0.0),
                Point3::new(0.0, -1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            r,
            r,
        )
        .unwrap()
    }

    #[test]
    fn table_is_shared_per_degree() {
        let a = wiggle_canal();
        let b = wiggle_canal();
        assert!(Arc::ptr_eq(&a.table, &b.table));

        let c = parabola_canal(0.1);
        assert!(!Arc::ptr_eq(&a.table, &c.table));
    }

    #[test]
    fn g_table_rows_sum_to_difference_quotient() {
        // sum_ij G_ij gamma_i must equal (gamma(x) - gamma(y)) / (x - y);
        // this is the "every cross term exactly once" property.
        let canal = wiggle_canal();
        let system = canal.self_intersection_system();
        let spine = canal.spine();

        for (x, y) in [(0.1, 0.8), (0.3, 0.9), (0.7, 0.2), (0.55, 0.1)] {
            let gx = spine.point_at(x);
            let gy = spine.point_at(y);
            let dx = spine.derivative_at(x);
            let dy = spine.derivative_at(y);
            let expected_p = ((gx - gy) / (x - y)).dot(&dx);
            let expected_q = ((gx - gy) / (x - y)).dot(&dy);
            assert_relative_eq!(system.p.eval(x, y), expected_p, epsilon = 1e-8);
            assert_relative_eq!(system.q.eval(x, y), expected_q, epsilon = 1e-8);
        }
    }

    #[test]
    fn system_degrees_follow_spine_degree() {
        let canal = wiggle_canal();
        let n = canal.spine().degree();
        let d = canal.spine().derivative_degree();
        let system = canal.self_intersection_system();

        assert_eq!(system.p.deg_x(), 2 * n - 1 + d);
        assert_eq!(system.p.deg_y(), 2 * n - 1);
        assert_eq!(system.q.deg_x(), 2 * n - 1);
        assert_eq!(system.q.deg_y(), 2 * n - 1 + d);
        assert_eq!(system.edge_t0.degree(), n + d);
        assert_eq!(system.edge_t1.degree(), n + d);
    }

    #[test]
    fn edge_polynomials_match_direct_evaluation() {
        let canal = wiggle_canal();
        let system = canal.self_intersection_system();
        let spine = canal.spine();
        let g0 = spine.point_at(0.0);
        let g1 = spine.point_at(1.0);

        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let d = spine.derivative_at(t);
            let g = spine.point_at(t);
            assert_relative_eq!(system.edge_t0.eval(t), d.dot(&(g - g0)), epsilon = 1e-8);
            assert_relative_eq!(system.edge_t1.eval(t), d.dot(&(g - g1)), epsilon = 1e-8);
        }
    }

    #[test]
    fn scaling_control_points_scales_system_quadratically() {
        let canal = wiggle_canal();
        let scale = 2.5;
        let scaled_points: Vec<Point3<f64>> = canal
            .spine()
            .control_points()
            .iter()
            .map(|p| Point3::from(p.coords * scale))
            .collect();
        let scaled = LinearCanal::from_control_points(&scaled_points, 0.3, 0.6).unwrap();

        let base = canal.self_intersection_system();
        let big = scaled.self_intersection_system();

        // dist_nt and the tangent each scale linearly, so p and q scale by
        // the square.
        for (x, y) in [(0.2, 0.6), (0.4, 0.9), (0.8, 0.1)] {
            assert_relative_eq!(
                big.p.eval(x, y),
                scale * scale * base.p.eval(x, y),
                epsilon = 1e-8
            );
            assert_relative_eq!(
                big.q.eval(x, y),
                scale * scale * base.q.eval(x, y),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn local_check_clear_for_straight_tube() {
        let canal = LinearCanal::from_control_points(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
            ],
            0.5,
            1.0,
        )
        .unwrap();

        // A straight spine has zero curvature: p_lsi = -|gamma'|^6 < 0.
        assert_eq!(
            canal.local_self_intersection_check(1e-6),
            Certificate::Clear
        );
    }

    #[test]
    fn local_check_depends_on_radius_versus_curvature() {
        // Peak curvature 2: radii above 0.5 violate, below stay clear.
        let thin = parabola_canal(0.1);
        assert_eq!(thin.local_self_intersection_check(1e-6), Certificate::Clear);

        let fat = parabola_canal(1.0);
        assert_eq!(
            fat.local_self_intersection_check(1e-6),
            Certificate::Violated
        );
    }

    #[test]
    fn local_poly_degrees() {
        let canal = wiggle_canal();
        let p_lsi = canal.local_self_intersection_poly();
        assert_eq!(p_lsi.degree(), 6 * canal.spine().derivative_degree());
    }

    #[test]
    fn local_poly_matches_direct_formula() {
        let canal = wiggle_canal();
        let p_lsi = canal.local_self_intersection_poly();
        let spine = canal.spine();
        let r_max = canal.max_radius();

        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let d1 = spine.derivative_at(t);
            let d2 = spine.second_derivative_at(t);
            let expected =
                r_max * r_max * d1.cross(&d2).norm_squared() - d1.norm_squared().powi(3);
            assert_relative_eq!(p_lsi.eval(t), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn pair_system_requires_matching_degrees() {
        let cubic = wiggle_canal();
        let quadratic = parabola_canal(0.2);
        let err = cubic.pair_intersection_system(&quadratic).unwrap_err();
        assert!(matches!(err, CanalError::DegreeMismatch { .. }));
    }

    #[test]
    fn pair_system_matches_direct_evaluation() {
        let gamma = wiggle_canal();
        let delta = LinearCanal::from_control_points(
            &[
                Point3::new(0.0, 3.0, 0.0),
                Point3::new(1.0, 4.0, 1.0),
                Point3::new(2.0, 5.0, 0.5),
                Point3::new(3.0, 3.0, 0.0),
            ],
            0.2,
            0.2,
        )
        .unwrap();

        let system = gamma.pair_intersection_system(&delta).unwrap();
        for (x, y) in [(0.0, 0.5), (0.3, 0.7), (1.0, 0.2), (0.6, 0.6)] {
            let diff = gamma.spine().point_at(x) - delta.spine().point_at(y);
            assert_relative_eq!(
                system.p.eval(x, y),
                diff.dot(&gamma.spine().derivative_at(x)),
                epsilon = 1e-8
            );
            assert_relative_eq!(
                system.q.eval(x, y),
                diff.dot(&delta.spine().derivative_at(y)),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn clipping_preserves_the_shared_table() {
        let mut canal = wiggle_canal();
        let table = Arc::clone(&canal.table);
        canal.clip_to_interval(0.2, 0.9).unwrap();
        assert!(Arc::ptr_eq(&canal.table, &table));
        assert_eq!(canal.spine().degree(), 3);
    }
}
