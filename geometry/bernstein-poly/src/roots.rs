//! Root isolation by recursive subdivision (Bezier clipping).
//!
//! Both isolators rely on the convex-hull property of Bernstein
//! coefficients: a polynomial whose coefficients are all of one strict sign
//! cannot vanish on its domain, so the corresponding subinterval (or box) is
//! pruned. Regions that survive pruning are subdivided until they shrink to
//! the requested tolerance, at which point they are reported as root
//! brackets.
//!
//! Every root is contained in some reported bracket; when the subdivision
//! budget is exhausted before that guarantee can be given (clustered or
//! identically-vanishing polynomials), the isolators return
//! [`PolyError::Inconclusive`] / [`PolyError::DegenerateInput`] instead of a
//! truncated root set.

use crate::bivariate::BiBernsteinPoly;
use crate::error::PolyError;
use crate::univariate::BernsteinPoly;
use crate::Result;

/// Maximum subdivision depth for the univariate isolator.
const MAX_DEPTH: usize = 64;

/// Maximum subdivision depth for the bivariate solver.
const MAX_DEPTH_2D: usize = 40;

/// Tolerance below which a polynomial is considered identically zero.
const ZERO_EPS: f64 = 1e-14;

/// A closed interval bracketing a real root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
}

impl Interval {
    /// Create a new interval.
    #[must_use]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Interval midpoint, the usual root estimate.
    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Interval width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// An axis-aligned box bracketing a common root of a bivariate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootBox {
    /// Bracket in the first parameter.
    pub x: Interval,
    /// Bracket in the second parameter.
    pub y: Interval,
}

impl RootBox {
    /// Box center, the usual root estimate.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x.midpoint(), self.y.midpoint())
    }
}

/// Isolate all real roots of `p` within `[lo, hi]` (a subinterval of the
/// polynomial's [0, 1] domain) to the given tolerance.
///
/// Returns a sorted list of disjoint brackets, each of width at most `tol`
/// (adjacent brackets produced by a root on a subdivision boundary are
/// merged). Every real root of `p` in `[lo, hi]` lies in one of the
/// brackets.
///
/// # Errors
///
/// - [`PolyError::MalformedInterval`] if `lo > hi`
/// - [`PolyError::DegenerateInput`] if `p` vanishes identically
/// - [`PolyError::Inconclusive`] if the subdivision budget is exhausted
///   (clustered roots or near-degenerate input)
pub fn isolate_roots(p: &BernsteinPoly, lo: f64, hi: f64, tol: f64) -> Result<Vec<Interval>> {
    if lo > hi {
        return Err(PolyError::MalformedInterval { lo, hi });
    }
    if p.is_zero(ZERO_EPS) {
        return Err(PolyError::DegenerateInput);
    }

    let clipped = if lo == 0.0 && hi == 1.0 {
        p.clone()
    } else {
        p.clipped(lo, hi)
    };

    // Degree bounds the number of roots; anything beyond that (with slack for
    // boundary-straddling duplicates) indicates a near-vanishing stretch.
    let max_brackets = 8 * (p.degree() + 1);

    let mut brackets = Vec::new();
    subdivide(&clipped, lo, hi, tol, 0, max_brackets, &mut brackets)?;
    Ok(merge_adjacent(brackets))
}

fn subdivide(
    p: &BernsteinPoly,
    a: f64,
    b: f64,
    tol: f64,
    depth: usize,
    max_brackets: usize,
    out: &mut Vec<Interval>,
) -> Result<()> {
    let coeffs = p.coeffs();
    let min = coeffs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = coeffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Convex hull excludes zero: no root in [a, b].
    if min > 0.0 || max < 0.0 {
        return Ok(());
    }

    if b - a <= tol {
        if out.len() >= max_brackets {
            return Err(PolyError::inconclusive(
                "bracket count exceeds the degree bound",
                depth,
            ));
        }
        out.push(Interval::new(a, b));
        return Ok(());
    }

    if depth >= MAX_DEPTH {
        return Err(PolyError::inconclusive(
            format!("interval [{a}, {b}] not resolved at tolerance {tol}"),
            MAX_DEPTH,
        ));
    }

    let mid = 0.5 * (a + b);
    let (left, right) = p.split(0.5);
    subdivide(&left, a, mid, tol, depth + 1, max_brackets, out)?;
    subdivide(&right, mid, b, tol, depth + 1, max_brackets, out)
}

fn merge_adjacent(brackets: Vec<Interval>) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(brackets.len());
    for iv in brackets {
        match merged.last_mut() {
            Some(last) if iv.lo <= last.hi + f64::EPSILON => last.hi = iv.hi,
            _ => merged.push(iv),
        }
    }
    merged
}

/// Isolate the common roots of the bivariate pair `(p, q)` on the unit
/// square to the given tolerance.
///
/// Returns boxes of side at most `tol`; every common root lies in one of the
/// returned boxes (boxes produced by a root on a subdivision boundary are
/// merged).
///
/// # Errors
///
/// - [`PolyError::DegenerateInput`] if either polynomial vanishes identically
/// - [`PolyError::Inconclusive`] if the subdivision budget or the box budget
///   is exhausted, which happens when the solution set is not a finite set of
///   points (e.g. a shared zero curve)
pub fn isolate_common_roots(
    p: &BiBernsteinPoly,
    q: &BiBernsteinPoly,
    tol: f64,
) -> Result<Vec<RootBox>> {
    let p_range = p.coeff_range();
    let q_range = q.coeff_range();
    if (p_range.0.abs() <= ZERO_EPS && p_range.1.abs() <= ZERO_EPS)
        || (q_range.0.abs() <= ZERO_EPS && q_range.1.abs() <= ZERO_EPS)
    {
        return Err(PolyError::DegenerateInput);
    }

    let mut boxes = Vec::new();
    subdivide_2d(
        p,
        q,
        Interval::new(0.0, 1.0),
        Interval::new(0.0, 1.0),
        tol,
        0,
        &mut boxes,
    )?;
    Ok(merge_boxes(boxes))
}

/// Box budget for the bivariate solver. A system with finitely many common
/// roots produces a handful of boxes per root; blowing this budget means the
/// zero sets share a curve segment.
const MAX_BOXES: usize = 512;

fn subdivide_2d(
    p: &BiBernsteinPoly,
    q: &BiBernsteinPoly,
    x: Interval,
    y: Interval,
    tol: f64,
    depth: usize,
    out: &mut Vec<RootBox>,
) -> Result<()> {
    let (pmin, pmax) = p.coeff_range();
    if pmin > 0.0 || pmax < 0.0 {
        return Ok(());
    }
    let (qmin, qmax) = q.coeff_range();
    if qmin > 0.0 || qmax < 0.0 {
        return Ok(());
    }

    if x.width() <= tol && y.width() <= tol {
        if out.len() >= MAX_BOXES {
            return Err(PolyError::inconclusive(
                "common zero set is not a finite point set",
                depth,
            ));
        }
        out.push(RootBox { x, y });
        return Ok(());
    }

    if depth >= MAX_DEPTH_2D {
        return Err(PolyError::inconclusive(
            format!(
                "box [{}, {}] x [{}, {}] not resolved at tolerance {tol}",
                x.lo, x.hi, y.lo, y.hi
            ),
            MAX_DEPTH_2D,
        ));
    }

    let xm = x.midpoint();
    let ym = y.midpoint();
    let (px_lo, px_hi) = p.split_x(0.5);
    let (qx_lo, qx_hi) = q.split_x(0.5);

    let quadrants = [
        (px_lo.split_y(0.5), qx_lo.split_y(0.5), Interval::new(x.lo, xm)),
        (px_hi.split_y(0.5), qx_hi.split_y(0.5), Interval::new(xm, x.hi)),
    ];
    for (p_pair, q_pair, xi) in quadrants {
        subdivide_2d(
            &p_pair.0,
            &q_pair.0,
            xi,
            Interval::new(y.lo, ym),
            tol,
            depth + 1,
            out,
        )?;
        subdivide_2d(
            &p_pair.1,
            &q_pair.1,
            xi,
            Interval::new(ym, y.hi),
            tol,
            depth + 1,
            out,
        )?;
    }
    Ok(())
}

fn merge_boxes(boxes: Vec<RootBox>) -> Vec<RootBox> {
    let mut merged: Vec<RootBox> = Vec::with_capacity(boxes.len());
    'outer: for b in boxes {
        for m in &mut merged {
            let touch_x = b.x.lo <= m.x.hi + f64::EPSILON && m.x.lo <= b.x.hi + f64::EPSILON;
            let touch_y = b.y.lo <= m.y.hi + f64::EPSILON && m.y.lo <= b.y.hi + f64::EPSILON;
            if touch_x && touch_y {
                m.x.lo = m.x.lo.min(b.x.lo);
                m.x.hi = m.x.hi.max(b.x.hi);
                m.y.lo = m.y.lo.min(b.y.lo);
                m.y.hi = m.y.hi.max(b.y.hi);
                continue 'outer;
            }
        }
        merged.push(b);
    }
    merged
}
