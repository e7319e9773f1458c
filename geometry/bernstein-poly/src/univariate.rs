//! Univariate polynomials in the Bernstein basis.

use std::ops::{Add, Mul, Neg, Sub};

use crate::binomial::binomial;

/// A univariate polynomial represented in the Bernstein basis on [0, 1].
///
/// A polynomial of degree `n` stores `n + 1` coefficients, one per basis
/// polynomial `B_i^n(t) = C(n, i) t^i (1 - t)^(n - i)`. The degree is a
/// runtime property of the coefficient vector.
///
/// Arithmetic between polynomials of different degrees elevates the
/// lower-degree operand first, so `Add`/`Sub` are total.
///
/// # Example
///
/// ```
/// use bernstein_poly::BernsteinPoly;
///
/// // t^2 in Bernstein form
/// let p = BernsteinPoly::from_power_basis(&[0.0, 0.0, 1.0]);
/// assert!((p.eval(0.5) - 0.25).abs() < 1e-12);
/// assert_eq!(p.degree(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BernsteinPoly {
    coeffs: Vec<f64>,
}

impl BernsteinPoly {
    /// Create a polynomial from Bernstein coefficients.
    ///
    /// The degree is `coeffs.len() - 1`.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is empty.
    #[must_use]
    pub fn new(coeffs: Vec<f64>) -> Self {
        assert!(
            !coeffs.is_empty(),
            "BernsteinPoly requires at least one coefficient"
        );
        Self { coeffs }
    }

    /// The constant polynomial `value` represented at the given degree.
    ///
    /// All Bernstein coefficients of a constant are the constant itself,
    /// since the basis forms a partition of unity.
    #[must_use]
    pub fn constant(value: f64, degree: usize) -> Self {
        Self {
            coeffs: vec![value; degree + 1],
        }
    }

    /// The zero polynomial of degree 0.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// The `i`-th Bernstein basis polynomial `B_i^n`.
    ///
    /// # Panics
    ///
    /// Panics if `i > degree`.
    #[must_use]
    pub fn basis(degree: usize, i: usize) -> Self {
        assert!(i <= degree, "basis index {i} out of range for degree {degree}");
        let mut coeffs = vec![0.0; degree + 1];
        coeffs[i] = 1.0;
        Self { coeffs }
    }

    /// Polynomial degree (number of coefficients minus one).
    #[inline]
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Bernstein coefficients.
    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The `i`-th Bernstein coefficient.
    #[inline]
    #[must_use]
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs[i]
    }

    /// Check whether every coefficient is within `eps` of zero.
    ///
    /// By the convex-hull property this certifies `|p(t)| <= eps` on [0, 1].
    #[must_use]
    pub fn is_zero(&self, eps: f64) -> bool {
        self.coeffs.iter().all(|c| c.abs() <= eps)
    }

    /// Evaluate at `t` by the de Casteljau recurrence.
    ///
    /// Numerically stable for `t` in [0, 1]; valid (as polynomial
    /// extrapolation) outside it.
    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        let mut scratch = self.coeffs.clone();
        let n = scratch.len();
        for level in 1..n {
            for i in 0..n - level {
                scratch[i] = (1.0 - t) * scratch[i] + t * scratch[i + 1];
            }
        }
        scratch[0]
    }

    /// The derivative polynomial, of degree `n - 1`.
    ///
    /// The derivative of a degree-0 polynomial is the zero polynomial.
    #[must_use]
    pub fn derivative(&self) -> Self {
        let n = self.degree();
        if n == 0 {
            return Self::zero();
        }
        let scale = n as f64;
        let coeffs = self
            .coeffs
            .windows(2)
            .map(|w| scale * (w[1] - w[0]))
            .collect();
        Self { coeffs }
    }

    /// Multiply two Bernstein polynomials.
    ///
    /// The product of degrees `m` and `n` has degree `m + n` with
    /// coefficients
    /// `h_k = sum_i C(m, i) C(n, k - i) / C(m + n, k) * f_i * g_(k - i)`.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let m = self.degree();
        let n = other.degree();
        let mut coeffs = vec![0.0; m + n + 1];

        for (k, c) in coeffs.iter_mut().enumerate() {
            let lo = k.saturating_sub(n);
            let hi = k.min(m);
            let mut acc = 0.0;
            for i in lo..=hi {
                acc += binomial(m, i) * binomial(n, k - i) * self.coeffs[i] * other.coeffs[k - i];
            }
            *c = acc / binomial(m + n, k);
        }
        Self { coeffs }
    }

    /// The square of the polynomial.
    #[must_use]
    pub fn square(&self) -> Self {
        self.multiply(self)
    }

    /// Elevate to the given (equal or higher) degree without changing the
    /// polynomial.
    ///
    /// # Panics
    ///
    /// Panics if `target < self.degree()`.
    #[must_use]
    pub fn elevated(&self, target: usize) -> Self {
        let n = self.degree();
        assert!(
            target >= n,
            "cannot elevate degree {n} polynomial down to {target}"
        );
        if target == n {
            return self.clone();
        }
        let r = target - n;
        let mut coeffs = vec![0.0; target + 1];
        for (k, c) in coeffs.iter_mut().enumerate() {
            let lo = k.saturating_sub(r);
            let hi = k.min(n);
            let mut acc = 0.0;
            for i in lo..=hi {
                acc += binomial(n, i) * binomial(r, k - i) * self.coeffs[i];
            }
            *c = acc / binomial(target, k);
        }
        Self { coeffs }
    }

    /// Split at parameter `t` into the restrictions to [0, t] and [t, 1],
    /// each reparametrized over [0, 1] (de Casteljau subdivision).
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let n = self.coeffs.len();
        let mut scratch = self.coeffs.clone();
        let mut left = Vec::with_capacity(n);
        let mut right = vec![0.0; n];

        left.push(scratch[0]);
        right[n - 1] = scratch[n - 1];
        for level in 1..n {
            for i in 0..n - level {
                scratch[i] = (1.0 - t) * scratch[i] + t * scratch[i + 1];
            }
            left.push(scratch[0]);
            right[n - 1 - level] = scratch[n - 1 - level];
        }
        (Self { coeffs: left }, Self { coeffs: right })
    }

    /// Restrict to the subinterval [a, b] of [0, 1], reparametrized over
    /// [0, 1].
    #[must_use]
    pub fn clipped(&self, a: f64, b: f64) -> Self {
        let (_, right) = self.split(a);
        if (1.0 - a).abs() < f64::EPSILON {
            return right;
        }
        let local = (b - a) / (1.0 - a);
        let (left, _) = right.split(local);
        left
    }

    /// Convert to power-basis coefficients `a_0 + a_1 t + ... + a_n t^n`.
    #[must_use]
    pub fn to_power_basis(&self) -> Vec<f64> {
        let n = self.degree();
        let mut power = vec![0.0; n + 1];
        // B_i^n(t) = sum_k (-1)^(k - i) C(n, i) C(n - i, k - i) t^k
        for (i, &c) in self.coeffs.iter().enumerate() {
            for k in i..=n {
                let sign = if (k - i) % 2 == 0 { 1.0 } else { -1.0 };
                power[k] += c * sign * binomial(n, i) * binomial(n - i, k - i);
            }
        }
        power
    }

    /// Build a polynomial from power-basis coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `power` is empty.
    #[must_use]
    pub fn from_power_basis(power: &[f64]) -> Self {
        assert!(!power.is_empty(), "power basis requires coefficients");
        let n = power.len() - 1;
        // t^k = sum_(i >= k) C(i, k) / C(n, k) B_i^n(t)
        let coeffs = (0..=n)
            .map(|i| {
                (0..=i)
                    .map(|k| power[k] * binomial(i, k) / binomial(n, k))
                    .sum()
            })
            .collect();
        Self { coeffs }
    }

    fn matched(&self, other: &Self) -> (Self, Self) {
        let target = self.degree().max(other.degree());
        (self.elevated(target), other.elevated(target))
    }
}

impl Add for &BernsteinPoly {
    type Output = BernsteinPoly;

    fn add(self, rhs: Self) -> BernsteinPoly {
        let (mut a, b) = self.matched(rhs);
        for (c, d) in a.coeffs.iter_mut().zip(&b.coeffs) {
            *c += d;
        }
        a
    }
}

impl Add for BernsteinPoly {
    type Output = BernsteinPoly;

    fn add(self, rhs: Self) -> BernsteinPoly {
        &self + &rhs
    }
}

impl Sub for &BernsteinPoly {
    type Output = BernsteinPoly;

    fn sub(self, rhs: Self) -> BernsteinPoly {
        let (mut a, b) = self.matched(rhs);
        for (c, d) in a.coeffs.iter_mut().zip(&b.coeffs) {
            *c -= d;
        }
        a
    }
}

impl Sub for BernsteinPoly {
    type Output = BernsteinPoly;

    fn sub(self, rhs: Self) -> BernsteinPoly {
        &self - &rhs
    }
}

impl Mul<f64> for &BernsteinPoly {
    type Output = BernsteinPoly;

    fn mul(self, rhs: f64) -> BernsteinPoly {
        BernsteinPoly {
            coeffs: self.coeffs.iter().map(|c| c * rhs).collect(),
        }
    }
}

impl Mul<f64> for BernsteinPoly {
    type Output = BernsteinPoly;

    fn mul(self, rhs: f64) -> BernsteinPoly {
        &self * rhs
    }
}

impl Neg for &BernsteinPoly {
    type Output = BernsteinPoly;

    fn neg(self) -> BernsteinPoly {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_ts() -> impl Iterator<Item = f64> {
        (0..=10).map(|i| i as f64 / 10.0)
    }

    #[test]
    fn constant_evaluates_to_itself() {
        let p = BernsteinPoly::constant(3.5, 4);
        for t in sample_ts() {
            assert_relative_eq!(p.eval(t), 3.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn basis_partition_of_unity() {
        let n = 5;
        for t in sample_ts() {
            let sum: f64 = (0..=n).map(|i| BernsteinPoly::basis(n, i).eval(t)).sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn power_basis_round_trip() {
        let power = [1.0, -2.0, 0.5, 3.0];
        let p = BernsteinPoly::from_power_basis(&power);
        assert_eq!(p.degree(), 3);

        for t in sample_ts() {
            let direct = power[0] + power[1] * t + power[2] * t * t + power[3] * t * t * t;
            assert_relative_eq!(p.eval(t), direct, epsilon = 1e-10);
        }

        let back = p.to_power_basis();
        for (a, b) in power.iter().zip(&back) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let p = BernsteinPoly::from_power_basis(&[0.3, 1.0, -2.0, 0.7]);
        let dp = p.derivative();
        assert_eq!(dp.degree(), 2);

        let h = 1e-6;
        for i in 1..10 {
            let t = i as f64 / 10.0;
            let fd = (p.eval(t + h) - p.eval(t - h)) / (2.0 * h);
            assert_relative_eq!(dp.eval(t), fd, epsilon = 1e-6);
        }
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        let p = BernsteinPoly::constant(7.0, 0);
        let dp = p.derivative();
        assert!(dp.is_zero(0.0));
    }

    #[test]
    fn multiply_matches_pointwise_product() {
        let p = BernsteinPoly::from_power_basis(&[1.0, 2.0, 1.0]);
        let q = BernsteinPoly::from_power_basis(&[-0.5, 1.0]);
        let pq = p.multiply(&q);
        assert_eq!(pq.degree(), 3);

        for t in sample_ts() {
            assert_relative_eq!(pq.eval(t), p.eval(t) * q.eval(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn elevation_preserves_values() {
        let p = BernsteinPoly::from_power_basis(&[0.2, -1.0, 3.0]);
        let q = p.elevated(6);
        assert_eq!(q.degree(), 6);
        for t in sample_ts() {
            assert_relative_eq!(p.eval(t), q.eval(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn add_with_mismatched_degrees() {
        let p = BernsteinPoly::from_power_basis(&[1.0, 1.0]);
        let q = BernsteinPoly::from_power_basis(&[0.0, 0.0, 2.0]);
        let sum = &p + &q;
        assert_eq!(sum.degree(), 2);
        for t in sample_ts() {
            assert_relative_eq!(sum.eval(t), p.eval(t) + q.eval(t), epsilon = 1e-10);
        }
    }

    #[test]
    fn split_preserves_values() {
        let p = BernsteinPoly::from_power_basis(&[0.5, -2.0, 1.0, 4.0]);
        let (left, right) = p.split(0.3);

        for t in sample_ts() {
            assert_relative_eq!(left.eval(t), p.eval(0.3 * t), epsilon = 1e-10);
            assert_relative_eq!(right.eval(t), p.eval(0.3 + 0.7 * t), epsilon = 1e-10);
        }
    }

    #[test]
    fn clip_to_subinterval() {
        let p = BernsteinPoly::from_power_basis(&[1.0, 0.0, -3.0, 2.0]);
        let clipped = p.clipped(0.2, 0.7);

        for t in sample_ts() {
            let global = 0.2 + 0.5 * t;
            assert_relative_eq!(clipped.eval(t), p.eval(global), epsilon = 1e-10);
        }
    }

    #[test]
    fn square_is_nonnegative() {
        let p = BernsteinPoly::from_power_basis(&[-1.0, 3.0, -2.0]);
        let sq = p.square();
        for t in sample_ts() {
            assert!(sq.eval(t) >= -1e-12);
            assert_relative_eq!(sq.eval(t), p.eval(t) * p.eval(t), epsilon = 1e-10);
        }
    }
}
