//! Bivariate tensor-product polynomials in the Bernstein basis.

use std::ops::{Add, Mul, Sub};

use nalgebra::DMatrix;

use crate::binomial::binomial;
use crate::univariate::BernsteinPoly;

/// A bivariate polynomial in the tensor-product Bernstein basis on the unit
/// square.
///
/// A polynomial of bidegree `(m, n)` stores an `(m + 1) x (n + 1)` coefficient
/// matrix; entry `(i, j)` multiplies `B_i^m(x) B_j^n(y)`.
///
/// As in the univariate case, mixed-bidegree arithmetic elevates the
/// lower-degree operand, and the coefficient matrix is a convex-hull bound on
/// the polynomial over the unit square - the property the common-root solver
/// relies on for pruning.
#[derive(Debug, Clone, PartialEq)]
pub struct BiBernsteinPoly {
    coeffs: DMatrix<f64>,
}

impl BiBernsteinPoly {
    /// Create a polynomial from a Bernstein coefficient matrix.
    ///
    /// Bidegree is `(nrows - 1, ncols - 1)`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has no rows or no columns.
    #[must_use]
    pub fn new(coeffs: DMatrix<f64>) -> Self {
        assert!(
            coeffs.nrows() > 0 && coeffs.ncols() > 0,
            "BiBernsteinPoly requires a non-empty coefficient matrix"
        );
        Self { coeffs }
    }

    /// The zero polynomial of the given bidegree.
    #[must_use]
    pub fn zero(deg_x: usize, deg_y: usize) -> Self {
        Self {
            coeffs: DMatrix::zeros(deg_x + 1, deg_y + 1),
        }
    }

    /// Degree in `x`.
    #[inline]
    #[must_use]
    pub fn deg_x(&self) -> usize {
        self.coeffs.nrows() - 1
    }

    /// Degree in `y`.
    #[inline]
    #[must_use]
    pub fn deg_y(&self) -> usize {
        self.coeffs.ncols() - 1
    }

    /// Coefficient at `(i, j)`.
    #[inline]
    #[must_use]
    pub fn coeff(&self, i: usize, j: usize) -> f64 {
        self.coeffs[(i, j)]
    }

    /// The coefficient matrix.
    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> &DMatrix<f64> {
        &self.coeffs
    }

    /// Embed a univariate polynomial in `x` at bidegree
    /// `(p.degree(), deg_y)`, constant in `y`.
    ///
    /// Since the Bernstein basis in `y` sums to one, every column repeats the
    /// univariate coefficients.
    #[must_use]
    pub fn from_x(p: &BernsteinPoly, deg_y: usize) -> Self {
        let m = p.degree();
        Self {
            coeffs: DMatrix::from_fn(m + 1, deg_y + 1, |i, _| p.coeff(i)),
        }
    }

    /// Embed a univariate polynomial in `y` at bidegree
    /// `(deg_x, p.degree())`, constant in `x`.
    #[must_use]
    pub fn from_y(p: &BernsteinPoly, deg_x: usize) -> Self {
        let n = p.degree();
        Self {
            coeffs: DMatrix::from_fn(deg_x + 1, n + 1, |_, j| p.coeff(j)),
        }
    }

    /// Evaluate at `(x, y)` by row-wise then column-wise de Casteljau.
    #[must_use]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        let rows = self.coeffs.nrows();
        let column: Vec<f64> = (0..rows)
            .map(|i| {
                let row: Vec<f64> = self.coeffs.row(i).iter().copied().collect();
                BernsteinPoly::new(row).eval(y)
            })
            .collect();
        BernsteinPoly::new(column).eval(x)
    }

    /// Multiply two bivariate polynomials; bidegrees add.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let (m1, n1) = (self.deg_x(), self.deg_y());
        let (m2, n2) = (other.deg_x(), other.deg_y());
        let mut coeffs = DMatrix::zeros(m1 + m2 + 1, n1 + n2 + 1);

        for k in 0..=m1 + m2 {
            for l in 0..=n1 + n2 {
                let mut acc = 0.0;
                for i in k.saturating_sub(m2)..=k.min(m1) {
                    for j in l.saturating_sub(n2)..=l.min(n1) {
                        acc += binomial(m1, i)
                            * binomial(m2, k - i)
                            * binomial(n1, j)
                            * binomial(n2, l - j)
                            * self.coeffs[(i, j)]
                            * other.coeffs[(k - i, l - j)];
                    }
                }
                coeffs[(k, l)] = acc / (binomial(m1 + m2, k) * binomial(n1 + n2, l));
            }
        }
        Self { coeffs }
    }

    /// Elevate to the given bidegree without changing the polynomial.
    ///
    /// # Panics
    ///
    /// Panics if a target degree is below the current one.
    #[must_use]
    pub fn elevated(&self, target_x: usize, target_y: usize) -> Self {
        let (m, n) = (self.deg_x(), self.deg_y());
        assert!(
            target_x >= m && target_y >= n,
            "cannot elevate bidegree ({m}, {n}) down to ({target_x}, {target_y})"
        );
        if target_x == m && target_y == n {
            return self.clone();
        }

        // Elevate along y (each row), then along x (each column).
        let mut rows_elevated = DMatrix::zeros(m + 1, target_y + 1);
        for i in 0..=m {
            let row: Vec<f64> = self.coeffs.row(i).iter().copied().collect();
            let elevated = BernsteinPoly::new(row).elevated(target_y);
            for (j, c) in elevated.coeffs().iter().enumerate() {
                rows_elevated[(i, j)] = *c;
            }
        }

        let mut coeffs = DMatrix::zeros(target_x + 1, target_y + 1);
        for j in 0..=target_y {
            let col: Vec<f64> = rows_elevated.column(j).iter().copied().collect();
            let elevated = BernsteinPoly::new(col).elevated(target_x);
            for (i, c) in elevated.coeffs().iter().enumerate() {
                coeffs[(i, j)] = *c;
            }
        }
        Self { coeffs }
    }

    /// Build a polynomial from power-basis coefficients `a_(k,l)` of
    /// `x^k y^l`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has no rows or no columns.
    #[must_use]
    pub fn from_power_basis(power: &DMatrix<f64>) -> Self {
        assert!(
            power.nrows() > 0 && power.ncols() > 0,
            "power basis requires a non-empty coefficient matrix"
        );
        let m = power.nrows() - 1;
        let n = power.ncols() - 1;
        let coeffs = DMatrix::from_fn(m + 1, n + 1, |i, j| {
            let mut acc = 0.0;
            for k in 0..=i {
                for l in 0..=j {
                    acc += power[(k, l)] * binomial(i, k) * binomial(j, l)
                        / (binomial(m, k) * binomial(n, l));
                }
            }
            acc
        });
        Self { coeffs }
    }

    /// Minimum and maximum coefficient.
    ///
    /// By the convex-hull property these bound the polynomial on the unit
    /// square.
    #[must_use]
    pub fn coeff_range(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for c in self.coeffs.iter() {
            min = min.min(*c);
            max = max.max(*c);
        }
        (min, max)
    }

    /// Split along `x` at parameter `t` (each column subdivided).
    #[must_use]
    pub fn split_x(&self, t: f64) -> (Self, Self) {
        let rows = self.coeffs.nrows();
        let cols = self.coeffs.ncols();
        let mut left = DMatrix::zeros(rows, cols);
        let mut right = DMatrix::zeros(rows, cols);
        for j in 0..cols {
            let col: Vec<f64> = self.coeffs.column(j).iter().copied().collect();
            let (l, r) = BernsteinPoly::new(col).split(t);
            for i in 0..rows {
                left[(i, j)] = l.coeff(i);
                right[(i, j)] = r.coeff(i);
            }
        }
        (Self { coeffs: left }, Self { coeffs: right })
    }

    /// Split along `y` at parameter `t` (each row subdivided).
    #[must_use]
    pub fn split_y(&self, t: f64) -> (Self, Self) {
        let rows = self.coeffs.nrows();
        let cols = self.coeffs.ncols();
        let mut left = DMatrix::zeros(rows, cols);
        let mut right = DMatrix::zeros(rows, cols);
        for i in 0..rows {
            let row: Vec<f64> = self.coeffs.row(i).iter().copied().collect();
            let (l, r) = BernsteinPoly::new(row).split(t);
            for j in 0..cols {
                left[(i, j)] = l.coeff(j);
                right[(i, j)] = r.coeff(j);
            }
        }
        (Self { coeffs: left }, Self { coeffs: right })
    }

    fn matched(&self, other: &Self) -> (Self, Self) {
        let tx = self.deg_x().max(other.deg_x());
        let ty = self.deg_y().max(other.deg_y());
        (self.elevated(tx, ty), other.elevated(tx, ty))
    }
}

impl Add for &BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn add(self, rhs: Self) -> BiBernsteinPoly {
        let (mut a, b) = self.matched(rhs);
        a.coeffs += &b.coeffs;
        a
    }
}

impl Add for BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn add(self, rhs: Self) -> BiBernsteinPoly {
        &self + &rhs
    }
}

impl Sub for &BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn sub(self, rhs: Self) -> BiBernsteinPoly {
        let (mut a, b) = self.matched(rhs);
        a.coeffs -= &b.coeffs;
        a
    }
}

impl Sub for BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn sub(self, rhs: Self) -> BiBernsteinPoly {
        &self - &rhs
    }
}

impl Mul<f64> for &BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn mul(self, rhs: f64) -> BiBernsteinPoly {
        BiBernsteinPoly {
            coeffs: &self.coeffs * rhs,
        }
    }
}

impl Mul<f64> for BiBernsteinPoly {
    type Output = BiBernsteinPoly;

    fn mul(self, rhs: f64) -> BiBernsteinPoly {
        &self * rhs
    }
}
