//! Bernstein-basis polynomial algebra.
//!
//! This crate provides the polynomial machinery used by the canal-surface
//! crates: univariate and bivariate polynomials represented in the Bernstein
//! basis, conversion to and from the power basis, and certified root
//! isolation by recursive subdivision.
//!
//! # Types
//!
//! - [`BernsteinPoly`] - Univariate polynomial with runtime degree
//! - [`BiBernsteinPoly`] - Tensor-product bivariate polynomial
//! - [`Interval`] / [`RootBox`] - Root brackets returned by the isolators
//!
//! # Why Bernstein?
//!
//! Bernstein coefficients are convex-hull bounds on the polynomial over its
//! domain: if every coefficient is positive the polynomial is positive on
//! [0, 1]. Combined with de Casteljau subdivision this gives a simple,
//! certifiable root isolation scheme ([`isolate_roots`],
//! [`isolate_common_roots`]) that either brackets all real roots or reports
//! an explicit inconclusive outcome - it never silently drops roots.
//!
//! # Example
//!
//! ```
//! use bernstein_poly::{BernsteinPoly, isolate_roots};
//!
//! // (t - 0.25)(t - 0.75) expressed in the Bernstein basis
//! let p = BernsteinPoly::from_power_basis(&[0.1875, -1.0, 1.0]);
//!
//! let roots = isolate_roots(&p, 0.0, 1.0, 1e-9).unwrap();
//! assert_eq!(roots.len(), 2);
//! assert!((roots[0].midpoint() - 0.25).abs() < 1e-6);
//! assert!((roots[1].midpoint() - 0.75).abs() < 1e-6);
//! ```

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

mod binomial;
mod bivariate;
mod error;
mod roots;
mod univariate;

pub use binomial::binomial;
pub use bivariate::BiBernsteinPoly;
pub use error::PolyError;
pub use roots::{isolate_common_roots, isolate_roots, Interval, RootBox};
pub use univariate::BernsteinPoly;

/// Result type for polynomial operations.
pub type Result<T> = std::result::Result<T, PolyError>;
