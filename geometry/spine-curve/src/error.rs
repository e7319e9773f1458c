//! Error types for spine-curve operations.

use thiserror::Error;

/// Errors that can occur when constructing or manipulating spine curves.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpineError {
    /// Not enough control points to define a curve.
    #[error("spine curve needs at least {required} control points, got {actual}")]
    InsufficientControlPoints {
        /// Minimum required control points.
        required: usize,
        /// Actual number provided.
        actual: usize,
    },

    /// Component polynomials have different degrees.
    #[error("component degrees differ: x={x}, y={y}, z={z}")]
    ComponentDegreeMismatch {
        /// Degree of the x component.
        x: usize,
        /// Degree of the y component.
        y: usize,
        /// Degree of the z component.
        z: usize,
    },

    /// A clip interval with `t0 > t1` was supplied.
    #[error("malformed interval [{t0}, {t1}]: t0 exceeds t1")]
    MalformedInterval {
        /// Interval start.
        t0: f64,
        /// Interval end.
        t1: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings() {
        let err = SpineError::InsufficientControlPoints {
            required: 2,
            actual: 1,
        };
        assert!(err.to_string().contains("at least 2"));

        let err = SpineError::MalformedInterval { t0: 0.9, t1: 0.1 };
        assert!(err.to_string().contains("0.9"));
    }
}
