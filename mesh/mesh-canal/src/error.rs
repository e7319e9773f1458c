//! Error types for canal-surface operations.

use bernstein_poly::PolyError;
use spine_curve::SpineError;
use thiserror::Error;

/// Result type for canal-surface operations.
pub type CanalResult<T> = Result<T, CanalError>;

/// Errors that can occur during canal-surface meshing and analysis.
///
/// Variants fall into the two classes the API distinguishes:
/// configuration errors (caller mistakes, surfaced immediately and never
/// silently corrected) and [`CanalError::Uncertified`], the propagated
/// "cannot certify" outcome of the numerical root isolators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CanalError {
    /// Fewer than three angular segments were requested.
    #[error("phi segments must be at least {min}, got {actual}")]
    TooFewSegments {
        /// Minimum segment count.
        min: u32,
        /// Actual segment count.
        actual: u32,
    },

    /// A supplied start ring does not match the configured segment count.
    ///
    /// Chained canal segments must agree on the segment count along the
    /// whole path; a mismatch indicates broken caller topology.
    #[error("start ring has {actual} vertices, expected exactly {expected}")]
    RingSizeMismatch {
        /// Required ring size (`phi_segments`).
        expected: usize,
        /// Supplied ring size.
        actual: usize,
    },

    /// A clip interval with `t0 > t1` was supplied.
    #[error("malformed interval [{t0}, {t1}]: t0 exceeds t1")]
    MalformedInterval {
        /// Interval start.
        t0: f64,
        /// Interval end.
        t1: f64,
    },

    /// The bounding box was read before it was computed.
    ///
    /// There is no implicit recomputation; call `update_bounds` first.
    #[error("bounding box not computed: call update_bounds() first")]
    BoundsNotComputed,

    /// Two canals of different spine degree were paired.
    #[error("spine degree mismatch: {left} vs {right}")]
    DegreeMismatch {
        /// Degree of the left-hand canal.
        left: usize,
        /// Degree of the right-hand canal.
        right: usize,
    },

    /// The spine (or radius profile) degenerates so that meshing cannot make
    /// progress (zero arc length or vanishing step size).
    #[error("degenerate spine: {reason}")]
    DegenerateSpine {
        /// Description of the degeneracy.
        reason: String,
    },

    /// An error from the spine-curve layer.
    #[error(transparent)]
    Spine(#[from] SpineError),

    /// Root isolation could not certify its result.
    ///
    /// Callers must treat this as "cannot certify absence of intersection",
    /// not as "no intersection".
    #[error("uncertified numerical result: {0}")]
    Uncertified(#[from] PolyError),
}

impl CanalError {
    /// Create a degenerate-spine error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateSpine {
            reason: reason.into(),
        }
    }

    /// Check whether this is the propagated "cannot certify" outcome rather
    /// than a configuration error.
    #[must_use]
    pub fn is_uncertified(&self) -> bool {
        matches!(self, Self::Uncertified(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncertified_wraps_poly_error() {
        let err = CanalError::from(PolyError::inconclusive("cluster", 64));
        assert!(err.is_uncertified());
        assert!(err.to_string().contains("cluster"));
    }

    #[test]
    fn configuration_errors_are_not_uncertified() {
        assert!(!CanalError::BoundsNotComputed.is_uncertified());
        assert!(!CanalError::TooFewSegments { min: 3, actual: 2 }.is_uncertified());
    }
}
