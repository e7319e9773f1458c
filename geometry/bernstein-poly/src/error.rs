//! Error types for polynomial operations.

use thiserror::Error;

/// Errors that can occur during polynomial root isolation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolyError {
    /// The subdivision budget was exhausted before every root could be
    /// certified.
    ///
    /// The computed root set is incomplete and must not be used; callers are
    /// expected to treat this as "cannot certify", not as "no roots".
    #[error("root isolation inconclusive: {reason} (depth budget {max_depth})")]
    Inconclusive {
        /// Description of what could not be certified.
        reason: String,
        /// The subdivision depth that was exhausted.
        max_depth: usize,
    },

    /// The polynomial is (numerically) identically zero on the interval, so
    /// every point is a root and isolation is meaningless.
    #[error("degenerate input: polynomial vanishes identically on the domain")]
    DegenerateInput,

    /// The requested interval is malformed (`lo > hi`).
    #[error("malformed interval [{lo}, {hi}]: lower bound exceeds upper bound")]
    MalformedInterval {
        /// Lower bound.
        lo: f64,
        /// Upper bound.
        hi: f64,
    },
}

impl PolyError {
    /// Create an inconclusive-result error.
    #[must_use]
    pub fn inconclusive(reason: impl Into<String>, max_depth: usize) -> Self {
        Self::Inconclusive {
            reason: reason.into(),
            max_depth,
        }
    }

    /// Check if this is an inconclusive result (as opposed to misuse).
    #[must_use]
    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive { .. } | Self::DegenerateInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_predicates() {
        let err = PolyError::inconclusive("cluster near t=0.5", 64);
        assert!(err.to_string().contains("cluster near t=0.5"));
        assert!(err.is_inconclusive());

        let err = PolyError::MalformedInterval { lo: 1.0, hi: 0.0 };
        assert!(!err.is_inconclusive());
    }
}
