use thiserror::Error;

/// Main error type for the SaddleBench system.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("dimension mismatch for {role}: expected {expected}, got {actual}")]
    DimensionMismatch {
        role: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("saddle point solution is not known for this problem")]
    SolutionUnknown,

    #[error("worst-case search is undefined for a zero-dimensional adversary domain")]
    DegenerateDomain,

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for SaddleBench operations.
pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EvalError::DimensionMismatch {
            role: "x0",
            expected: 2,
            actual: 3,
        };

        assert!(error.to_string().contains("x0"));
        assert!(error.to_string().contains("expected 2"));
        assert!(error.to_string().contains("got 3"));
    }

    #[test]
    fn test_solution_unknown_display() {
        let error = EvalError::SolutionUnknown;
        assert!(error.to_string().contains("not known"));
    }
}
