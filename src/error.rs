//! Error types.
//!
//! Library code reports typed errors (`InfeasibleReason`, `SingularIntegrand`,
//! `SearchError`). The binary converts them into an `AppError`, which carries
//! the process exit code.

use thiserror::Error;

use crate::domain::DegreePair;

/// Why a degree pair produced no approximant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InfeasibleReason {
    /// Both degrees must be at least 1.
    #[error("degrees must be >= 1 (got {pair})")]
    DegreeOutOfRange { pair: DegreePair },

    /// `n + m` must be strictly less than the series length.
    #[error("{pair} needs {required} Taylor coefficients, series has {available}")]
    InsufficientCoefficients {
        pair: DegreePair,
        required: usize,
        available: usize,
    },

    /// The denominator system has no unique solution.
    #[error("singular denominator system for {pair}")]
    SingularSystem { pair: DegreePair },

    /// The solve returned NaN/inf coefficients.
    #[error("non-finite coefficients for {pair}")]
    NonFiniteSolution { pair: DegreePair },

    /// The solved approximant does not reproduce the series.
    #[error("ill-conditioned system for {pair}: series mismatch {mismatch:e} exceeds {tolerance:e}")]
    IllConditioned {
        pair: DegreePair,
        mismatch: f64,
        tolerance: f64,
    },
}

/// The integrand `|P/Q - f|` is not integrable on the requested interval.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SingularIntegrand {
    /// The denominator changes sign (or hits zero) inside the interval.
    #[error("denominator vanishes near x = {x}")]
    DenominatorVanishes { x: f64 },

    /// Evaluation or quadrature produced NaN/inf.
    #[error("non-finite error value near x = {x}")]
    NonFinite { x: f64 },
}

/// Errors surfaced by the grid search to its caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Rejected before the search starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every grid cell was skipped or failed.
    #[error("no feasible approximant found ({attempted} cells attempted, {skipped} skipped)")]
    NoSolutionFound { attempted: usize, skipped: usize },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let exit_code = match err {
            SearchError::InvalidConfig(_) => 2,
            SearchError::NoSolutionFound { .. } => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
