//! Error types for the LOB engine.
//!
//! Caller bugs (bad readings, out-of-range arguments) fail fast with
//! `InvalidArgument`. Geometric degeneracies are not errors: they surface as
//! `None` or empty vertex lists at the call sites that produce them.

use thiserror::Error;

/// Result type for LOB engine operations.
pub type LobResult<T> = Result<T, LobError>;

/// Errors raised by the geometry and fix-solving engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LobError {
    /// Malformed input; the caller violated a documented precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Near and far corners coincide: the range window is narrower than one sampling step.
    #[error("degenerate LOB: range window {min_range_m} m..{max_range_m} m collapses to a single sample at step {step_m} m")]
    DegenerateLob {
        min_range_m: f64,
        max_range_m: f64,
        step_m: f64,
    },

    /// Accuracy ratio whose denominator is zero or not finite.
    #[error("accuracy ratio undefined: {numerator} / {denominator}")]
    DegenerateRatio { numerator: f64, denominator: f64 },

    /// Failure in the grid-notation collaborator or the snapping walk.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl LobError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LobError::InvalidArgument(msg.into())
    }
}

/// Errors from grid-notation conversion and kilometre snapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The external converter rejected the input.
    #[error("grid conversion failed: {0}")]
    Conversion(String),

    /// Grid reference does not carry the expected easting/northing digits.
    #[error("malformed grid reference: {0}")]
    Malformed(String),

    /// Rounding to the nearest kilometre carried past the 100 km square.
    #[error("grid reference {0} rounds past its 100 km square")]
    CellOverflow(String),

    /// Re-snapping never left the starting cell within the iteration cap.
    #[error("grid step from {reference} did not leave its cell after {iterations} iterations")]
    SnapExhausted { reference: String, iterations: usize },
}
