//! Error types for the vadose_core soil-water solver.
//!
//! This module provides a unified error type [`VadoseError`] covering
//! column construction and solver invocation. Physical range violations
//! (saturation ratios or matric potentials outside expected bounds) are
//! not errors: the solver logs them and carries on, since halting a
//! multi-year run over one layer's numerical excursion loses far more
//! than a locally degraded day.

use thiserror::Error;

/// Result type alias using [`VadoseError`].
pub type Result<T> = std::result::Result<T, VadoseError>;

/// Unified error type for all vadose_core operations.
#[derive(Error, Debug)]
pub enum VadoseError {
    // ============ Column Construction Errors ============
    /// Column already holds the maximum supported number of layers
    #[error("Column is full: at most {max} soil layers are supported")]
    ColumnFull { max: usize },

    /// Layer geometry or state is not physical
    #[error("Invalid layer {index}: {message}")]
    InvalidLayer { index: usize, message: String },

    // ============ Solver Invocation Errors ============
    /// A solver index does not refer to a layer in the column
    #[error("Solver index {index} out of range (column has {len} layers)")]
    IndexOutOfRange { index: usize, len: usize },

    /// First and drain indices do not describe a downward range
    #[error("First active index {first} lies below drain index {drain}")]
    InvertedRange { first: usize, drain: usize },

    /// Transpiration slice does not cover the layers down to the drain
    #[error("Transpiration slice too short: got {got}, need at least {need}")]
    TranspirationTooShort { got: usize, need: usize },

    // ============ Numerical Errors ============
    /// Tridiagonal elimination hit a vanishing pivot
    #[error("Singular tridiagonal system at row {row}: zero pivot")]
    SingularSystem { row: usize },
}

impl VadoseError {
    /// Create an invalid-layer error
    pub fn invalid_layer(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidLayer {
            index,
            message: message.into(),
        }
    }
}
