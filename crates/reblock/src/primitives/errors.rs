//! Error types for reblock operations.
//!
//! ## Purpose
//!
//! This module defines the error conditions that can occur while configuring a
//! reblock buffer, appending cells to it, and importing matrix fragments.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (indices, dimensions, capacity).
//! * **Sink-agnostic**: Sink failures are never converted into `ReblockError`; they
//!   surface unchanged as the sink's own error type, or wrapped in [`EmitError`]
//!   when an operation can fail both ways.
//! * **No-std**: `Display` is always available, `std::error::Error` only with `std`.
//!
//! ## Key concepts
//!
//! 1. **Geometry**: Non-positive block sizes or matrix dimensions.
//! 2. **Capacity**: Appending to a full buffer without flushing first.
//! 3. **Bounds**: Cells or imported regions outside the matrix.
//! 4. **Builder**: Missing or repeated parameters.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * No error in this crate is recovered from internally.

// Feature-gated imports
#[cfg(feature = "std")]
use std::error::Error;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for reblock configuration and ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReblockError {
    /// Block dimensions must both be strictly positive.
    InvalidBlockSize {
        /// Rows per block.
        block_rows: usize,
        /// Columns per block.
        block_cols: usize,
    },

    /// Matrix dimensions must both be strictly positive.
    InvalidDimensions {
        /// Total number of rows.
        rows: u64,
        /// Total number of columns.
        cols: u64,
    },

    /// Buffer capacity must hold at least one cell.
    InvalidCapacity(usize),

    /// The buffer holds `capacity` cells and must be flushed before appending.
    BufferFull {
        /// Configured buffer capacity.
        capacity: usize,
    },

    /// A cell lies outside the 1-based matrix bounds.
    CellOutOfBounds {
        /// Global 1-based row of the cell.
        row: u64,
        /// Global 1-based column of the cell.
        col: u64,
        /// Total number of rows.
        rows: u64,
        /// Total number of columns.
        cols: u64,
    },

    /// An imported fragment does not fit inside the matrix at its offset.
    RegionOutOfBounds {
        /// Global row of the fragment's first row.
        row_offset: u64,
        /// Global column of the fragment's first column.
        col_offset: u64,
        /// Fragment height.
        region_rows: usize,
        /// Fragment width.
        region_cols: usize,
        /// Total number of rows.
        rows: u64,
        /// Total number of columns.
        cols: u64,
    },

    /// A value array does not match the declared fragment shape.
    ShapeMismatch {
        /// Number of values implied by the shape.
        expected: usize,
        /// Number of values provided.
        got: usize,
    },

    /// A required builder parameter was never set.
    MissingParameter {
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for ReblockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidBlockSize {
                block_rows,
                block_cols,
            } => write!(
                f,
                "Invalid block size: {block_rows}x{block_cols} (both dimensions must be > 0)"
            ),
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid matrix dimensions: {rows}x{cols} (both dimensions must be > 0)"
            ),
            Self::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {capacity} (must be at least 1)")
            }
            Self::BufferFull { capacity } => {
                write!(f, "Buffer is full ({capacity} cells); flush before appending")
            }
            Self::CellOutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "Cell ({row}, {col}) is outside the {rows}x{cols} matrix (indices are 1-based)"
            ),
            Self::RegionOutOfBounds {
                row_offset,
                col_offset,
                region_rows,
                region_cols,
                rows,
                cols,
            } => write!(
                f,
                "Region of {region_rows}x{region_cols} at offset ({row_offset}, {col_offset}) does not fit the {rows}x{cols} matrix"
            ),
            Self::ShapeMismatch { expected, got } => {
                write!(f, "Shape mismatch: expected {expected} values, got {got}")
            }
            Self::MissingParameter { parameter } => {
                write!(f, "Parameter '{parameter}' is required but was not set")
            }
            Self::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
            ),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for ReblockError {}

// ============================================================================
// Emission Error
// ============================================================================

/// Failure of an operation that both validates input and emits to a sink.
///
/// Returned by [`import_region`](crate::api::ReblockBuffer::import_region),
/// which rejects out-of-bounds fragments up front and may flush to the sink
/// mid-import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitError<E> {
    /// The input was rejected before anything was appended.
    Reblock(ReblockError),

    /// The sink failed; the buffer must be discarded.
    Sink(E),
}

impl<E> EmitError<E> {
    /// Returns the sink error, if this is a sink failure.
    pub fn into_sink(self) -> Option<E> {
        match self {
            Self::Sink(e) => Some(e),
            Self::Reblock(_) => None,
        }
    }
}

impl<E> From<ReblockError> for EmitError<E> {
    fn from(err: ReblockError) -> Self {
        Self::Reblock(err)
    }
}

impl<E: Display> Display for EmitError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Reblock(err) => Display::fmt(err, f),
            Self::Sink(err) => write!(f, "Sink failure: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: Error + 'static> Error for EmitError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reblock(err) => Some(err),
            Self::Sink(err) => Some(err),
        }
    }
}
