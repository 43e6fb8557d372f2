//! Validation for reblock configuration and input cells.
//!
//! ## Purpose
//!
//! This module checks block geometry and capacity at build time, and the
//! bounds of cells and imported fragments before they enter the buffer.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Up front**: Region checks run before any cell of a fragment is appended,
//!   so a rejected import leaves the buffer untouched.
//!
//! ## Invariants
//!
//! * A validated geometry has strictly positive dimensions and block sizes.
//! * Every validated cell maps to a block inside the grid.
//!
//! ## Non-goals
//!
//! * This module does not correct or clamp invalid input.

// Internal dependencies
use crate::primitives::errors::ReblockError;
use crate::primitives::indexing::BlockGeometry;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for reblock configuration and input.
///
/// Provides static methods that return `Result<(), ReblockError>` and fail
/// fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Configuration Validation
    // ========================================================================

    /// Validate block size and matrix dimensions.
    pub fn validate_geometry(geometry: &BlockGeometry) -> Result<(), ReblockError> {
        if geometry.block_rows == 0 || geometry.block_cols == 0 {
            return Err(ReblockError::InvalidBlockSize {
                block_rows: geometry.block_rows,
                block_cols: geometry.block_cols,
            });
        }

        if geometry.rows == 0 || geometry.cols == 0 {
            return Err(ReblockError::InvalidDimensions {
                rows: geometry.rows,
                cols: geometry.cols,
            });
        }

        Ok(())
    }

    /// Validate the buffer capacity.
    pub fn validate_capacity(capacity: usize) -> Result<(), ReblockError> {
        if capacity == 0 {
            return Err(ReblockError::InvalidCapacity(capacity));
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), ReblockError> {
        if let Some(param) = duplicate_param {
            return Err(ReblockError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }

    // ========================================================================
    // Input Validation
    // ========================================================================

    /// Validate that a 1-based cell lies inside the matrix.
    #[inline]
    pub fn validate_cell(row: u64, col: u64, geometry: &BlockGeometry) -> Result<(), ReblockError> {
        if !geometry.contains(row, col) {
            return Err(ReblockError::CellOutOfBounds {
                row,
                col,
                rows: geometry.rows,
                cols: geometry.cols,
            });
        }
        Ok(())
    }

    /// Validate that a `region_rows x region_cols` fragment placed with its
    /// first cell at global `(row_offset, col_offset)` fits the matrix.
    ///
    /// Empty fragments always pass.
    pub fn validate_region(
        row_offset: u64,
        col_offset: u64,
        region_rows: usize,
        region_cols: usize,
        geometry: &BlockGeometry,
    ) -> Result<(), ReblockError> {
        if region_rows == 0 || region_cols == 0 {
            return Ok(());
        }

        let last_row = row_offset.checked_add(region_rows as u64 - 1);
        let last_col = col_offset.checked_add(region_cols as u64 - 1);
        let fits = match (last_row, last_col) {
            (Some(last_row), Some(last_col)) => {
                geometry.contains(row_offset, col_offset) && geometry.contains(last_row, last_col)
            }
            _ => false,
        };

        if !fits {
            return Err(ReblockError::RegionOutOfBounds {
                row_offset,
                col_offset,
                region_rows,
                region_cols,
                rows: geometry.rows,
                cols: geometry.cols,
            });
        }
        Ok(())
    }
}
