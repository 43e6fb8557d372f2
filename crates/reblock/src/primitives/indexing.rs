//! Block coordinate arithmetic.
//!
//! ## Purpose
//!
//! This module maps 1-based global cell coordinates onto the fixed block grid:
//! which block a cell belongs to, where it sits inside that block, and how large
//! each (possibly clipped) edge block is.
//!
//! ## Design notes
//!
//! * **Derived, never stored**: Block coordinates are recomputed from raw row/column
//!   indices wherever they are needed. The sort key and the run scan both go through
//!   [`BlockGeometry::block_of`] so they can never disagree.
//! * **Branch-free**: The mapping is a single division per axis.
//!
//! ## Key concepts
//!
//! * **Block index**: `(global - 1) / block_len + 1`, 1-based.
//! * **Index in block**: `(global - 1) % block_len`, 0-based.
//! * **Clipping**: The last row/column of blocks may be smaller than `block_len`.
//!
//! ## Invariants
//!
//! * Callers pass global indices in `1..=total`; the validator enforces this on entry.
//! * `block_len > 0` (enforced at build time).

// External dependencies
use core::cmp::min;
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Index Functions
// ============================================================================

/// 1-based block index of a 1-based global index.
#[inline]
pub fn block_index(ix: u64, block_len: usize) -> u64 {
    (ix - 1) / block_len as u64 + 1
}

/// 0-based position of a 1-based global index inside its block.
#[inline]
pub fn index_in_block(ix: u64, block_len: usize) -> usize {
    ((ix - 1) % block_len as u64) as usize
}

/// Length of block `block_ix` along an axis of `total` elements.
///
/// Equals `block_len` except for the trailing block, which is clipped to the
/// elements that remain.
#[inline]
pub fn clipped_len(total: u64, block_ix: u64, block_len: usize) -> usize {
    let consumed = (block_ix - 1) * block_len as u64;
    min(block_len as u64, total.saturating_sub(consumed)) as usize
}

// ============================================================================
// Block Index
// ============================================================================

/// 1-based coordinate of a block in the block grid.
///
/// Orders row-major: by block row, then block column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockIndex {
    /// Block row (1-based).
    pub row: u64,
    /// Block column (1-based).
    pub col: u64,
}

impl BlockIndex {
    /// Create a block index.
    #[inline]
    pub const fn new(row: u64, col: u64) -> Self {
        Self { row, col }
    }
}

impl Display for BlockIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// Block Geometry
// ============================================================================

/// Matrix dimensions together with the block size that tiles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockGeometry {
    /// Total number of rows.
    pub rows: u64,
    /// Total number of columns.
    pub cols: u64,
    /// Rows per block.
    pub block_rows: usize,
    /// Columns per block.
    pub block_cols: usize,
}

impl BlockGeometry {
    /// Create a geometry. Use [`Validator::validate_geometry`] before relying on it.
    ///
    /// [`Validator::validate_geometry`]: crate::engine::validator::Validator::validate_geometry
    pub const fn new(rows: u64, cols: u64, block_rows: usize, block_cols: usize) -> Self {
        Self {
            rows,
            cols,
            block_rows,
            block_cols,
        }
    }

    /// Block containing global cell `(row, col)`.
    #[inline]
    pub fn block_of(&self, row: u64, col: u64) -> BlockIndex {
        BlockIndex {
            row: block_index(row, self.block_rows),
            col: block_index(col, self.block_cols),
        }
    }

    /// Position of global cell `(row, col)` inside its block.
    #[inline]
    pub fn local_of(&self, row: u64, col: u64) -> (usize, usize) {
        (
            index_in_block(row, self.block_rows),
            index_in_block(col, self.block_cols),
        )
    }

    /// Dimensions of `block`, clipped at the matrix edge.
    #[inline]
    pub fn block_dims(&self, block: BlockIndex) -> (usize, usize) {
        (
            clipped_len(self.rows, block.row, self.block_rows),
            clipped_len(self.cols, block.col, self.block_cols),
        )
    }

    /// Global 1-based coordinate of position `(local_row, local_col)` in `block`.
    #[inline]
    pub fn global_of(&self, block: BlockIndex, local_row: usize, local_col: usize) -> (u64, u64) {
        (
            (block.row - 1) * self.block_rows as u64 + local_row as u64 + 1,
            (block.col - 1) * self.block_cols as u64 + local_col as u64 + 1,
        )
    }

    /// Whether `(row, col)` is a valid 1-based cell of the matrix.
    #[inline]
    pub fn contains(&self, row: u64, col: u64) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.cols).contains(&col)
    }

    /// Number of block rows and block columns in the grid.
    pub fn grid_dims(&self) -> (u64, u64) {
        (
            self.rows.div_ceil(self.block_rows as u64),
            self.cols.div_ceil(self.block_cols as u64),
        )
    }
}
