//! Sparse-versus-dense representation choice for emitted blocks.
//!
//! ## Purpose
//!
//! When the reblock buffer emits blocks, it first decides whether each
//! accumulator block is built in sparse or dense form. This module provides
//! that decision as a pure function of the block shape and an expected
//! non-zero count.
//!
//! ## Design notes
//!
//! * **Per flush, not per block**: The buffer calls the policy once per flush with
//!   the full block size and `cells / blocks` as the non-zero estimate.
//! * **Pluggable**: [`DensityPolicy::Custom`] accepts a plain function pointer so
//!   the policy stays `Copy` and can live in the buffer configuration.
//!
//! ## Key concepts
//!
//! * **Turn point**: Sparse is only considered below a sparsity of 0.4.
//! * **Column vectors**: Single-column blocks are always dense.
//! * **Size check**: Sparse must also be smaller in memory than dense.

/// Classifier signature: `(rows, cols, nnz) -> sparse?`.
pub type DensityFn = fn(rows: usize, cols: usize, nnz: u64) -> bool;

// ============================================================================
// Density Oracle
// ============================================================================

/// Chooses sparse or dense storage for a block.
pub trait DensityOracle {
    /// Whether a `rows x cols` block with `nnz` expected non-zeros should be sparse.
    fn is_sparse(&self, rows: usize, cols: usize, nnz: u64) -> bool;
}

// ============================================================================
// Sparsity Turn Point
// ============================================================================

/// Default sparsity threshold below which sparse storage is considered.
pub const DEFAULT_SPARSITY_TURN_POINT: f64 = 0.4;

/// Fixed in-memory overhead of a block object, in bytes.
const BLOCK_HEADER_BYTES: f64 = 44.0;

/// In-memory overhead of one sparse row, in bytes.
const SPARSE_ROW_BYTES: f64 = 32.0;

/// In-memory size of one sparse entry (`u32` column and `f64` value), in bytes.
const SPARSE_ENTRY_BYTES: f64 = 12.0;

/// Threshold-and-size rule used by the host matrix library.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SparsityTurnPoint {
    /// Sparsity (`nnz / (rows * cols)`) below which sparse storage is considered.
    pub turn_point: f64,
}

impl Default for SparsityTurnPoint {
    fn default() -> Self {
        Self {
            turn_point: DEFAULT_SPARSITY_TURN_POINT,
        }
    }
}

impl DensityOracle for SparsityTurnPoint {
    fn is_sparse(&self, rows: usize, cols: usize, nnz: u64) -> bool {
        let cells = rows as f64 * cols as f64;
        if cols <= 1 || cells == 0.0 {
            return false;
        }

        let sparsity = nnz as f64 / cells;
        if sparsity >= self.turn_point {
            return false;
        }

        estimate_sparse_bytes(rows, nnz) < estimate_dense_bytes(rows, cols)
    }
}

/// Estimated in-memory size of a dense block.
pub fn estimate_dense_bytes(rows: usize, cols: usize) -> f64 {
    BLOCK_HEADER_BYTES + 8.0 * rows as f64 * cols as f64
}

/// Estimated in-memory size of a sparse block.
pub fn estimate_sparse_bytes(rows: usize, nnz: u64) -> f64 {
    BLOCK_HEADER_BYTES + SPARSE_ROW_BYTES * rows as f64 + SPARSE_ENTRY_BYTES * nnz as f64
}

// ============================================================================
// Density Policy
// ============================================================================

/// How emitted blocks choose between sparse and dense storage.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DensityPolicy {
    /// Threshold-and-size rule (default).
    TurnPoint(SparsityTurnPoint),

    /// Always build sparse blocks.
    AlwaysSparse,

    /// Always build dense blocks.
    AlwaysDense,

    /// Caller-provided classifier.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(DensityFn),
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self::TurnPoint(SparsityTurnPoint::default())
    }
}

impl PartialEq for DensityPolicy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TurnPoint(a), Self::TurnPoint(b)) => a == b,
            (Self::AlwaysSparse, Self::AlwaysSparse) => true,
            (Self::AlwaysDense, Self::AlwaysDense) => true,
            (Self::Custom(a), Self::Custom(b)) => *a as usize == *b as usize,
            _ => false,
        }
    }
}

impl DensityOracle for DensityPolicy {
    #[inline]
    fn is_sparse(&self, rows: usize, cols: usize, nnz: u64) -> bool {
        match self {
            Self::TurnPoint(rule) => rule.is_sparse(rows, cols, nnz),
            Self::AlwaysSparse => true,
            Self::AlwaysDense => false,
            Self::Custom(f) => f(rows, cols, nnz),
        }
    }
}
