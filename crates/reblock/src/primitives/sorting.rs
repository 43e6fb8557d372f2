//! Block-wise ordering of buffered cells.
//!
//! ## Purpose
//!
//! This module sorts buffered cells by the block they fall into and walks the
//! sorted sequence as runs of cells that share a block.
//!
//! ## Design notes
//!
//! * **Derived key**: The sort key `(block_row, block_col)` is computed on the fly
//!   from each cell's global coordinates through [`BlockGeometry::block_of`];
//!   nothing extra is stored per cell.
//! * **Stability**: Both the sequential and the rayon sort are stable, so cells
//!   inside a block keep their insertion order and emission order is identical
//!   with or without the `parallel` feature.
//! * **Block-wise only**: Cells are not ordered within a block. Consumers that need
//!   intra-block order (sparse rows) sort on their side.
//!
//! ## Invariants
//!
//! * After sorting, block indices are non-decreasing in row-major block order.
//! * Runs are maximal and non-empty; their count is the number of distinct blocks.

// External dependencies
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

// Internal dependencies
use crate::primitives::buffer::PackedCell;
use crate::primitives::indexing::{BlockGeometry, BlockIndex};

// ============================================================================
// Sorting Functions
// ============================================================================

/// Stable sort of `cells` by block index.
///
/// Returns early when the cells are already in block order, which is common
/// when a producer imports fragments block by block.
#[inline]
pub fn sort_by_block(cells: &mut [PackedCell], geometry: &BlockGeometry) {
    if is_block_sorted(cells, geometry) {
        return;
    }
    cells.sort_by_key(|c| geometry.block_of(c.row, c.col));
}

/// Stable parallel sort of `cells` by block index.
#[cfg(feature = "parallel")]
#[inline]
pub fn par_sort_by_block(cells: &mut [PackedCell], geometry: &BlockGeometry) {
    if is_block_sorted(cells, geometry) {
        return;
    }
    cells.par_sort_by_key(|c| geometry.block_of(c.row, c.col));
}

/// Whether `cells` are already ordered by block index.
pub fn is_block_sorted(cells: &[PackedCell], geometry: &BlockGeometry) -> bool {
    cells
        .windows(2)
        .all(|w| geometry.block_of(w[0].row, w[0].col) <= geometry.block_of(w[1].row, w[1].col))
}

// ============================================================================
// Run Scanning
// ============================================================================

/// Iterate maximal runs of block-sorted cells that share a block.
pub fn block_runs<'a>(
    cells: &'a [PackedCell],
    geometry: &'a BlockGeometry,
) -> impl Iterator<Item = (BlockIndex, &'a [PackedCell])> + 'a {
    cells
        .chunk_by(move |a, b| geometry.block_of(a.row, a.col) == geometry.block_of(b.row, b.col))
        .map(move |run| (geometry.block_of(run[0].row, run[0].col), run))
}

/// Number of distinct blocks in a block-sorted sequence.
pub fn count_blocks(cells: &[PackedCell], geometry: &BlockGeometry) -> usize {
    block_runs(cells, geometry).count()
}
