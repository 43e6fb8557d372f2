//! Flush execution: sort, partition, decide, emit.
//!
//! ## Purpose
//!
//! This module turns a slice of buffered cells into a stream of output units.
//! It is the whole of a flush except clearing the buffer, which the caller does
//! once emission has succeeded.
//!
//! ## Design notes
//!
//! * **Two passes over sorted cells**: One to count blocks for the format decision,
//!   one to emit. Both use the same run scan, so they agree on block boundaries.
//! * **One density decision per flush**: The sparse/dense form of every emitted
//!   block comes from a single call with `cells / blocks` as the non-zero
//!   estimate. Blocks much denser or sparser than average still get that form.
//! * **Abort on failure**: The first sink error returns immediately. Units already
//!   emitted stay emitted.
//!
//! ## Key concepts
//!
//! * **Blocked path**: One accumulator per run, clipped to the matrix edge; sparse
//!   accumulators have their rows sorted before they leave.
//! * **Cell path**: One [`PartialCell`] per buffered cell, in sorted order.
//!
//! ## Invariants
//!
//! * Every cell in the slice is emitted exactly once, in one of the two forms.
//! * Keys are emitted in non-decreasing block order.

// Internal dependencies
use crate::engine::format::{FormatCosts, OutputFormat};
use crate::engine::output::{FlushReport, PartialCell, ReblockSink, ReblockValue, Tagged};
use crate::matrix::block::MatrixBlock;
use crate::matrix::density::{DensityOracle, DensityPolicy};
use crate::primitives::buffer::PackedCell;
use crate::primitives::indexing::BlockGeometry;
use crate::primitives::sorting::{block_runs, count_blocks, sort_by_block};

// ============================================================================
// Configuration
// ============================================================================

/// Default buffer capacity in cells (about 120 MB of packed cells).
pub const DEFAULT_CAPACITY: usize = 5_000_000;

/// Resolved, validated settings of a reblock buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReblockConfig {
    /// Matrix and block dimensions.
    pub geometry: BlockGeometry,

    /// Maximum number of buffered cells.
    pub capacity: usize,

    /// Sparse/dense rule for emitted blocks.
    pub density: DensityPolicy,

    /// Sort with rayon (requires the `parallel` feature; ignored otherwise).
    pub parallel: bool,
}

// ============================================================================
// Executor
// ============================================================================

/// Stateless flush engine parameterized by geometry and policies.
#[derive(Debug, Clone, Copy)]
pub struct ReblockExecutor {
    /// Matrix and block dimensions.
    pub geometry: BlockGeometry,

    /// Sparse/dense rule for emitted blocks.
    pub density: DensityPolicy,

    /// Sort with rayon (requires the `parallel` feature; ignored otherwise).
    pub parallel: bool,
}

impl ReblockExecutor {
    /// Build an executor from a buffer configuration.
    pub fn from_config(config: &ReblockConfig) -> Self {
        Self {
            geometry: config.geometry,
            density: config.density,
            parallel: config.parallel,
        }
    }

    /// Sort `cells` in place and emit them to `sink` under routing tag `tag`.
    ///
    /// Returns `None` without touching the sink when `cells` is empty.
    pub fn flush<S>(
        &self,
        cells: &mut [PackedCell],
        tag: u8,
        sink: &mut S,
    ) -> Result<Option<FlushReport>, S::Error>
    where
        S: ReblockSink + ?Sized,
    {
        if cells.is_empty() {
            return Ok(None);
        }

        // Step 1: block-wise sort (no ordering inside a block)
        self.sort(cells);

        // Step 2: count distinct blocks
        let blocks = count_blocks(cells, &self.geometry);

        // Step 3: pick the smaller serialized representation
        let costs = FormatCosts::new(cells.len(), blocks);
        let format = costs.format();

        log::debug!(
            "flushing {} cells in {} blocks as {} (blocked={}B, cell={}B, tag={})",
            cells.len(),
            blocks,
            format,
            costs.blocked,
            costs.cell,
            tag
        );

        // Step 4: emit
        let sparse_blocks = match format {
            OutputFormat::Blocked => self.emit_blocks(cells, blocks, tag, sink)?,
            OutputFormat::Cell => {
                self.emit_cells(cells, tag, sink)?;
                false
            }
        };

        Ok(Some(FlushReport {
            cells: cells.len(),
            blocks,
            format,
            costs,
            sparse_blocks,
        }))
    }

    #[cfg(feature = "parallel")]
    fn sort(&self, cells: &mut [PackedCell]) {
        if self.parallel {
            crate::primitives::sorting::par_sort_by_block(cells, &self.geometry);
        } else {
            sort_by_block(cells, &self.geometry);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn sort(&self, cells: &mut [PackedCell]) {
        sort_by_block(cells, &self.geometry);
    }

    /// Emit one block per run. Returns whether blocks were built sparse.
    fn emit_blocks<S>(
        &self,
        cells: &[PackedCell],
        blocks: usize,
        tag: u8,
        sink: &mut S,
    ) -> Result<bool, S::Error>
    where
        S: ReblockSink + ?Sized,
    {
        let geometry = &self.geometry;
        let avg_nnz = (cells.len() / blocks) as u64;
        let sparse = self
            .density
            .is_sparse(geometry.block_rows, geometry.block_cols, avg_nnz);

        for (ix, run) in block_runs(cells, geometry) {
            let (rows, cols) = geometry.block_dims(ix);
            let mut block = MatrixBlock::new(rows, cols, sparse);
            for cell in run {
                let (r, c) = geometry.local_of(cell.row, cell.col);
                block.append_value(r, c, cell.value());
            }

            // the block-wise sort leaves sparse rows unordered
            block.sort_sparse_rows();

            sink.emit(ix, Tagged::new(tag, ReblockValue::Block(block)))?;
        }

        Ok(sparse)
    }

    /// Emit one cell record per cell.
    fn emit_cells<S>(&self, cells: &[PackedCell], tag: u8, sink: &mut S) -> Result<(), S::Error>
    where
        S: ReblockSink + ?Sized,
    {
        let geometry = &self.geometry;
        for cell in cells {
            let ix = geometry.block_of(cell.row, cell.col);
            let (row, col) = geometry.local_of(cell.row, cell.col);
            let record = PartialCell {
                row,
                col,
                value: cell.value(),
            };
            sink.emit(ix, Tagged::new(tag, ReblockValue::Cell(record)))?;
        }
        Ok(())
    }
}
