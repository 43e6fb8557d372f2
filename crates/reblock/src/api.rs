//! High-level API for re-blocking matrix cells.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry point: a fluent builder that
//! validates the buffer configuration, and the [`ReblockBuffer`] a producer
//! task appends cells to and flushes into a sink.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder; only the matrix dimensions and block size
//!   are required.
//! * **Validated**: Geometry and capacity are checked once, in `build()`.
//! * **Single owner**: A buffer belongs to one producer and is never shared; it
//!   is `Send`, so the producer may run on any thread.
//!
//! ### Usage Flow
//!
//! 1. Create a [`ReblockBuilder`] via `Reblock::new()`.
//! 2. Set `.dimensions()` and `.block_size()`, optionally `.capacity()` etc.
//! 3. `.build()` the buffer, then `append_cell`/`import_region`, then `flush`.

// Internal dependencies
use crate::engine::executor::ReblockExecutor;
use crate::engine::validator::Validator;
use crate::primitives::buffer::{CellBuffer, PackedCell};

// Publicly re-exported types
pub use crate::adapters::sink::{CollectSink, Emission};
#[cfg(feature = "std")]
pub use crate::adapters::sink::ChannelSink;
pub use crate::engine::executor::{ReblockConfig, DEFAULT_CAPACITY};
pub use crate::engine::format::{FormatCosts, OutputFormat};
pub use crate::engine::output::{
    FlushReport, PartialCell, ReblockSink, ReblockStats, ReblockValue, Tagged,
};
pub use crate::matrix::block::{MatrixBlock, SparseRow};
pub use crate::matrix::density::{DensityFn, DensityOracle, DensityPolicy, SparsityTurnPoint};
pub use crate::primitives::errors::{EmitError, ReblockError};
pub use crate::primitives::indexing::{BlockGeometry, BlockIndex};

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for a [`ReblockBuffer`].
#[derive(Debug, Clone, Default)]
pub struct ReblockBuilder {
    /// Total matrix rows and columns.
    pub dimensions: Option<(u64, u64)>,

    /// Rows and columns per block.
    pub block_size: Option<(usize, usize)>,

    /// Maximum buffered cells (default: 5,000,000).
    pub capacity: Option<usize>,

    /// Sparse/dense rule for emitted blocks (default: turn point 0.4).
    pub density: Option<DensityPolicy>,

    /// Sort with rayon when the `parallel` feature is enabled (default: false).
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl ReblockBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    fn mark(&mut self, already_set: bool, parameter: &'static str) {
        if already_set {
            self.duplicate_param = Some(parameter);
        }
    }

    /// Set the total matrix dimensions.
    pub fn dimensions(mut self, rows: u64, cols: u64) -> Self {
        self.mark(self.dimensions.is_some(), "dimensions");
        self.dimensions = Some((rows, cols));
        self
    }

    /// Set the block size.
    pub fn block_size(mut self, block_rows: usize, block_cols: usize) -> Self {
        self.mark(self.block_size.is_some(), "block_size");
        self.block_size = Some((block_rows, block_cols));
        self
    }

    /// Set the buffer capacity in cells.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.mark(self.capacity.is_some(), "capacity");
        self.capacity = Some(capacity);
        self
    }

    /// Set the sparse/dense rule for emitted blocks.
    pub fn density(mut self, policy: DensityPolicy) -> Self {
        self.mark(self.density.is_some(), "density");
        self.density = Some(policy);
        self
    }

    /// Set the parallel sort hint.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.mark(self.parallel.is_some(), "parallel");
        self.parallel = Some(parallel);
        self
    }

    /// Resolve and validate the configuration without allocating a buffer.
    pub fn config(&self) -> Result<ReblockConfig, ReblockError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let (rows, cols) = self.dimensions.ok_or(ReblockError::MissingParameter {
            parameter: "dimensions",
        })?;
        let (block_rows, block_cols) = self.block_size.ok_or(ReblockError::MissingParameter {
            parameter: "block_size",
        })?;

        let geometry = BlockGeometry::new(rows, cols, block_rows, block_cols);
        Validator::validate_geometry(&geometry)?;

        let capacity = self.capacity.unwrap_or(DEFAULT_CAPACITY);
        Validator::validate_capacity(capacity)?;

        Ok(ReblockConfig {
            geometry,
            capacity,
            density: self.density.unwrap_or_default(),
            parallel: self.parallel.unwrap_or(false),
        })
    }

    /// Build the buffer.
    pub fn build(self) -> Result<ReblockBuffer, ReblockError> {
        ReblockBuffer::from_config(self.config()?)
    }
}

// ============================================================================
// Reblock Buffer
// ============================================================================

/// Bounded buffer of matrix cells that flushes them to a sink as blocks or
/// as individual cell records.
///
/// Indices passed to the buffer are global and 1-based.
#[derive(Debug, Clone)]
pub struct ReblockBuffer {
    config: ReblockConfig,
    cells: CellBuffer,
    stats: ReblockStats,
}

impl ReblockBuffer {
    /// Create a buffer with the default capacity.
    pub fn new(
        rows: u64,
        cols: u64,
        block_rows: usize,
        block_cols: usize,
    ) -> Result<Self, ReblockError> {
        Self::with_capacity(DEFAULT_CAPACITY, rows, cols, block_rows, block_cols)
    }

    /// Create a buffer holding at most `capacity` cells.
    pub fn with_capacity(
        capacity: usize,
        rows: u64,
        cols: u64,
        block_rows: usize,
        block_cols: usize,
    ) -> Result<Self, ReblockError> {
        ReblockBuilder::new()
            .dimensions(rows, cols)
            .block_size(block_rows, block_cols)
            .capacity(capacity)
            .build()
    }

    /// Create a buffer from a configuration, validating it first.
    pub fn from_config(config: ReblockConfig) -> Result<Self, ReblockError> {
        Validator::validate_geometry(&config.geometry)?;
        Validator::validate_capacity(config.capacity)?;

        Ok(Self {
            cells: CellBuffer::with_capacity(config.capacity),
            config,
            stats: ReblockStats::default(),
        })
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Append one cell at global 1-based `(row, col)`.
    ///
    /// Zeros are kept. This never flushes: a full buffer yields
    /// [`ReblockError::BufferFull`] and the caller must flush first.
    pub fn append_cell(&mut self, row: u64, col: u64, value: f64) -> Result<(), ReblockError> {
        Validator::validate_cell(row, col, &self.config.geometry)?;
        self.cells.push(PackedCell::new(row, col, value))
    }

    /// Import every non-zero of `source`, whose local `(i, j)` lands at global
    /// `(row_offset + i, col_offset + j)`.
    ///
    /// Sparse fragments are read through their row iterator, dense ones
    /// row-major with zeros skipped. Whenever the buffer fills up it is flushed
    /// to `sink` under `tag` before the import continues.
    ///
    /// A fragment that does not fit the matrix is rejected before anything is
    /// appended. A sink failure aborts the import; the buffer must then be
    /// discarded.
    pub fn import_region<S>(
        &mut self,
        row_offset: u64,
        col_offset: u64,
        source: &MatrixBlock,
        tag: u8,
        sink: &mut S,
    ) -> Result<(), EmitError<S::Error>>
    where
        S: ReblockSink + ?Sized,
    {
        Validator::validate_region(
            row_offset,
            col_offset,
            source.num_rows(),
            source.num_cols(),
            &self.config.geometry,
        )?;

        for (i, j, v) in source.iter_nonzeros() {
            // a buffer filled through append_cell is flushed before the first cell
            if self.cells.is_full() {
                self.auto_flush(tag, sink)?;
            }

            self.cells
                .push(PackedCell::new(row_offset + i as u64, col_offset + j as u64, v))?;

            if self.cells.is_full() {
                self.auto_flush(tag, sink)?;
            }
        }

        Ok(())
    }

    fn auto_flush<S>(&mut self, tag: u8, sink: &mut S) -> Result<(), EmitError<S::Error>>
    where
        S: ReblockSink + ?Sized,
    {
        log::trace!(
            "buffer full at {} cells, flushing mid-import (tag={})",
            self.cells.len(),
            tag
        );
        self.flush(tag, sink).map_err(EmitError::Sink)?;
        self.stats.auto_flushes += 1;
        Ok(())
    }

    // ========================================================================
    // Flush
    // ========================================================================

    /// Emit all buffered cells to `sink` under routing tag `tag` and empty the
    /// buffer.
    ///
    /// Returns `Ok(None)` without calling the sink when the buffer is empty.
    /// On a sink error the flush stops; units already emitted are not
    /// retracted and the buffer is left as-is and must be discarded.
    pub fn flush<S>(&mut self, tag: u8, sink: &mut S) -> Result<Option<FlushReport>, S::Error>
    where
        S: ReblockSink + ?Sized,
    {
        let report = ReblockExecutor::from_config(&self.config).flush(
            self.cells.as_mut_slice(),
            tag,
            sink,
        )?;

        if let Some(report) = &report {
            self.cells.clear();
            self.stats.record(report);
        }

        Ok(report)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of buffered cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Maximum number of buffered cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.capacity()
    }

    /// Cells that can be appended before the buffer is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the buffer is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.is_full()
    }

    /// The buffer configuration.
    pub fn config(&self) -> &ReblockConfig {
        &self.config
    }

    /// Matrix and block dimensions.
    pub fn geometry(&self) -> &BlockGeometry {
        &self.config.geometry
    }

    /// Counters accumulated since the buffer was built.
    pub fn stats(&self) -> &ReblockStats {
        &self.stats
    }
}

