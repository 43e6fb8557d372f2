//! Output units and flush reports.
//!
//! ## Purpose
//!
//! This module defines what a flush hands to the sink (tagged blocks or tagged
//! cell records), the sink contract itself, what a flush reports back to the
//! caller, and the counters a buffer accumulates over its lifetime.
//!
//! ## Design notes
//!
//! * **Transient**: Output units are built per emission and moved into the sink;
//!   the buffer keeps no reference to them.
//! * **Tagged**: Every unit carries the routing tag of the flush, so several
//!   logical outputs can share one sink.
//!
//! ## Non-goals
//!
//! * This module does not serialize output units.

// External dependencies
use core::fmt::{self, Display, Formatter};

// Internal dependencies
use crate::engine::format::{FormatCosts, OutputFormat};
use crate::matrix::block::MatrixBlock;
use crate::primitives::indexing::BlockIndex;

// ============================================================================
// Output Units
// ============================================================================

/// A value paired with the routing tag of the output stream it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<V> {
    /// Routing tag.
    pub tag: u8,
    /// Wrapped value.
    pub value: V,
}

impl<V> Tagged<V> {
    /// Tag a value.
    #[inline]
    pub fn new(tag: u8, value: V) -> Self {
        Self { tag, value }
    }
}

/// A single cell addressed relative to its block.
///
/// The block coordinate travels in the emission key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialCell {
    /// Row inside the block (0-based).
    pub row: usize,
    /// Column inside the block (0-based).
    pub col: usize,
    /// Cell value.
    pub value: f64,
}

/// A unit emitted by a flush.
#[derive(Debug, Clone, PartialEq)]
pub enum ReblockValue {
    /// A whole block, clipped at the matrix edge.
    Block(MatrixBlock),

    /// A single cell record.
    Cell(PartialCell),
}

impl ReblockValue {
    /// The block, if this is a block.
    pub fn as_block(&self) -> Option<&MatrixBlock> {
        match self {
            Self::Block(block) => Some(block),
            Self::Cell(_) => None,
        }
    }

    /// The cell record, if this is a cell.
    pub fn as_cell(&self) -> Option<&PartialCell> {
        match self {
            Self::Cell(cell) => Some(cell),
            Self::Block(_) => None,
        }
    }
}

// ============================================================================
// Sink Contract
// ============================================================================

/// Receiver of flushed blocks and cell records.
///
/// `emit` is a blocking call-and-return and may be invoked many times per
/// flush. An error aborts the flush and is handed back to the caller unchanged.
pub trait ReblockSink {
    /// Failure raised by the sink.
    type Error;

    /// Accept one output unit keyed by its block coordinate.
    fn emit(&mut self, key: BlockIndex, value: Tagged<ReblockValue>) -> Result<(), Self::Error>;
}

// ============================================================================
// Flush Report
// ============================================================================

/// Summary of one non-empty flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Number of cells flushed.
    pub cells: usize,

    /// Number of distinct blocks among the flushed cells.
    pub blocks: usize,

    /// Representation chosen for the flush.
    pub format: OutputFormat,

    /// Serialized size estimates that drove the choice.
    pub costs: FormatCosts,

    /// Whether blocks were built sparse (blocked format only).
    pub sparse_blocks: bool,
}

impl FlushReport {
    /// Number of sink calls the flush made.
    pub fn emissions(&self) -> usize {
        match self.format {
            OutputFormat::Blocked => self.blocks,
            OutputFormat::Cell => self.cells,
        }
    }
}

// ============================================================================
// Lifetime Statistics
// ============================================================================

/// Counters accumulated by a buffer across flushes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReblockStats {
    /// Non-empty flushes, explicit or automatic.
    pub flushes: u64,

    /// Flushes triggered by a full buffer during import.
    pub auto_flushes: u64,

    /// Cells flushed.
    pub cells: u64,

    /// Blocks emitted on the blocked path.
    pub blocks_emitted: u64,

    /// Cell records emitted on the cell path.
    pub cell_records_emitted: u64,
}

impl ReblockStats {
    /// Account for a completed flush.
    pub fn record(&mut self, report: &FlushReport) {
        self.flushes += 1;
        self.cells += report.cells as u64;
        match report.format {
            OutputFormat::Blocked => self.blocks_emitted += report.blocks as u64,
            OutputFormat::Cell => self.cell_records_emitted += report.cells as u64,
        }
    }
}

impl Display for ReblockStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reblock Statistics:")?;
        writeln!(f, "  Flushes:      {} ({} automatic)", self.flushes, self.auto_flushes)?;
        writeln!(f, "  Cells:        {}", self.cells)?;
        writeln!(f, "  Blocks:       {}", self.blocks_emitted)?;
        write!(f, "  Cell records: {}", self.cell_records_emitted)
    }
}
