//! Output format selection for a flush.
//!
//! ## Purpose
//!
//! A flush emits either whole blocks or individual cell records, whichever
//! serializes smaller for the buffered cells. This module holds the cost model
//! and the decision.
//!
//! ## Key concepts
//!
//! * **Blocked stream**: A 16-byte block key per block plus a compact 16-byte
//!   entry (`i32` row, `i32` column, `f64` value) per cell.
//! * **Cell stream**: A 24-byte record per cell (16-byte key and the `f64`
//!   value), no per-block header.
//! * **Tie-break**: Equal costs choose the blocked stream.
//!
//! ## Invariants
//!
//! * `blocks <= cells`, so the blocked cost never exceeds `40 * cells`.
//! * The decision depends only on `(cells, blocks)`.

// External dependencies
use core::fmt::{Display, Formatter, Result};

/// Serialized size of a block key.
pub const BLOCK_KEY_BYTES: u64 = 16;

/// Serialized size of one cell inside a block.
pub const BLOCKED_CELL_BYTES: u64 = 16;

/// Serialized size of one standalone cell record.
pub const CELL_RECORD_BYTES: u64 = 24;

// ============================================================================
// Output Format
// ============================================================================

/// Representation chosen for one flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// One block per distinct block coordinate.
    Blocked,

    /// One record per cell.
    Cell,
}

impl OutputFormat {
    /// Choose the representation for `cells` cells spread over `blocks` blocks.
    #[inline]
    pub fn decide(cells: usize, blocks: usize) -> Self {
        FormatCosts::new(cells, blocks).format()
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Blocked => write!(f, "blocked"),
            Self::Cell => write!(f, "cell"),
        }
    }
}

// ============================================================================
// Format Costs
// ============================================================================

/// Estimated serialized size, in bytes, of each representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCosts {
    /// Size of the blocked stream.
    pub blocked: u64,

    /// Size of the cell stream.
    pub cell: u64,
}

impl FormatCosts {
    /// Costs for `cells` cells spread over `blocks` blocks.
    #[inline]
    pub fn new(cells: usize, blocks: usize) -> Self {
        let cells = cells as u64;
        let blocks = blocks as u64;
        Self {
            blocked: BLOCK_KEY_BYTES * blocks + BLOCKED_CELL_BYTES * cells,
            cell: CELL_RECORD_BYTES * cells,
        }
    }

    /// The cheaper representation; blocked on a tie.
    #[inline]
    pub fn format(&self) -> OutputFormat {
        if self.blocked <= self.cell {
            OutputFormat::Blocked
        } else {
            OutputFormat::Cell
        }
    }
}
