//! Bounded cell storage for the reblock buffer.
//!
//! ## Purpose
//!
//! This module provides the packed, fixed-capacity storage that holds cells
//! between flushes.
//!
//! ## Design notes
//!
//! * **Packed**: A cell is three 8-byte words; the value is kept as its raw
//!   IEEE-754 bit pattern so that sorting moves plain integers and values
//!   round-trip exactly (including `-0.0` and NaN payloads).
//! * **Allocated once**: The backing vector reserves `capacity` slots on creation.
//!   `clear` resets the length only; the allocation is reused by every flush.
//! * **Capped**: `push` refuses to grow beyond `capacity`.
//!
//! ## Invariants
//!
//! * `len() <= capacity()` at all times.
//! * Slots beyond `len()` are never observable.
//!
//! ## Non-goals
//!
//! * Dynamic shrinking or growth past the configured capacity.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::primitives::errors::ReblockError;

// ============================================================================
// Packed Cell
// ============================================================================

/// A buffered matrix cell: global 1-based row and column, and the value's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct PackedCell {
    /// Global row (1-based).
    pub row: u64,
    /// Global column (1-based).
    pub col: u64,
    /// Raw bits of the `f64` value.
    pub bits: u64,
}

impl PackedCell {
    /// Pack a cell.
    #[inline]
    pub fn new(row: u64, col: u64, value: f64) -> Self {
        Self {
            row,
            col,
            bits: value.to_bits(),
        }
    }

    /// The cell value.
    #[inline]
    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits)
    }
}

// ============================================================================
// Cell Buffer
// ============================================================================

/// Fixed-capacity contiguous storage of [`PackedCell`]s.
#[derive(Debug, Clone)]
pub struct CellBuffer {
    cells: Vec<PackedCell>,
    capacity: usize,
}

impl CellBuffer {
    /// Create a buffer that holds at most `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a cell, or fail if the buffer is already full.
    #[inline]
    pub fn push(&mut self, cell: PackedCell) -> Result<(), ReblockError> {
        if self.is_full() {
            return Err(ReblockError::BufferFull {
                capacity: self.capacity,
            });
        }
        self.cells.push(cell);
        Ok(())
    }

    /// Number of live cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Maximum number of cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether no cells are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the buffer holds `capacity` cells.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.len() >= self.capacity
    }

    /// Drop all cells (sets length to 0, preserves the allocation).
    #[inline]
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// The live cells.
    #[inline]
    pub fn as_slice(&self) -> &[PackedCell] {
        &self.cells
    }

    /// The live cells, mutably (used for in-place sorting).
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [PackedCell] {
        &mut self.cells
    }
}
