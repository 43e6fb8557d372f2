//! Rectangular matrix fragments in dense or sparse form.
//!
//! ## Purpose
//!
//! [`MatrixBlock`] is both the source fragment a producer imports into the
//! reblock buffer and the accumulator the buffer emits on its blocked path.
//!
//! ## Design notes
//!
//! * **Dense**: Row-major `Vec<f64>` of `rows * cols` values; zeros are implicit.
//! * **Sparse**: One [`SparseRow`] per matrix row holding parallel column/value
//!   vectors. Appends go to the end of the row without reordering, so a sparse
//!   block filled in arbitrary order must be finalized with
//!   [`MatrixBlock::sort_sparse_rows`].
//! * **Fast path**: Row sorting skips rows that are already ordered.
//!
//! ## Invariants
//!
//! * Dense storage length is always `rows * cols`.
//! * Sparse storage has exactly `rows` rows; every stored column is `< cols`.
//!
//! ## Non-goals
//!
//! * Arithmetic, format conversion heuristics, or serialization.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Zero;

// Internal dependencies
use crate::primitives::errors::ReblockError;

// ============================================================================
// Sparse Row
// ============================================================================

/// Column indices and values of the stored entries of one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    indexes: Vec<usize>,
    values: Vec<f64>,
}

impl SparseRow {
    /// Append an entry at the end of the row.
    #[inline]
    pub fn append(&mut self, col: usize, value: f64) {
        self.indexes.push(col);
        self.values.push(value);
    }

    /// Column indices in storage order.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Values in storage order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether the row stores no entries.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Whether column indices are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.indexes.windows(2).all(|w| w[0] <= w[1])
    }

    /// Stable sort of the entries by column index.
    pub fn sort(&mut self) {
        if self.is_sorted() {
            return;
        }

        let mut pairs: Vec<(usize, f64)> = self
            .indexes
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect();
        pairs.sort_by_key(|p| p.0);

        for (slot, (col, value)) in pairs.into_iter().enumerate() {
            self.indexes[slot] = col;
            self.values[slot] = value;
        }
    }

    /// Value at column `col`, if stored. Later entries win over earlier ones.
    fn get(&self, col: usize) -> Option<f64> {
        self.indexes
            .iter()
            .rposition(|&c| c == col)
            .map(|pos| self.values[pos])
    }

    /// Replace the entry at `col`, or append it.
    fn set(&mut self, col: usize, value: f64) {
        match self.indexes.iter().rposition(|&c| c == col) {
            Some(pos) => self.values[pos] = value,
            None => self.append(col, value),
        }
    }
}

// ============================================================================
// Matrix Block
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Storage {
    Dense(Vec<f64>),
    Sparse(Vec<SparseRow>),
}

/// A dense or sparse rectangular matrix fragment with 0-based indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBlock {
    rows: usize,
    cols: usize,
    storage: Storage,
}

impl MatrixBlock {
    /// Create an all-zero block.
    pub fn new(rows: usize, cols: usize, sparse: bool) -> Self {
        let mut block = Self {
            rows: 0,
            cols: 0,
            storage: Storage::Dense(Vec::new()),
        };
        block.reset(rows, cols, sparse);
        block
    }

    /// Create a dense block from row-major values.
    pub fn from_dense(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self, ReblockError> {
        let expected = rows * cols;
        if values.len() != expected {
            return Err(ReblockError::ShapeMismatch {
                expected,
                got: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            storage: Storage::Dense(values),
        })
    }

    /// Create a sparse block from `(row, col, value)` triples in any order.
    ///
    /// Rows are sorted on return.
    pub fn from_triples<I>(rows: usize, cols: usize, triples: I) -> Result<Self, ReblockError>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        let mut block = Self::new(rows, cols, true);
        for (r, c, v) in triples {
            if r >= rows || c >= cols {
                return Err(ReblockError::CellOutOfBounds {
                    row: r as u64 + 1,
                    col: c as u64 + 1,
                    rows: rows as u64,
                    cols: cols as u64,
                });
            }
            block.append_value(r, c, v);
        }
        block.sort_sparse_rows();
        Ok(block)
    }

    /// Clear the block and reshape it to `rows x cols` in the requested form.
    pub fn reset(&mut self, rows: usize, cols: usize, sparse: bool) {
        self.rows = rows;
        self.cols = cols;
        self.storage = if sparse {
            Storage::Sparse(vec![SparseRow::default(); rows])
        } else {
            Storage::Dense(vec![0.0; rows * cols])
        };
    }

    /// Number of rows.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Whether the block uses sparse row storage.
    #[inline]
    pub fn is_sparse(&self) -> bool {
        matches!(self.storage, Storage::Sparse(_))
    }

    /// Append a value without keeping sparse rows ordered.
    ///
    /// Dense blocks store the value in place. Sparse blocks append it to row `r`;
    /// call [`sort_sparse_rows`](Self::sort_sparse_rows) once filling is done.
    ///
    /// # Panics
    ///
    /// Panics if `(r, c)` is outside the block.
    #[inline]
    pub fn append_value(&mut self, r: usize, c: usize, v: f64) {
        assert!(r < self.rows && c < self.cols, "({r}, {c}) outside block");
        match &mut self.storage {
            Storage::Dense(values) => values[r * self.cols + c] = v,
            Storage::Sparse(rows) => rows[r].append(c, v),
        }
    }

    /// Set the value at `(r, c)`, replacing any stored entry.
    ///
    /// # Panics
    ///
    /// Panics if `(r, c)` is outside the block.
    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        assert!(r < self.rows && c < self.cols, "({r}, {c}) outside block");
        match &mut self.storage {
            Storage::Dense(values) => values[r * self.cols + c] = v,
            Storage::Sparse(rows) => rows[r].set(c, v),
        }
    }

    /// Value at `(r, c)`; zero when out of range or not stored.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        if r >= self.rows || c >= self.cols {
            return 0.0;
        }
        match &self.storage {
            Storage::Dense(values) => values[r * self.cols + c],
            Storage::Sparse(rows) => rows[r].get(c).unwrap_or(0.0),
        }
    }

    /// Number of non-zero values.
    pub fn nnz(&self) -> usize {
        match &self.storage {
            Storage::Dense(values) => values.iter().filter(|v| !v.is_zero()).count(),
            Storage::Sparse(rows) => rows
                .iter()
                .map(|row| row.values().iter().filter(|v| !v.is_zero()).count())
                .sum(),
        }
    }

    /// Sort every sparse row by column index. No-op for dense blocks.
    pub fn sort_sparse_rows(&mut self) {
        if let Storage::Sparse(rows) = &mut self.storage {
            rows.iter_mut().for_each(SparseRow::sort);
        }
    }

    /// Sparse rows, if the block is sparse.
    pub fn sparse_rows(&self) -> Option<&[SparseRow]> {
        match &self.storage {
            Storage::Sparse(rows) => Some(rows),
            Storage::Dense(_) => None,
        }
    }

    /// Row-major values, if the block is dense.
    pub fn dense_values(&self) -> Option<&[f64]> {
        match &self.storage {
            Storage::Dense(values) => Some(values),
            Storage::Sparse(_) => None,
        }
    }

    /// Row-major dense copy of the block.
    pub fn to_dense(&self) -> Vec<f64> {
        match &self.storage {
            Storage::Dense(values) => values.clone(),
            Storage::Sparse(rows) => {
                let mut out = vec![0.0; self.rows * self.cols];
                for (r, row) in rows.iter().enumerate() {
                    for (&c, &v) in row.indexes().iter().zip(row.values()) {
                        out[r * self.cols + c] = v;
                    }
                }
                out
            }
        }
    }

    /// Iterate non-zero entries as `(row, col, value)`.
    ///
    /// Rows are visited in order. Dense rows yield columns in order; sparse rows
    /// yield entries in storage order.
    pub fn iter_nonzeros(&self) -> NonZeros<'_> {
        NonZeros {
            block: self,
            row: 0,
            pos: 0,
        }
    }
}

// ============================================================================
// Non-Zero Iterator
// ============================================================================

/// Row-major iterator over the non-zero entries of a [`MatrixBlock`].
#[derive(Debug, Clone)]
pub struct NonZeros<'a> {
    block: &'a MatrixBlock,
    row: usize,
    pos: usize,
}

impl Iterator for NonZeros<'_> {
    type Item = (usize, usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        match &self.block.storage {
            Storage::Dense(values) => {
                let cols = self.block.cols;
                while self.pos < values.len() {
                    let idx = self.pos;
                    self.pos += 1;
                    if !values[idx].is_zero() {
                        return Some((idx / cols, idx % cols, values[idx]));
                    }
                }
                None
            }
            Storage::Sparse(rows) => {
                while self.row < rows.len() {
                    let row = &rows[self.row];
                    while self.pos < row.len() {
                        let pos = self.pos;
                        self.pos += 1;
                        if !row.values[pos].is_zero() {
                            return Some((self.row, row.indexes[pos], row.values[pos]));
                        }
                    }
                    self.row += 1;
                    self.pos = 0;
                }
                None
            }
        }
    }
}

// ============================================================================
// ndarray Interop
// ============================================================================

#[cfg(feature = "ndarray")]
impl<S> From<&ndarray::ArrayBase<S, ndarray::Ix2>> for MatrixBlock
where
    S: ndarray::Data<Elem = f64>,
{
    /// Copy a 2-D array into a dense block, in logical row-major order.
    fn from(array: &ndarray::ArrayBase<S, ndarray::Ix2>) -> Self {
        let (rows, cols) = array.dim();
        Self {
            rows,
            cols,
            storage: Storage::Dense(array.iter().copied().collect()),
        }
    }
}
