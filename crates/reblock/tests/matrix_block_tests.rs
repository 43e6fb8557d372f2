//! Tests for matrix fragments and the density rule.
//!
//! ## Test Organization
//!
//! 1. **Construction** - Dense values, triples, shape errors
//! 2. **Access** - get/set, non-zero counting, dense copies
//! 3. **Sparse Rows** - Append order and sorting
//! 4. **Iteration** - Non-zero iteration order
//! 5. **Density Rule** - Turn point, size check, policies

use approx::assert_relative_eq;
use reblock::prelude::*;

// ============================================================================
// Construction Tests
// ============================================================================

/// Test dense construction checks the value count.
#[test]
fn test_from_dense_shape_mismatch() {
    let result = MatrixBlock::from_dense(2, 3, vec![1.0; 5]);

    assert_eq!(
        result.unwrap_err(),
        ReblockError::ShapeMismatch {
            expected: 6,
            got: 5
        }
    );
}

/// Test triples outside the fragment are rejected.
#[test]
fn test_from_triples_out_of_bounds() {
    let result = MatrixBlock::from_triples(2, 2, [(0, 0, 1.0), (2, 0, 1.0)]);

    assert!(matches!(
        result,
        Err(ReblockError::CellOutOfBounds { row: 3, col: 1, .. })
    ));
}

/// Test new blocks are all zero in the requested form.
#[test]
fn test_new_block_is_empty() {
    let dense = MatrixBlock::new(3, 4, false);
    let sparse = MatrixBlock::new(3, 4, true);

    assert!(!dense.is_sparse());
    assert!(sparse.is_sparse());
    assert_eq!(dense.dense_values().map(<[f64]>::len), Some(12));
    assert_eq!(sparse.sparse_rows().map(<[SparseRow]>::len), Some(3));
    assert_eq!(dense.nnz(), 0);
    assert_eq!(sparse.nnz(), 0);
}

/// Test reset reshapes and clears a block.
#[test]
fn test_reset() {
    let mut block = MatrixBlock::from_dense(1, 2, vec![1.0, 2.0]).unwrap();
    block.reset(4, 5, true);

    assert_eq!((block.num_rows(), block.num_cols()), (4, 5));
    assert!(block.is_sparse());
    assert_eq!(block.nnz(), 0);
}

// ============================================================================
// Access Tests
// ============================================================================

/// Test get and set on both forms.
///
/// Verifies:
/// - Set replaces an existing sparse entry instead of appending
/// - Get outside the block is zero
#[test]
fn test_get_set() {
    for sparse in [false, true] {
        let mut block = MatrixBlock::new(3, 3, sparse);
        block.set(1, 2, 4.0);
        block.set(1, 2, 5.0);

        assert_relative_eq!(block.get(1, 2), 5.0);
        assert_relative_eq!(block.get(0, 0), 0.0);
        assert_relative_eq!(block.get(7, 7), 0.0);
        assert_eq!(block.nnz(), 1);
    }
}

/// Test dense copy of a sparse block.
#[test]
fn test_to_dense() {
    let block = MatrixBlock::from_triples(2, 3, [(1, 2, 3.0), (0, 1, 1.0)]).unwrap();

    assert_eq!(block.to_dense(), vec![0.0, 1.0, 0.0, 0.0, 0.0, 3.0]);
}

/// Test stored zeros do not count as non-zeros.
#[test]
fn test_nnz_ignores_stored_zeros() {
    let dense = MatrixBlock::from_dense(2, 2, vec![0.0, 1.0, 0.0, 2.0]).unwrap();
    let sparse = MatrixBlock::from_triples(2, 2, [(0, 0, 0.0), (1, 1, 2.0)]).unwrap();

    assert_eq!(dense.nnz(), 2);
    assert_eq!(sparse.nnz(), 1);
}

// ============================================================================
// Sparse Row Tests
// ============================================================================

/// Test appends keep arrival order until sorted.
#[test]
fn test_sparse_row_append_and_sort() {
    let mut block = MatrixBlock::new(2, 10, true);
    for (c, v) in [(9, 1.0), (3, 2.0), (7, 3.0)] {
        block.append_value(0, c, v);
    }

    let row = &block.sparse_rows().unwrap()[0];
    assert_eq!(row.indexes(), &[9, 3, 7]);
    assert!(!row.is_sorted());

    block.sort_sparse_rows();
    let row = &block.sparse_rows().unwrap()[0];
    assert_eq!(row.indexes(), &[3, 7, 9]);
    assert_eq!(row.values(), &[2.0, 3.0, 1.0]);
    assert!(row.is_sorted());
    assert_eq!(row.len(), 3);
    assert!(block.sparse_rows().unwrap()[1].is_empty());
}

/// Test the sparse row type on its own.
#[test]
fn test_sparse_row_standalone() {
    let mut row = SparseRow::default();
    row.append(4, 1.0);
    row.append(2, 2.0);
    row.append(4, 3.0);
    row.sort();

    assert_eq!(row.indexes(), &[2, 4, 4]);
    assert_eq!(row.values(), &[2.0, 1.0, 3.0], "Sort should be stable");
}

/// Test triples come back with sorted rows.
#[test]
fn test_from_triples_sorts_rows() {
    let block = MatrixBlock::from_triples(1, 5, [(0, 4, 1.0), (0, 0, 2.0)]).unwrap();

    assert!(block.sparse_rows().unwrap()[0].is_sorted());
}

// ============================================================================
// Iteration Tests
// ============================================================================

/// Test non-zero iteration over a dense block.
#[test]
fn test_iter_nonzeros_dense() {
    let block = MatrixBlock::from_dense(2, 3, vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0]).unwrap();
    let entries: Vec<_> = block.iter_nonzeros().collect();

    assert_eq!(entries, vec![(0, 1, 1.0), (1, 0, 2.0), (1, 2, 3.0)]);
}

/// Test non-zero iteration over a sparse block with empty rows.
#[test]
fn test_iter_nonzeros_sparse() {
    let block =
        MatrixBlock::from_triples(4, 3, [(3, 0, 4.0), (1, 2, 1.0), (1, 1, 0.0)]).unwrap();
    let entries: Vec<_> = block.iter_nonzeros().collect();

    assert_eq!(entries, vec![(1, 2, 1.0), (3, 0, 4.0)]);
}

/// Test iteration over an empty block.
#[test]
fn test_iter_nonzeros_empty() {
    assert_eq!(MatrixBlock::new(0, 0, false).iter_nonzeros().count(), 0);
    assert_eq!(MatrixBlock::new(5, 5, true).iter_nonzeros().count(), 0);
}

// ============================================================================
// Density Rule Tests
// ============================================================================

/// Test the default turn point rule.
///
/// Verifies:
/// - Sparse below the turn point when sparse storage is smaller
/// - Dense at or above the turn point
/// - Dense when sparse storage would be larger
/// - Column vectors are always dense
#[test]
fn test_turn_point_rule() {
    let rule = SparsityTurnPoint::default();

    assert_relative_eq!(rule.turn_point, 0.4);
    assert!(rule.is_sparse(10, 10, 10));
    assert!(!rule.is_sparse(10, 10, 40));
    assert!(!rule.is_sparse(4, 4, 4), "Sparse overhead exceeds dense size");
    assert!(!rule.is_sparse(1000, 1, 1));
    assert!(!rule.is_sparse(0, 5, 0));
}

/// Test policy dispatch and equality.
#[test]
fn test_density_policy() {
    fn never(_: usize, _: usize, _: u64) -> bool {
        false
    }

    assert!(DensityPolicy::AlwaysSparse.is_sparse(1, 1, 1));
    assert!(!DensityPolicy::AlwaysDense.is_sparse(100, 100, 0));
    assert!(!DensityPolicy::Custom(never).is_sparse(100, 100, 0));
    assert!(DensityPolicy::default().is_sparse(1000, 1000, 10));

    assert_eq!(
        DensityPolicy::default(),
        DensityPolicy::TurnPoint(SparsityTurnPoint { turn_point: 0.4 })
    );
    assert_ne!(DensityPolicy::AlwaysSparse, DensityPolicy::AlwaysDense);
}
