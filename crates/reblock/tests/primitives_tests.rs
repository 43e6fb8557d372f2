#![cfg(feature = "dev")]
//! Tests for block indexing, cell storage, and block-wise sorting.
//!
//! ## Test Organization
//!
//! 1. **Indexing** - Block index, local index, clipping
//! 2. **Geometry** - Block lookup, dimensions, grid size
//! 3. **Cell Buffer** - Capacity and value packing
//! 4. **Sorting** - Block order, stability, runs

use reblock::internals::primitives::buffer::{CellBuffer, PackedCell};
use reblock::internals::primitives::errors::ReblockError;
use reblock::internals::primitives::indexing::{
    block_index, clipped_len, index_in_block, BlockGeometry, BlockIndex,
};
use reblock::internals::primitives::sorting::{
    block_runs, count_blocks, is_block_sorted, sort_by_block,
};

// ============================================================================
// Indexing Tests
// ============================================================================

/// Test 1-based block index and 0-based in-block index.
#[test]
fn test_block_and_local_index() {
    assert_eq!(block_index(1, 4), 1);
    assert_eq!(block_index(4, 4), 1);
    assert_eq!(block_index(5, 4), 2);
    assert_eq!(index_in_block(1, 4), 0);
    assert_eq!(index_in_block(4, 4), 3);
    assert_eq!(index_in_block(5, 4), 0);
    assert_eq!(block_index(7, 1), 7);
}

/// Test edge block clipping.
#[test]
fn test_clipped_len() {
    assert_eq!(clipped_len(10, 1, 4), 4);
    assert_eq!(clipped_len(10, 2, 4), 4);
    assert_eq!(clipped_len(10, 3, 4), 2);
    assert_eq!(clipped_len(8, 2, 4), 4);
    assert_eq!(clipped_len(3, 1, 1000), 3);
}

// ============================================================================
// Geometry Tests
// ============================================================================

/// Test geometry lookups.
///
/// Verifies block lookup, local position, clipped dimensions, and the inverse
/// mapping back to global coordinates.
#[test]
fn test_geometry_mapping() {
    let geometry = BlockGeometry::new(10, 7, 4, 3);

    assert_eq!(geometry.block_of(9, 7), BlockIndex::new(3, 3));
    assert_eq!(geometry.local_of(9, 7), (0, 0));
    assert_eq!(geometry.block_dims(BlockIndex::new(3, 3)), (2, 1));
    assert_eq!(geometry.block_dims(BlockIndex::new(1, 2)), (4, 3));
    assert_eq!(geometry.global_of(BlockIndex::new(3, 3), 1, 0), (10, 7));
    assert_eq!(geometry.grid_dims(), (3, 3));

    assert!(geometry.contains(10, 7));
    assert!(!geometry.contains(0, 1));
    assert!(!geometry.contains(11, 1));
}

/// Test block indices order row-major.
#[test]
fn test_block_index_order() {
    assert!(BlockIndex::new(1, 9) < BlockIndex::new(2, 1));
    assert!(BlockIndex::new(2, 1) < BlockIndex::new(2, 2));
    assert_eq!(BlockIndex::new(3, 4).to_string(), "(3, 4)");
}

// ============================================================================
// Cell Buffer Tests
// ============================================================================

/// Test the buffer refuses cells beyond its capacity.
#[test]
fn test_cell_buffer_capacity() {
    let mut buffer = CellBuffer::with_capacity(2);
    buffer.push(PackedCell::new(1, 1, 1.0)).unwrap();
    buffer.push(PackedCell::new(1, 2, 2.0)).unwrap();

    assert!(buffer.is_full());
    assert_eq!(
        buffer.push(PackedCell::new(1, 3, 3.0)),
        Err(ReblockError::BufferFull { capacity: 2 })
    );

    buffer.clear();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 2);
}

/// Test values survive packing bit for bit.
#[test]
fn test_packed_cell_value() {
    for value in [0.0, -0.0, 1.5, f64::MIN_POSITIVE, f64::NAN] {
        let cell = PackedCell::new(3, 4, value);
        assert_eq!(cell.value().to_bits(), value.to_bits());
    }
}

// ============================================================================
// Sorting Tests
// ============================================================================

/// Test block-wise sort is stable within a block.
#[test]
fn test_sort_by_block_stable() {
    let geometry = BlockGeometry::new(8, 8, 4, 4);
    let mut cells = vec![
        PackedCell::new(5, 5, 1.0),
        PackedCell::new(2, 2, 2.0),
        PackedCell::new(6, 6, 3.0),
        PackedCell::new(1, 1, 4.0),
        PackedCell::new(1, 8, 5.0),
    ];

    assert!(!is_block_sorted(&cells, &geometry));
    sort_by_block(&mut cells, &geometry);
    assert!(is_block_sorted(&cells, &geometry));

    let values: Vec<f64> = cells.iter().map(PackedCell::value).collect();
    assert_eq!(values, vec![2.0, 4.0, 5.0, 1.0, 3.0]);
}

/// Test runs cover each block once.
#[test]
fn test_block_runs() {
    let geometry = BlockGeometry::new(8, 8, 4, 4);
    let mut cells = vec![
        PackedCell::new(5, 5, 1.0),
        PackedCell::new(2, 2, 2.0),
        PackedCell::new(6, 6, 3.0),
        PackedCell::new(1, 1, 4.0),
    ];
    sort_by_block(&mut cells, &geometry);

    let runs: Vec<(BlockIndex, usize)> = block_runs(&cells, &geometry)
        .map(|(ix, run)| (ix, run.len()))
        .collect();

    assert_eq!(
        runs,
        vec![(BlockIndex::new(1, 1), 2), (BlockIndex::new(2, 2), 2)]
    );
    assert_eq!(count_blocks(&cells, &geometry), 2);
    assert_eq!(count_blocks(&[], &geometry), 0);
}

/// Test the parallel sort produces the sequential order.
#[cfg(feature = "parallel")]
#[test]
fn test_par_sort_matches_sequential() {
    use reblock::internals::primitives::sorting::par_sort_by_block;

    let geometry = BlockGeometry::new(100, 100, 7, 9);
    let cells: Vec<PackedCell> = (0..5000u64)
        .map(|i| PackedCell::new((i * 37) % 100 + 1, (i * 53) % 100 + 1, i as f64))
        .collect();

    let mut sequential = cells.clone();
    let mut parallel = cells;
    sort_by_block(&mut sequential, &geometry);
    par_sort_by_block(&mut parallel, &geometry);

    assert_eq!(sequential, parallel);
}
