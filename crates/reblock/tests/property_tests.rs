//! Property tests for the reblock buffer.
//!
//! ## Test Organization
//!
//! 1. **Completeness** - Every appended cell is emitted exactly once
//! 2. **Capacity** - Imports never leave more than `capacity` cells buffered

use proptest::prelude::*;
use reblock::prelude::*;

use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

fn cells(max_dim: u64) -> impl Strategy<Value = BTreeMap<(u64, u64), f64>> {
    prop::collection::btree_map((1..=max_dim, 1..=max_dim), 1.0f64..100.0, 0..200)
}

// ============================================================================
// Completeness
// ============================================================================

proptest! {
    /// Every distinct appended cell comes back exactly once with its value,
    /// and keys leave the buffer in block order.
    #[test]
    fn prop_flush_emits_every_cell_once(
        input in cells(50),
        block_rows in 1usize..12,
        block_cols in 1usize..12,
    ) {
        let mut buffer = Reblock::new()
            .dimensions(50, 50)
            .block_size(block_rows, block_cols)
            .capacity(256)
            .build()
            .unwrap();
        for (&(row, col), &value) in &input {
            buffer.append_cell(row, col, value).unwrap();
        }

        let geometry = *buffer.geometry();
        let mut sink = CollectSink::new();
        let report = buffer.flush(0, &mut sink).unwrap();
        prop_assert_eq!(report.map_or(0, |r| r.cells), input.len());

        let mut output = BTreeMap::new();
        let mut emitted = 0usize;
        for emission in sink.emissions() {
            match &emission.value.value {
                ReblockValue::Block(block) => {
                    let (rows, cols) = geometry.block_dims(emission.key);
                    prop_assert_eq!((block.num_rows(), block.num_cols()), (rows, cols));
                    for (r, c, v) in block.iter_nonzeros() {
                        output.insert(geometry.global_of(emission.key, r, c), v);
                        emitted += 1;
                    }
                }
                ReblockValue::Cell(cell) => {
                    output.insert(geometry.global_of(emission.key, cell.row, cell.col), cell.value);
                    emitted += 1;
                }
            }
        }

        prop_assert_eq!(emitted, input.len());
        prop_assert_eq!(output, input);
        prop_assert!(sink.emissions().windows(2).all(|w| w[0].key <= w[1].key));
        prop_assert!(buffer.is_empty());
    }
}

// ============================================================================
// Capacity
// ============================================================================

proptest! {
    /// Importing `n` non-zeros into an empty buffer flushes `n / capacity`
    /// times and leaves `n % capacity` cells behind.
    #[test]
    fn prop_import_respects_capacity(
        rows in 1usize..20,
        cols in 1usize..20,
        capacity in 1usize..40,
    ) {
        let fragment = MatrixBlock::from_dense(rows, cols, vec![1.5; rows * cols]).unwrap();
        let mut buffer = Reblock::new()
            .dimensions(20, 20)
            .block_size(3, 3)
            .capacity(capacity)
            .build()
            .unwrap();
        let mut sink = CollectSink::new();

        buffer.import_region(1, 1, &fragment, 0, &mut sink).unwrap();

        let nnz = rows * cols;
        prop_assert_eq!(buffer.stats().auto_flushes as usize, nnz / capacity);
        prop_assert_eq!(buffer.size(), nnz % capacity);
        prop_assert!(buffer.size() < capacity);
    }
}
