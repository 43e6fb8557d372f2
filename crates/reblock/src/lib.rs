//! # reblock — Re-blocking Buffer for Sparse Matrix Cells
//!
//! A bounded in-memory buffer that collects matrix cells produced by a worker
//! task, groups them into fixed-size rectangular blocks, and emits them to a
//! downstream sink either as whole blocks or as individual cell records,
//! whichever serializes smaller.
//!
//! ## What is re-blocking?
//!
//! Distributed matrix engines store a large matrix as a grid of fixed-size
//! blocks (say 1000×1000), each addressed by a 1-based `(block_row, block_col)`
//! pair. A task that produces cells in arbitrary order (a transpose, a
//! reshape, a text reader) has to route every cell to the block that owns it.
//! Buffering cells, sorting them by block, and emitting one block per run
//! keeps the intermediate data small when many cells share a block; when
//! almost every cell lands in its own block (ultra-sparse data), plain cell
//! records are cheaper, and the buffer switches to those.
//!
//! ## Quick Start
//!
//! ```rust
//! use reblock::prelude::*;
//!
//! // 8x8 matrix in 4x4 blocks
//! let mut buffer = Reblock::new()
//!     .dimensions(8, 8)
//!     .block_size(4, 4)
//!     .capacity(1024)
//!     .build()?;
//!
//! // cells use global 1-based indices
//! for i in 1..=4 {
//!     buffer.append_cell(i, i, i as f64)?;
//! }
//! buffer.append_cell(5, 5, 2.0)?;
//!
//! let mut sink = CollectSink::new();
//! let report = buffer.flush(0, &mut sink).unwrap().unwrap();
//!
//! assert_eq!(report.cells, 5);
//! assert_eq!(report.blocks, 2);
//! assert_eq!(report.format, OutputFormat::Blocked);
//! assert_eq!(sink.emissions()[0].key, BlockIndex::new(1, 1));
//! assert_eq!(sink.emissions()[1].key, BlockIndex::new(2, 2));
//! assert!(buffer.is_empty());
//! # Result::<(), ReblockError>::Ok(())
//! ```
//!
//! ### Importing fragments and automatic flushing
//!
//! `import_region` copies the non-zeros of a [`MatrixBlock`](prelude::MatrixBlock)
//! into the buffer and flushes on its own whenever the buffer fills up:
//!
//! ```rust
//! use reblock::prelude::*;
//! use std::convert::Infallible;
//!
//! let mut buffer = Reblock::new()
//!     .dimensions(10, 10)
//!     .block_size(4, 4)
//!     .capacity(3)
//!     .build()?;
//!
//! let fragment = MatrixBlock::from_dense(2, 3, vec![1.0, 0.0, 2.0, 3.0, 4.0, 0.0])?;
//!
//! let mut emitted = 0;
//! let mut sink = |_key: BlockIndex, _value: Tagged<ReblockValue>| -> Result<(), Infallible> {
//!     emitted += 1;
//!     Ok(())
//! };
//!
//! // local (i, j) lands at global (9 + i, 8 + j)
//! buffer.import_region(9, 8, &fragment, 7, &mut sink).unwrap();
//! buffer.flush(7, &mut sink).unwrap();
//!
//! assert_eq!(buffer.stats().auto_flushes, 1);
//! assert_eq!(buffer.stats().cells, 4);
//! assert_eq!(emitted, 4);
//! # Result::<(), ReblockError>::Ok(())
//! ```
//!
//! ## Result and Error Handling
//!
//! * Configuration and input problems are [`ReblockError`](prelude::ReblockError)s.
//! * `flush` returns the sink's own error type unchanged.
//! * `import_region` can fail both ways and returns
//!   [`EmitError`](prelude::EmitError).
//!
//! Nothing is retried or rolled back. A buffer whose flush failed must be
//! dropped together with the task that owns it.
//!
//! ## Cargo Features
//!
//! * `std` (default): `std::error::Error` impls and [`ChannelSink`](prelude::ChannelSink).
//! * `parallel`: sort the buffer with rayon (stable, same output order).
//! * `ndarray`: build dense fragments from `ndarray` 2-D arrays.
//! * `serde`: (de)serialize [`ReblockConfig`](prelude::ReblockConfig).
//!
//! Without `std` the crate is `no_std` + `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - cell storage, indexing, sorting, errors.
mod primitives;

// Layer 2: Matrix - fragments and density classification.
mod matrix;

// Layer 3: Engine - validation, format decision, flush execution.
mod engine;

// Layer 4: Adapters - sinks.
mod adapters;

// High-level builder and buffer API.
mod api;

// Standard reblock prelude.
pub mod prelude {
    #[cfg(feature = "std")]
    pub use crate::api::ChannelSink;
    pub use crate::api::{
        BlockGeometry, BlockIndex, CollectSink, DensityFn, DensityOracle, DensityPolicy, EmitError,
        Emission, FlushReport, FormatCosts, MatrixBlock, OutputFormat, PartialCell, ReblockBuffer,
        ReblockBuilder as Reblock, ReblockConfig, ReblockError, ReblockSink, ReblockStats,
        ReblockValue, SparseRow, SparsityTurnPoint, Tagged, DEFAULT_CAPACITY,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod matrix {
        pub use crate::matrix::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
