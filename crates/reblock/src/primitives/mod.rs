//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the primitive abstractions, data structures, and
//! utility functions used throughout the crate. It has zero internal
//! dependencies within the crate.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Adapters
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Matrix
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Block coordinate arithmetic.
pub mod indexing;

/// Packed, bounded cell storage.
pub mod buffer;

/// Block-wise sorting and run scanning.
pub mod sorting;

/// Shared error types.
pub mod errors;
