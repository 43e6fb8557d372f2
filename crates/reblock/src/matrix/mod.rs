//! Layer 2: Matrix
//!
//! # Purpose
//!
//! This layer provides the matrix fragment type consumed on import and
//! produced on the blocked emission path, and the rule that picks its
//! sparse or dense form.
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
//! Layer 2: Matrix ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Dense/sparse matrix fragments.
pub mod block;

/// Sparse-versus-dense classification.
pub mod density;
