//! Layer 3: Engine
//!
//! # Purpose
//!
//! This layer runs a flush: it orders buffered cells by block, chooses the
//! output representation, and drives emission into the sink. It also holds
//! the validation and output types shared with the API layer.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Adapters
//!   ↓
//! Layer 3: Engine ← You are here
//!   ↓
//! Layer 2: Matrix
//!   ↓
//! Layer 1: Primitives
//! ```

/// Flush execution.
pub mod executor;

/// Output format cost model.
pub mod format;

/// Output units, sink contract, and reports.
pub mod output;

/// Validation utilities.
pub mod validator;
