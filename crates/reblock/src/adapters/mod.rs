//! Layer 4: Adapters
//!
//! # Purpose
//!
//! This layer connects the flush engine to downstream consumers:
//!
//! - **Closures**: Any `FnMut(BlockIndex, Tagged<ReblockValue>) -> Result<(), E>`
//! - **CollectSink**: In-memory collection, mostly for tests and small jobs
//! - **ChannelSink**: Bounded hand-off to another thread (`std` only)
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Adapters ← You are here
//!   ↓
//! Layer 3: Engine
//!   ↓
//! Layer 2: Matrix
//!   ↓
//! Layer 1: Primitives
//! ```

/// Sink trait and stock sinks.
pub mod sink;
