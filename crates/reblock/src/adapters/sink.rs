//! Downstream sinks for flushed output.
//!
//! ## Purpose
//!
//! A flush hands every output unit to a [`ReblockSink`] one at a time. This
//! module provides the stock sinks: closures, an in-memory collector, and
//! (with `std`) a bounded channel.
//!
//! ## Design notes
//!
//! * **Synchronous**: `emit` is a blocking call-and-return; a bounded channel is
//!   the only backpressure beyond the buffer capacity.
//! * **Typed failures**: Each sink names its own error type, which the buffer
//!   propagates unchanged.
//!
//! ## Invariants
//!
//! * A sink may be called any number of times per flush, including zero.
//! * After a sink error, no further units of that flush are emitted.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::sync::mpsc::{SendError, SyncSender};
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::convert::Infallible;

// Internal dependencies
use crate::engine::output::{ReblockSink, ReblockValue, Tagged};
use crate::primitives::indexing::BlockIndex;

// ============================================================================
// Closure Sink
// ============================================================================

impl<F, E> ReblockSink for F
where
    F: FnMut(BlockIndex, Tagged<ReblockValue>) -> Result<(), E>,
{
    type Error = E;

    #[inline]
    fn emit(&mut self, key: BlockIndex, value: Tagged<ReblockValue>) -> Result<(), E> {
        self(key, value)
    }
}

// ============================================================================
// Collecting Sink
// ============================================================================

/// One emitted unit with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// Block coordinate.
    pub key: BlockIndex,
    /// Tagged block or cell record.
    pub value: Tagged<ReblockValue>,
}

/// Sink that keeps every emission in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct CollectSink {
    emissions: Vec<Emission>,
}

impl CollectSink {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emissions received so far.
    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    /// Number of emissions received.
    pub fn len(&self) -> usize {
        self.emissions.len()
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    /// Take the emissions, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Emission> {
        core::mem::take(&mut self.emissions)
    }

    /// Consume the collector.
    pub fn into_emissions(self) -> Vec<Emission> {
        self.emissions
    }
}

impl ReblockSink for CollectSink {
    type Error = Infallible;

    #[inline]
    fn emit(&mut self, key: BlockIndex, value: Tagged<ReblockValue>) -> Result<(), Infallible> {
        self.emissions.push(Emission { key, value });
        Ok(())
    }
}

// ============================================================================
// Channel Sink
// ============================================================================

/// Sink that forwards emissions over a bounded channel.
///
/// `emit` blocks while the channel is full and fails once the receiver is gone.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: SyncSender<Emission>,
}

#[cfg(feature = "std")]
impl ChannelSink {
    /// Wrap the sending half of a `std::sync::mpsc::sync_channel`.
    pub fn new(sender: SyncSender<Emission>) -> Self {
        Self { sender }
    }
}

#[cfg(feature = "std")]
impl ReblockSink for ChannelSink {
    type Error = SendError<Emission>;

    #[inline]
    fn emit(&mut self, key: BlockIndex, value: Tagged<ReblockValue>) -> Result<(), Self::Error> {
        self.sender.send(Emission { key, value })
    }
}
