// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The abort signal threaded back through dispatch.

use core::fmt;

/// Request to abandon the current processing and unwind to the top of the
/// current drain pass.
///
/// A strategy returns this from [`DispatchStrategy::dispatch`] when it needs
/// to give up on the event it is handling (for example, to leave an
/// immediate-mode UI routine part way through). The dispatcher still disposes
/// every record in the queue it is draining and returns the pooled queue before
/// handing the abort back to whoever opened the gate.
///
/// [`DispatchStrategy::dispatch`]: crate::strategy::DispatchStrategy::dispatch
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DispatchAbort {
    reason: &'static str,
}

impl DispatchAbort {
    /// Creates an abort signal with a short, static reason.
    #[must_use]
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Returns the reason given when the abort was raised.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }
}

impl fmt::Display for DispatchAbort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event processing aborted: {}", self.reason)
    }
}

impl core::error::Error for DispatchAbort {}

/// Result of any operation that may surface a [`DispatchAbort`].
pub type DispatchResult = Result<(), DispatchAbort>;
