// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reentrancy gate.
//!
//! While the gate count is above zero, queued dispatches are deferred. Opening
//! the last gate (count `1 → 0`) runs exactly one drain pass. Every processed
//! event holds a gate for its whole duration, so a drain never starts in the
//! middle of an event; it starts right after the outermost event finishes.
//!
//! Callers can hold a gate themselves to batch a group of dispatches:
//!
//! ```
//! # use std::rc::Rc;
//! # use understory_event_dispatch::dispatcher::{DispatchMode, EventDispatcher};
//! # use understory_event_dispatch::event::{Event, EventState, EventType};
//! # use understory_event_dispatch::strategy::StrategyChain;
//! # struct Ev(EventState);
//! # impl Event for Ev {
//! #     fn event_type(&self) -> EventType { EventType::new(0) }
//! #     fn state(&self) -> &EventState { &self.0 }
//! # }
//! let d: EventDispatcher<Ev, ()> = EventDispatcher::new(StrategyChain::new());
//!
//! let gate = d.gate();
//! d.dispatch(&Rc::new(Ev(EventState::new())), &(), DispatchMode::Queued).unwrap();
//! d.dispatch(&Rc::new(Ev(EventState::new())), &(), DispatchMode::Queued).unwrap();
//! assert_eq!(d.queued_len(), 2);
//!
//! gate.open().unwrap();
//! assert_eq!(d.queued_len(), 0);
//! assert_eq!(d.stats().processed, 2);
//! ```

use core::fmt;

use crate::dispatcher::EventDispatcher;
use crate::error::DispatchResult;
use crate::event::Event;

/// Scoped hold on a dispatcher's gate.
///
/// Created by [`EventDispatcher::gate`]. Release it with
/// [`open`](Self::open), which reports any abort from the drain it triggers.
/// If the guard is dropped instead (for example while unwinding from a
/// panic), the count is still restored but nothing is drained; pending events
/// stay queued for the next drain.
#[must_use = "dropping the guard reopens the gate without draining"]
pub struct DispatchGate<'a, E: Event, S> {
    dispatcher: &'a EventDispatcher<E, S>,
    opened: bool,
}

impl<E: Event, S> fmt::Debug for DispatchGate<'_, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchGate")
            .field("gate_count", &self.dispatcher.gate_count())
            .field("opened", &self.opened)
            .finish()
    }
}

impl<E: Event, S> DispatchGate<'_, E, S> {
    /// Reopens the gate, draining the queue if this was the last one.
    pub fn open(mut self) -> DispatchResult {
        self.opened = true;
        self.dispatcher.open_gate()
    }
}

impl<E: Event, S> Drop for DispatchGate<'_, E, S> {
    fn drop(&mut self) {
        if !self.opened {
            tracing::warn!("dispatch gate dropped without being opened; skipping drain");
            let count = self.dispatcher.gate_count.get();
            self.dispatcher.gate_count.set(count.saturating_sub(1));
        }
    }
}

impl<E: Event, S> EventDispatcher<E, S> {
    /// Closes the gate and returns a guard that reopens it.
    pub fn gate(&self) -> DispatchGate<'_, E, S> {
        self.close_gate();
        DispatchGate {
            dispatcher: self,
            opened: false,
        }
    }

    /// Increments the gate count, deferring queued dispatches.
    ///
    /// Must be balanced by [`open_gate`](Self::open_gate).
    pub fn close_gate(&self) {
        self.gate_count.set(self.gate_count.get() + 1);
    }

    /// Decrements the gate count; when it reaches zero, drains the queue.
    ///
    /// Opening a gate that is already open leaves the count at zero and still
    /// drains. This happens when [`reset`](Self::reset) runs while a gate is
    /// held, for example from inside a strategy.
    ///
    /// Returns the first abort raised during that drain.
    pub fn open_gate(&self) -> DispatchResult {
        let count = self.gate_count.get();
        if count == 0 {
            tracing::debug!("dispatch gate opened while already open");
        }
        self.gate_count.set(count.saturating_sub(1));
        if count <= 1 {
            self.drain_queue()
        } else {
            Ok(())
        }
    }
}
