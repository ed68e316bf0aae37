// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event contract the dispatcher relies on.
//!
//! The dispatcher does not own event payloads. It only needs to read a type
//! identifier, inspect and set the stop flags, and call a handful of lifecycle
//! hooks. Events are shared through [`Rc`](alloc::rc::Rc) while queued, so all
//! mutable state lives behind [`Cell`]s in an embeddable [`EventState`].
//!
//! ## Minimal example
//!
//! ```
//! use understory_event_dispatch::event::{Event, EventState, EventType};
//!
//! struct Click {
//!     state: EventState,
//! }
//!
//! impl Event for Click {
//!     fn event_type(&self) -> EventType {
//!         EventType::new(1)
//!     }
//!     fn state(&self) -> &EventState {
//!         &self.state
//!     }
//! }
//!
//! let click = Click { state: EventState::new() };
//! click.state().stop_propagation();
//! assert!(click.state().is_propagation_stopped());
//! ```

use core::cell::Cell;

use crate::pointer::PointerSample;

/// Opaque identifier of an event type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(u32);

impl EventType {
    /// The repaint notification. Dispatching it is always a no-op.
    pub const REPAINT: Self = Self(u32::MAX);

    /// Creates an event type from a raw identifier.
    ///
    /// `u32::MAX` is reserved for [`EventType::REPAINT`].
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the repaint notification.
    #[must_use]
    pub const fn is_repaint(self) -> bool {
        self.0 == Self::REPAINT.0
    }
}

bitflags::bitflags! {
    /// Propagation and lifecycle flags carried by every event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EventFlags: u16 {
        /// No further nodes should see the event after the current one.
        const PROPAGATION_STOPPED           = 0b0000_0001;
        /// No further handlers should run, not even on the current node.
        const IMMEDIATE_PROPAGATION_STOPPED = 0b0000_0010;
        /// No further strategies should run for this event.
        const DISPATCH_STOPPED              = 0b0000_0100;
        /// The default action should not be performed.
        const DEFAULT_PREVENTED             = 0b0000_1000;
        /// The dispatcher has accepted the event.
        const RECEIVED                      = 0b0001_0000;
        /// The event is between `pre_dispatch` and `post_dispatch`.
        const DISPATCHING                   = 0b0010_0000;
        /// The event has completed a dispatch.
        const DISPATCHED                    = 0b0100_0000;
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Mutable per-event state: flags plus a retain count.
///
/// Embed one in each event type and return it from [`Event::state`].
#[derive(Debug, Default)]
pub struct EventState {
    flags: Cell<EventFlags>,
    retain_count: Cell<u32>,
}

impl EventState {
    /// Creates a state with no flags set and a zero retain count.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current flags.
    #[must_use]
    pub fn flags(&self) -> EventFlags {
        self.flags.get()
    }

    /// Returns `true` if all of `flags` are set.
    #[must_use]
    pub fn contains(&self, flags: EventFlags) -> bool {
        self.flags.get().contains(flags)
    }

    /// Sets `flags`.
    pub fn insert(&self, flags: EventFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    /// Clears `flags`.
    pub fn remove(&self, flags: EventFlags) {
        self.flags.set(self.flags.get() - flags);
    }

    /// Stops propagation after the current node.
    pub fn stop_propagation(&self) {
        self.insert(EventFlags::PROPAGATION_STOPPED);
    }

    /// Stops propagation immediately, including remaining handlers on the
    /// current node.
    pub fn stop_immediate_propagation(&self) {
        self.insert(EventFlags::PROPAGATION_STOPPED | EventFlags::IMMEDIATE_PROPAGATION_STOPPED);
    }

    /// Stops the strategy chain after the current strategy.
    pub fn stop_dispatch(&self) {
        self.insert(EventFlags::DISPATCH_STOPPED);
    }

    /// Suppresses the default action.
    pub fn prevent_default(&self) {
        self.insert(EventFlags::DEFAULT_PREVENTED);
    }

    /// Returns `true` once propagation has been stopped.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.contains(EventFlags::PROPAGATION_STOPPED)
    }

    /// Returns `true` once immediate propagation has been stopped.
    #[must_use]
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.contains(EventFlags::IMMEDIATE_PROPAGATION_STOPPED)
    }

    /// Returns `true` once dispatch has been stopped.
    #[must_use]
    pub fn is_dispatch_stopped(&self) -> bool {
        self.contains(EventFlags::DISPATCH_STOPPED)
    }

    /// Returns `true` once the default action has been prevented.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.contains(EventFlags::DEFAULT_PREVENTED)
    }

    /// Returns the current retain count.
    #[must_use]
    pub fn retain_count(&self) -> u32 {
        self.retain_count.get()
    }

    /// Increments the retain count.
    pub fn retain(&self) {
        self.retain_count.set(self.retain_count.get() + 1);
    }

    /// Decrements the retain count and returns the remaining count.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero.
    pub fn release(&self) -> u32 {
        let count = self.retain_count.get();
        assert!(count > 0, "event released more times than it was retained");
        self.retain_count.set(count - 1);
        count - 1
    }
}

/// An event the dispatcher can route.
///
/// Only [`event_type`](Self::event_type) and [`state`](Self::state) are
/// required. The lifecycle hooks have default implementations in terms of
/// [`EventState`]; override them to hook pooling or instrumentation, and call
/// through to the state when doing so.
pub trait Event {
    /// The type identifier of this event.
    fn event_type(&self) -> EventType;

    /// The mutable flags and retain count of this event.
    fn state(&self) -> &EventState;

    /// The pointer sample carried by this event, if it is OS-sourced pointer
    /// input. Synthetic pointer events should return `None`.
    fn os_pointer_sample(&self) -> Option<PointerSample> {
        None
    }

    /// Called once when the dispatcher accepts the event.
    fn mark_received(&self) {
        self.state().insert(EventFlags::RECEIVED);
    }

    /// Called before the strategy chain runs.
    ///
    /// # Panics
    ///
    /// Panics if the event is already being dispatched.
    fn pre_dispatch(&self) {
        let state = self.state();
        assert!(
            !state.contains(EventFlags::DISPATCHING),
            "event dispatched while it is already being dispatched"
        );
        state.insert(EventFlags::DISPATCHING);
    }

    /// Called after the default action has run.
    fn post_dispatch(&self) {
        let state = self.state();
        state.remove(EventFlags::DISPATCHING);
        state.insert(EventFlags::DISPATCHED);
    }

    /// Called when the event is queued; must be balanced by one
    /// [`dispose`](Self::dispose).
    fn acquire(&self) {
        self.state().retain();
    }

    /// Called once after a queued event has been processed.
    fn dispose(&self) {
        self.state().release();
    }
}
