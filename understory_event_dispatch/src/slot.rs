// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A lazily built, resettable default dispatcher.
//!
//! Most code should pass an [`EventDispatcher`] around explicitly. For the
//! top level of an application a single default instance is convenient; keep a
//! [`DispatcherSlot`] in a `thread_local!` and call [`get`](DispatcherSlot::get).
//!
//! ```
//! use understory_event_dispatch::dispatcher::EventDispatcher;
//! use understory_event_dispatch::event::{Event, EventState, EventType};
//! use understory_event_dispatch::slot::DispatcherSlot;
//! use understory_event_dispatch::strategy::StrategyChain;
//!
//! struct Ev(EventState);
//! impl Event for Ev {
//!     fn event_type(&self) -> EventType { EventType::new(0) }
//!     fn state(&self) -> &EventState { &self.0 }
//! }
//!
//! fn build() -> EventDispatcher<Ev, u32> {
//!     EventDispatcher::new(StrategyChain::new())
//! }
//!
//! thread_local! {
//!     static DISPATCHER: DispatcherSlot<Ev, u32> = const { DispatcherSlot::new(build) };
//! }
//!
//! DISPATCHER.with(|slot| {
//!     assert!(!slot.is_initialized());
//!     let d = slot.get();
//!     assert_eq!(d.gate_count(), 0);
//!     slot.reset();
//!     assert!(!slot.is_initialized());
//! });
//! ```

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use crate::dispatcher::EventDispatcher;
use crate::event::Event;

/// Holds an [`EventDispatcher`] built on first use.
pub struct DispatcherSlot<E, S> {
    init: fn() -> EventDispatcher<E, S>,
    instance: RefCell<Option<Rc<EventDispatcher<E, S>>>>,
}

impl<E, S> fmt::Debug for DispatcherSlot<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherSlot")
            .field("instance", &self.instance.borrow())
            .finish_non_exhaustive()
    }
}

impl<E, S> DispatcherSlot<E, S> {
    /// Creates an empty slot that will call `init` on first use.
    #[must_use]
    pub const fn new(init: fn() -> EventDispatcher<E, S>) -> Self {
        Self {
            init,
            instance: RefCell::new(None),
        }
    }

    /// Returns the dispatcher, building it if needed.
    pub fn get(&self) -> Rc<EventDispatcher<E, S>> {
        let mut instance = self.instance.borrow_mut();
        Rc::clone(instance.get_or_insert_with(|| Rc::new((self.init)())))
    }

    /// Returns `true` once the dispatcher has been built.
    pub fn is_initialized(&self) -> bool {
        self.instance.borrow().is_some()
    }
}

impl<E: Event, S> DispatcherSlot<E, S> {
    /// Clears the current dispatcher, disposing its pending events. The next
    /// [`get`](Self::get) builds a new one.
    ///
    /// Handles obtained earlier keep the old, now empty, instance alive.
    pub fn reset(&self) {
        let old = self.instance.borrow_mut().take();
        if let Some(dispatcher) = old {
            dispatcher.reset();
        }
    }
}
