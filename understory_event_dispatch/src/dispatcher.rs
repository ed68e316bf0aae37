// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event dispatcher: immediate-vs-queued decisions, the drain loop, and
//! per-event processing.
//!
//! ## Ordering
//!
//! Events dispatched while the dispatcher is gated are queued. When the last
//! gate opens, the active queue is swapped for a fresh one from the pool and
//! the detached queue is drained one record at a time. Processing a record
//! closes the gate again, so anything raised while it runs lands in the *new*
//! queue and is drained as soon as that record finishes. The result is
//! depth-first per event:
//!
//! - An event and everything it transitively raises complete, in emission
//!   order, before the next sibling in the detached queue starts.
//! - The detached queue is never appended to while it is being drained.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_event_dispatch::dispatcher::{DispatchMode, EventDispatcher};
//! use understory_event_dispatch::error::DispatchResult;
//! use understory_event_dispatch::event::{Event, EventState, EventType};
//! use understory_event_dispatch::strategy::{DispatchStrategy, StrategyChain};
//!
//! struct Ev {
//!     name: &'static str,
//!     state: EventState,
//! }
//!
//! impl Event for Ev {
//!     fn event_type(&self) -> EventType {
//!         EventType::new(1)
//!     }
//!     fn state(&self) -> &EventState {
//!         &self.state
//!     }
//! }
//!
//! fn ev(name: &'static str) -> Rc<Ev> {
//!     Rc::new(Ev { name, state: EventState::new() })
//! }
//!
//! // Records every event it sees; "a" raises "b" and "c" while it is handled.
//! struct Log(Rc<RefCell<Vec<&'static str>>>);
//!
//! impl DispatchStrategy<Ev, ()> for Log {
//!     fn can_dispatch(&self, _: &Ev) -> bool {
//!         true
//!     }
//!     fn dispatch(&self, d: &EventDispatcher<Ev, ()>, e: &Ev, _: &()) -> DispatchResult {
//!         self.0.borrow_mut().push(e.name);
//!         if e.name == "a" {
//!             d.dispatch(&ev("b"), &(), DispatchMode::Queued)?;
//!             d.dispatch(&ev("c"), &(), DispatchMode::Queued)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let d = EventDispatcher::new(StrategyChain::new().with(Log(seen.clone())));
//!
//! d.close_gate();
//! d.dispatch(&ev("a"), &(), DispatchMode::Queued).unwrap();
//! d.dispatch(&ev("d"), &(), DispatchMode::Queued).unwrap();
//! d.open_gate().unwrap();
//!
//! assert_eq!(*seen.borrow(), ["a", "b", "c", "d"]);
//! ```

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;

use crate::config::DispatcherConfig;
use crate::context::DispatchContext;
use crate::error::DispatchResult;
use crate::event::Event;
use crate::pointer::{PointerId, PointerPositions};
use crate::pool::{PoolStats, QueuePool};
use crate::record::{EventQueue, EventRecord};
use crate::strategy::StrategyChain;

/// How a single [`EventDispatcher::dispatch`] call should treat its event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Process now if the dispatcher is ungated, otherwise queue.
    #[default]
    Queued,
    /// Process now, even while gated.
    Immediate,
}

/// Hook run once per processed event after the strategy chain.
pub type DefaultAction<E, S> = dyn Fn(&EventDispatcher<E, S>, &E, &S);

/// Running counters, mostly useful in tests and diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    /// Events appended to a queue.
    pub enqueued: u64,
    /// Events that went through the strategy chain (queued or immediate).
    pub processed: u64,
    /// Drain passes started.
    pub drain_passes: u64,
    /// Abort signals dropped because another abort was already pending.
    pub suppressed_aborts: u64,
}

/// Routes events through a [`StrategyChain`], deferring events raised during
/// processing so they are handled in emission order.
///
/// All methods take `&self`: strategies receive the dispatcher while it is
/// processing and may call [`dispatch`](Self::dispatch) on it. The dispatcher
/// is single-threaded.
pub struct EventDispatcher<E, S> {
    pub(crate) strategies: StrategyChain<E, S>,
    pub(crate) default_action: Option<Box<DefaultAction<E, S>>>,
    pub(crate) config: DispatcherConfig,
    pub(crate) gate_count: Cell<u32>,
    pub(crate) queue: RefCell<EventQueue<E, S>>,
    pub(crate) contexts: RefCell<Vec<DispatchContext<E, S>>>,
    pub(crate) pool: RefCell<QueuePool<EventRecord<E, S>>>,
    pub(crate) drain_depth: Cell<u32>,
    pub(crate) pointers: RefCell<PointerPositions>,
    pub(crate) stats: Cell<DispatcherStats>,
}

impl<E, S> fmt::Debug for EventDispatcher<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("strategies", &self.strategies)
            .field("has_default_action", &self.default_action.is_some())
            .field("config", &self.config)
            .field("gate_count", &self.gate_count.get())
            .field("queued", &self.queue.borrow().len())
            .field("context_depth", &self.contexts.borrow().len())
            .field("drain_depth", &self.drain_depth.get())
            .field("stats", &self.stats.get())
            .finish_non_exhaustive()
    }
}

impl<E, S> EventDispatcher<E, S> {
    /// Creates a dispatcher with the default configuration.
    #[must_use]
    pub fn new(strategies: StrategyChain<E, S>) -> Self {
        Self::with_config(strategies, DispatcherConfig::default())
    }

    /// Creates a dispatcher with an explicit configuration.
    #[must_use]
    pub fn with_config(strategies: StrategyChain<E, S>, config: DispatcherConfig) -> Self {
        Self {
            strategies,
            default_action: None,
            config,
            gate_count: Cell::new(0),
            queue: RefCell::new(VecDeque::with_capacity(config.queue_capacity)),
            contexts: RefCell::new(Vec::new()),
            pool: RefCell::new(QueuePool::new(
                config.queue_capacity,
                config.max_pooled_queues,
            )),
            drain_depth: Cell::new(0),
            pointers: RefCell::new(PointerPositions::new()),
            stats: Cell::new(DispatcherStats::default()),
        }
    }

    /// Installs the hook run after the strategy chain for every processed
    /// event, whether or not a strategy ran.
    #[must_use]
    pub fn with_default_action(mut self, action: impl Fn(&Self, &E, &S) + 'static) -> Self {
        self.default_action = Some(Box::new(action));
        self
    }

    /// The strategy chain, in dispatch order.
    pub fn strategies(&self) -> &StrategyChain<E, S> {
        &self.strategies
    }

    /// The configuration this dispatcher was built with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Current gate count. Zero means ungated.
    pub fn gate_count(&self) -> u32 {
        self.gate_count.get()
    }

    /// Number of records waiting in the active queue.
    pub fn queued_len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Returns `true` while a drain pass is running.
    pub fn is_draining(&self) -> bool {
        self.drain_depth.get() > 0
    }

    /// Running counters.
    pub fn stats(&self) -> DispatcherStats {
        self.stats.get()
    }

    /// Queue pool counters.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.borrow().stats()
    }

    /// Last OS-sourced position recorded for `pointer_id`.
    pub fn pointer_position(&self, pointer_id: PointerId) -> Option<Point> {
        self.pointers.borrow().get(pointer_id)
    }

    fn bump(&self, update: impl FnOnce(&mut DispatcherStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Keeps the first abort of a pass and counts the rest.
    pub(crate) fn merge_outcomes(
        &self,
        first: DispatchResult,
        next: DispatchResult,
    ) -> DispatchResult {
        match (first, next) {
            (Err(kept), Err(dropped)) => {
                self.bump(|s| s.suppressed_aborts += 1);
                tracing::warn!(
                    kept = kept.reason(),
                    dropped = dropped.reason(),
                    "second abort raised in one drain pass; dropping it"
                );
                Err(kept)
            }
            (Err(kept), Ok(())) => Err(kept),
            (Ok(()), next) => next,
        }
    }
}

impl<E: Event, S: Clone> EventDispatcher<E, S> {
    /// Dispatches `event` to `target`.
    ///
    /// - The event is marked received.
    /// - Repaint notifications are dropped without running any strategy.
    /// - If the dispatcher is ungated, or `mode` is
    ///   [`Immediate`](DispatchMode::Immediate), the event is processed before
    ///   this call returns.
    /// - Otherwise the event is retained and queued behind everything already
    ///   pending; it is processed when the gate next opens to zero.
    ///
    /// Returns an abort raised by processing that happened during this call.
    pub fn dispatch(&self, event: &Rc<E>, target: &S, mode: DispatchMode) -> DispatchResult {
        event.mark_received();
        if event.event_type().is_repaint() {
            tracing::debug!("repaint notification not propagated");
            return Ok(());
        }

        if mode == DispatchMode::Immediate || self.gate_count.get() == 0 {
            return self.process_event(event, target);
        }

        event.acquire();
        let mut queue = self.queue.borrow_mut();
        queue.push_back(EventRecord::new(Rc::clone(event), target.clone()));
        tracing::trace!(queued = queue.len(), "event queued");
        drop(queue);
        self.bump(|s| s.enqueued += 1);
        Ok(())
    }
}

impl<E: Event, S> EventDispatcher<E, S> {
    /// Runs one event through the strategy chain and the default action.
    ///
    /// The whole call is bracketed by a gate, so events raised here are queued
    /// and drained only once this event is done.
    pub(crate) fn process_event(&self, event: &E, target: &S) -> DispatchResult {
        let gate = self.gate();
        event.pre_dispatch();

        if self.config.record_pointer_positions
            && let Some(sample) = event.os_pointer_sample()
        {
            self.pointers.borrow_mut().record(sample);
        }

        let state = event.state();
        let outcome = if state.is_dispatch_stopped() || state.is_propagation_stopped() {
            Ok(())
        } else {
            self.strategies.run(self, event, target)
        };

        // An abort unwinds the event: no default action, no post-dispatch.
        if outcome.is_ok() {
            if let Some(action) = &self.default_action {
                action(self, event, target);
            }
            event.post_dispatch();
        }
        self.bump(|s| s.processed += 1);

        let reopened = gate.open();
        self.merge_outcomes(outcome, reopened)
    }

    /// Swaps in a fresh queue and processes every record of the old one.
    ///
    /// Records raised while draining go to the fresh queue. An abort does not
    /// stop the pass; the first one is returned after the detached queue is
    /// empty and back in the pool.
    pub(crate) fn drain_queue(&self) -> DispatchResult {
        let fresh = self.pool.borrow_mut().get();
        let mut detached = core::mem::replace(&mut *self.queue.borrow_mut(), fresh);

        self.drain_depth.set(self.drain_depth.get() + 1);
        self.bump(|s| s.drain_passes += 1);
        tracing::trace!(records = detached.len(), "drain pass started");

        let mut outcome = Ok(());
        while let Some(record) = detached.pop_front() {
            let processed = self.process_event(&record.event, &record.target);
            record.event.dispose();
            outcome = self.merge_outcomes(outcome, processed);
        }

        self.drain_depth.set(self.drain_depth.get() - 1);
        self.pool.borrow_mut().release(detached);
        tracing::trace!(aborted = outcome.is_err(), "drain pass finished");
        outcome
    }

    /// Drops every pending event, every pushed context and all pointer state.
    ///
    /// Pending events are disposed. Counters are kept.
    ///
    /// The gate count is forced to zero. Gates still held when this runs, such
    /// as the one around the event being processed when a strategy calls
    /// `reset`, reopen as no-ops that drain the now empty queue.
    ///
    /// # Panics
    ///
    /// Panics if called while a drain pass is running.
    pub fn reset(&self) {
        assert!(
            !self.is_draining(),
            "dispatcher reset while draining its queue"
        );
        loop {
            let pending = core::mem::take(&mut *self.queue.borrow_mut());
            for record in &pending {
                record.event.dispose();
            }
            let Some(context) = self.contexts.borrow_mut().pop() else {
                *self.queue.borrow_mut() = pending;
                break;
            };
            self.pool.borrow_mut().release(pending);
            *self.queue.borrow_mut() = context.saved_queue;
        }
        self.queue.borrow_mut().clear();
        self.gate_count.set(0);
        self.pointers.borrow_mut().clear();
        tracing::debug!("dispatcher reset");
    }
}
