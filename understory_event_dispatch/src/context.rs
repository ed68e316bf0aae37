// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Isolated dispatch sessions.
//!
//! A nested UI loop (for example, a modal dialog pumped from inside an event
//! handler) must not process events queued by the outer session, and must not
//! leave its own events behind for the outer one. Pushing a context saves the
//! current gate count and queue, and starts the dispatcher ungated with an empty
//! queue. Popping restores them.
//!
//! A context may only be popped once its session is idle: gate count zero and
//! nothing queued. Anything else is a broken caller contract and panics.

use core::mem;

use crate::dispatcher::EventDispatcher;
use crate::event::Event;
use crate::record::EventQueue;

/// Saved outer state while an inner session is active.
#[derive(Debug)]
pub(crate) struct DispatchContext<E, S> {
    pub(crate) saved_gate_count: u32,
    pub(crate) saved_queue: EventQueue<E, S>,
}

impl<E: Event, S> EventDispatcher<E, S> {
    /// Starts an isolated dispatch session.
    ///
    /// The current gate count and queue are saved; the dispatcher continues
    /// ungated with a fresh queue from the pool.
    pub fn push_context(&self) {
        let fresh = self.pool.borrow_mut().get();
        let saved_queue = mem::replace(&mut *self.queue.borrow_mut(), fresh);
        let saved_gate_count = self.gate_count.replace(0);
        let mut contexts = self.contexts.borrow_mut();
        contexts.push(DispatchContext {
            saved_gate_count,
            saved_queue,
        });
        tracing::trace!(
            depth = contexts.len(),
            saved_gate_count,
            "dispatch context pushed"
        );
    }

    /// Ends the innermost session and restores the outer gate and queue.
    ///
    /// # Panics
    ///
    /// Panics if no context is pushed, if the session is still gated, or if it
    /// still has queued events.
    pub fn pop_context(&self) {
        assert_eq!(
            self.gate_count.get(),
            0,
            "dispatch context popped while its gate is closed"
        );
        assert!(
            self.queue.borrow().is_empty(),
            "dispatch context popped with events still queued"
        );
        let Some(context) = self.contexts.borrow_mut().pop() else {
            panic!("dispatch context popped without a matching push");
        };
        let inner = mem::replace(&mut *self.queue.borrow_mut(), context.saved_queue);
        self.gate_count.set(context.saved_gate_count);
        self.pool.borrow_mut().release(inner);
        tracing::trace!(
            depth = self.contexts.borrow().len(),
            restored_gate_count = context.saved_gate_count,
            "dispatch context popped"
        );
    }

    /// Number of pushed contexts.
    pub fn context_depth(&self) -> usize {
        self.contexts.borrow().len()
    }

    /// Runs `f` inside a fresh context.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`pop_context`](Self::pop_context)
    /// if `f` leaves the session gated or with events queued.
    pub fn with_context<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        self.push_context();
        let out = f(self);
        self.pop_context();
        out
    }
}
