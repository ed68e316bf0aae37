// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Queued `{event, target}` pairs.

use alloc::collections::VecDeque;
use alloc::rc::Rc;

/// An event waiting in a dispatch queue, paired with the surface it targets.
///
/// Records are created when an event is queued and consumed when the queue is
/// drained. The record holds one strong reference to the event; the matching
/// [`Event::acquire`](crate::event::Event::acquire) /
/// [`Event::dispose`](crate::event::Event::dispose) pair is driven by the
/// dispatcher, not by the record.
#[derive(Debug)]
pub struct EventRecord<E, S> {
    /// The queued event.
    pub event: Rc<E>,
    /// The surface the event was dispatched to.
    pub target: S,
}

impl<E, S> EventRecord<E, S> {
    /// Pairs `event` with `target`.
    #[must_use]
    pub fn new(event: Rc<E>, target: S) -> Self {
        Self { event, target }
    }
}

/// FIFO queue of pending records.
pub type EventQueue<E, S> = VecDeque<EventRecord<E, S>>;
