// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable queue buffers.
//!
//! Every drain pass and every pushed context needs a fresh queue. Rather than
//! allocating one each time, the dispatcher borrows it from a [`QueuePool`] and
//! hands it back afterwards. Returned queues are cleared but keep their
//! capacity.
//!
//! Checkouts and returns must pair up; [`PoolStats`] makes that observable.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

/// Counters describing pool traffic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of [`QueuePool::get`] calls.
    pub gets: u64,
    /// Number of [`QueuePool::release`] calls.
    pub releases: u64,
    /// Number of queues currently held for reuse.
    pub retained: usize,
}

impl PoolStats {
    /// Number of queues checked out and not yet returned.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.gets - self.releases
    }
}

/// A pool of empty [`VecDeque`]s.
#[derive(Debug)]
pub struct QueuePool<T> {
    free: Vec<VecDeque<T>>,
    capacity: usize,
    max_retained: usize,
    gets: u64,
    releases: u64,
}

impl<T> QueuePool<T> {
    /// Creates a pool handing out queues with `capacity` preallocated slots and
    /// keeping at most `max_retained` returned queues.
    #[must_use]
    pub fn new(capacity: usize, max_retained: usize) -> Self {
        Self {
            free: Vec::new(),
            capacity,
            max_retained,
            gets: 0,
            releases: 0,
        }
    }

    /// Checks out an empty queue.
    pub fn get(&mut self) -> VecDeque<T> {
        self.gets += 1;
        self.free
            .pop()
            .unwrap_or_else(|| VecDeque::with_capacity(self.capacity))
    }

    /// Returns a queue to the pool.
    ///
    /// Any remaining items are dropped; callers that need per-item cleanup
    /// must drain the queue first.
    pub fn release(&mut self, mut queue: VecDeque<T>) {
        self.releases += 1;
        debug_assert!(
            self.releases <= self.gets,
            "queue returned to a pool it was not taken from"
        );
        queue.clear();
        if self.free.len() < self.max_retained {
            self.free.push(queue);
        }
    }

    /// Returns the current counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            gets: self.gets,
            releases: self.releases,
            retained: self.free.len(),
        }
    }
}
