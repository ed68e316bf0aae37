// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher tuning knobs.

/// Configuration for an [`EventDispatcher`](crate::dispatcher::EventDispatcher).
///
/// ```
/// use understory_event_dispatch::config::DispatcherConfig;
///
/// let config = DispatcherConfig::default()
///     .with_queue_capacity(64)
///     .with_record_pointer_positions(false);
/// assert_eq!(config.queue_capacity, 64);
/// assert_eq!(config.max_pooled_queues, DispatcherConfig::default().max_pooled_queues);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Initial capacity of each pooled queue.
    pub queue_capacity: usize,
    /// Upper bound on queues kept in the pool between uses.
    pub max_pooled_queues: usize,
    /// Record the position of OS-sourced pointer input before routing it.
    pub record_pointer_positions: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            max_pooled_queues: 8,
            record_pointer_positions: true,
        }
    }
}

impl DispatcherConfig {
    /// Sets [`queue_capacity`](Self::queue_capacity).
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets [`max_pooled_queues`](Self::max_pooled_queues).
    #[must_use]
    pub fn with_max_pooled_queues(mut self, max: usize) -> Self {
        self.max_pooled_queues = max;
        self
    }

    /// Sets [`record_pointer_positions`](Self::record_pointer_positions).
    #[must_use]
    pub fn with_record_pointer_positions(mut self, enabled: bool) -> Self {
        self.record_pointer_positions = enabled;
        self
    }
}
