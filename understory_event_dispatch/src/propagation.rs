// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Propagation helper: walk a trickle-down → target → bubble-up sequence and
//! honor the event's stop flags.
//!
//! Computing the path (hit testing, focus lookup) is the strategy's job; this
//! module only walks it. Rules:
//!
//! - Trickle-down visits ancestors root→parent, then the target, then
//!   bubble-up visits ancestors parent→root.
//! - After each visited node, propagation ends if the event's
//!   propagation-stopped flag is set. Handlers on the *current* node are
//!   expected to check the immediate-propagation flag themselves.
//! - A single-node path visits only the target.
//!
//! ## Minimal example
//!
//! ```
//! use understory_event_dispatch::event::{Event, EventState, EventType};
//! use understory_event_dispatch::propagation::{propagate, Phase, PropagationPath};
//!
//! struct Ev(EventState);
//! impl Event for Ev {
//!     fn event_type(&self) -> EventType { EventType::new(0) }
//!     fn state(&self) -> &EventState { &self.0 }
//! }
//!
//! let path = PropagationPath::new(vec![1_u32, 2, 3]);
//! let ev = Ev(EventState::new());
//! let mut seen = Vec::new();
//! let stopped = propagate(&path, &ev, |phase, node, _| seen.push((phase, node)));
//!
//! assert_eq!(stopped, None);
//! assert_eq!(seen, vec![
//!     (Phase::TrickleDown, 1), (Phase::TrickleDown, 2),
//!     (Phase::Target, 3),
//!     (Phase::BubbleUp, 2), (Phase::BubbleUp, 1),
//! ]);
//! ```

use alloc::vec::Vec;

use crate::event::Event;

/// Propagation phase of a visited node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root→target, before the target.
    TrickleDown,
    /// The target itself.
    Target,
    /// Target→root, after the target.
    BubbleUp,
}

/// A root→target list of nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropagationPath<K> {
    nodes: Vec<K>,
}

impl<K: Copy> PropagationPath<K> {
    /// Creates a path from root→target `nodes`.
    #[must_use]
    pub fn new(nodes: Vec<K>) -> Self {
        Self { nodes }
    }

    /// The target (last node), if any.
    #[must_use]
    pub fn target(&self) -> Option<K> {
        self.nodes.last().copied()
    }

    /// The root→target nodes.
    #[must_use]
    pub fn nodes(&self) -> &[K] {
        &self.nodes
    }

    /// Number of nodes on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for an empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every `(phase, node)` visit in propagation order.
    pub fn steps(&self) -> impl Iterator<Item = (Phase, K)> + '_ {
        let ancestors = &self.nodes[..self.nodes.len().saturating_sub(1)];
        ancestors
            .iter()
            .map(|&k| (Phase::TrickleDown, k))
            .chain(self.target().map(|k| (Phase::Target, k)))
            .chain(ancestors.iter().rev().map(|&k| (Phase::BubbleUp, k)))
    }
}

/// Walks `path`, calling `handler` for each visit until propagation stops.
///
/// Returns the visit after which the event's propagation was stopped, or
/// `None` if the whole path was visited.
pub fn propagate<K: Copy, E: Event>(
    path: &PropagationPath<K>,
    event: &E,
    mut handler: impl FnMut(Phase, K, &E),
) -> Option<(Phase, K)> {
    for (phase, node) in path.steps() {
        handler(phase, node, event);
        if event.state().is_propagation_stopped() {
            return Some((phase, node));
        }
    }
    None
}
