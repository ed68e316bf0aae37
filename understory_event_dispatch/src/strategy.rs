// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch strategies and the fixed chain that orders them.
//!
//! A strategy decides whether it applies to an event
//! ([`can_dispatch`](DispatchStrategy::can_dispatch)) and then routes it
//! ([`dispatch`](DispatchStrategy::dispatch)), typically by computing a
//! propagation path and walking it with [`propagate`](crate::propagation::propagate).
//!
//! The chain is tried in order for every event:
//!
//! - Strategies whose `can_dispatch` returns `false` are skipped.
//! - After each strategy that ran, the chain stops if the event's
//!   dispatch-stopped or propagation-stopped flag is set.
//! - A [`DispatchAbort`](crate::error::DispatchAbort) from a strategy stops the
//!   chain and is returned to the dispatcher.
//!
//! Order is precedence. There are no priority numbers: the position a strategy
//! is pushed at is the position it runs at. [`StrategyChain::standard`] lays
//! out the usual roles in their documented order.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::dispatcher::EventDispatcher;
use crate::error::DispatchResult;
use crate::event::Event;

/// A unit of routing for one class of events.
///
/// Strategies are called with `&self`; keep any mutable routing state (for
/// example, the current pointer capture) behind a `Cell` or `RefCell`.
/// They receive the dispatcher so they can raise follow-up events, which are
/// queued behind the current one and processed once it completes.
pub trait DispatchStrategy<E, S> {
    /// Short name used in logs and chain introspection.
    fn name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns `true` if this strategy wants to route `event`.
    fn can_dispatch(&self, event: &E) -> bool;

    /// Routes `event` toward `target`.
    fn dispatch(&self, dispatcher: &EventDispatcher<E, S>, event: &E, target: &S) -> DispatchResult;
}

/// The well-known strategy roles, for [`StrategyChain::standard`].
///
/// Any role may be left as `None`.
pub struct StandardStrategies<E, S> {
    /// Debugger interception; may veto everything after it.
    pub debugger: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Pointer capture redirection.
    pub pointer_capture: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Keyboard events routed to the focused element.
    pub keyboard: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Pointer events routed to the element under the pointer.
    pub pointer: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Command events (copy, paste, validate, ...).
    pub command: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Bridge to legacy immediate-mode containers.
    pub legacy_bridge: Option<Box<dyn DispatchStrategy<E, S>>>,
    /// Catch-all for everything else.
    pub default: Option<Box<dyn DispatchStrategy<E, S>>>,
}

impl<E, S> Default for StandardStrategies<E, S> {
    fn default() -> Self {
        Self {
            debugger: None,
            pointer_capture: None,
            keyboard: None,
            pointer: None,
            command: None,
            legacy_bridge: None,
            default: None,
        }
    }
}

impl<E, S> fmt::Debug for StandardStrategies<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: &Option<Box<dyn DispatchStrategy<E, S>>>| s.as_ref().map(|s| s.name());
        f.debug_struct("StandardStrategies")
            .field("debugger", &name(&self.debugger))
            .field("pointer_capture", &name(&self.pointer_capture))
            .field("keyboard", &name(&self.keyboard))
            .field("pointer", &name(&self.pointer))
            .field("command", &name(&self.command))
            .field("legacy_bridge", &name(&self.legacy_bridge))
            .field("default", &name(&self.default))
            .finish()
    }
}

/// An ordered, fixed list of strategies.
pub struct StrategyChain<E, S> {
    entries: SmallVec<[Box<dyn DispatchStrategy<E, S>>; 8]>,
}

impl<E, S> Default for StrategyChain<E, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S> fmt::Debug for StrategyChain<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<E, S> StrategyChain<E, S> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Builds a chain from the standard roles, in their fixed order: debugger,
    /// pointer capture, keyboard, pointer, command, legacy bridge, default.
    #[must_use]
    pub fn standard(roles: StandardStrategies<E, S>) -> Self {
        let StandardStrategies {
            debugger,
            pointer_capture,
            keyboard,
            pointer,
            command,
            legacy_bridge,
            default,
        } = roles;
        let mut chain = Self::new();
        for strategy in [
            debugger,
            pointer_capture,
            keyboard,
            pointer,
            command,
            legacy_bridge,
            default,
        ]
        .into_iter()
        .flatten()
        {
            chain.entries.push(strategy);
        }
        chain
    }

    /// Appends `strategy` to the end of the chain.
    #[must_use]
    pub fn with(mut self, strategy: impl DispatchStrategy<E, S> + 'static) -> Self {
        self.push(Box::new(strategy));
        self
    }

    /// Appends a boxed strategy to the end of the chain.
    pub fn push(&mut self, strategy: Box<dyn DispatchStrategy<E, S>>) {
        self.entries.push(strategy);
    }

    /// Number of strategies in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the chain has no strategies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strategy names in chain order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|s| s.name())
    }
}

impl<E: Event, S> StrategyChain<E, S> {
    /// Runs the chain for one event.
    pub(crate) fn run(
        &self,
        dispatcher: &EventDispatcher<E, S>,
        event: &E,
        target: &S,
    ) -> DispatchResult {
        for strategy in &self.entries {
            if !strategy.can_dispatch(event) {
                continue;
            }
            strategy.dispatch(dispatcher, event, target)?;
            let state = event.state();
            if state.is_dispatch_stopped() || state.is_propagation_stopped() {
                tracing::debug!(strategy = strategy.name(), "strategy chain stopped");
                break;
            }
        }
        Ok(())
    }
}
