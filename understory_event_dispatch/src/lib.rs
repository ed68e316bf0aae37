// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_dispatch --heading-base-level=0

//! Understory Event Dispatch: a reentrancy-safe, order-preserving event
//! dispatcher for retained-mode UI.
//!
//! ## Overview
//!
//! A single top-level dispatch can raise many secondary events part way
//! through (focus changes, value-changed notifications, synthetic geometry
//! events). This crate sequences them. It accepts events, routes each through
//! an ordered [`StrategyChain`](strategy::StrategyChain), and guarantees that
//! events raised while another event is being processed are handled in the
//! order they were raised, after the event that raised them and before its
//! queued siblings.
//!
//! It does not build propagation paths or implement routing policy. Strategies
//! do that; the [`propagation`] module offers a small helper for walking a
//! trickle-down → target → bubble-up path once a strategy has one.
//!
//! ## Pieces
//!
//! - [`event`]: the [`Event`](event::Event) contract and embeddable
//!   [`EventState`](event::EventState) (stop flags, retain count).
//! - [`strategy`]: the [`DispatchStrategy`](strategy::DispatchStrategy) trait and
//!   the fixed-order [`StrategyChain`](strategy::StrategyChain).
//! - [`dispatcher`]: [`EventDispatcher`](dispatcher::EventDispatcher), the
//!   queue-swap drain loop and per-event processing.
//! - [`gate`]: the reentrancy gate and its scoped guard.
//! - [`context`]: isolated sessions for nested UI loops.
//! - [`pool`] and [`record`]: pooled queues of `{event, target}` records.
//! - [`pointer`]: last known positions of OS-sourced pointer input.
//! - [`config`], [`error`], [`slot`]: configuration, the abort signal, and a
//!   lazily built default instance.
//!
//! ## Ordering guarantees
//!
//! - An event and every event it transitively raises are processed, in
//!   emission order, before the next event that was queued beside it.
//! - While ungated, a dispatch is processed on the caller's stack with no
//!   queueing at all.
//! - No event from an outer [context](context) is processed while an inner one
//!   is active, and vice versa.
//!
//! ## Aborting
//!
//! A strategy can return [`DispatchAbort`](error::DispatchAbort) to abandon the
//! current event. The drain pass still processes and disposes the rest of its
//! queue and returns the pooled queue, then reports the abort to whoever opened
//! the gate.
//!
//! This crate is `no_std` and uses `alloc`. It is single-threaded.

#![no_std]

extern crate alloc;

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod gate;
pub mod pointer;
pub mod pool;
pub mod propagation;
pub mod record;
pub mod slot;
pub mod strategy;
