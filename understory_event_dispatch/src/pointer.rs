// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Last known pointer positions, recorded from OS-sourced pointer input.
//!
//! The dispatcher samples every event that reports an
//! [`os_pointer_sample`](crate::event::Event::os_pointer_sample) before running
//! the strategy chain, so strategies and default actions can ask where a
//! pointer was last seen without tracking it themselves.

use hashbrown::HashMap;
use kurbo::Point;

/// Identifier of a pointing device (mouse, pen, touch contact).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The primary mouse pointer.
    pub const MOUSE: Self = Self(0);
}

/// A position reported by the platform for one pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// The device that produced the sample.
    pub pointer_id: PointerId,
    /// Position in surface coordinates.
    pub position: Point,
}

impl PointerSample {
    /// Creates a sample for `pointer_id` at `position`.
    #[must_use]
    pub const fn new(pointer_id: PointerId, position: Point) -> Self {
        Self {
            pointer_id,
            position,
        }
    }
}

/// Last recorded position per pointer.
#[derive(Clone, Debug, Default)]
pub struct PointerPositions {
    positions: HashMap<PointerId, Point>,
}

impl PointerPositions {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    /// Records `sample`, replacing any earlier position for the same pointer.
    pub fn record(&mut self, sample: PointerSample) {
        self.positions.insert(sample.pointer_id, sample.position);
    }

    /// Returns the last recorded position for `pointer_id`.
    #[must_use]
    pub fn get(&self, pointer_id: PointerId) -> Option<Point> {
        self.positions.get(&pointer_id).copied()
    }

    /// Forgets every recorded position.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Number of pointers with a recorded position.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no position has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
