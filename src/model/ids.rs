// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Dense index of a node within one diagram's element arena.
///
/// Ids are assigned in description order at construction time and are stable for the
/// diagram's lifetime; geometry never changes without a full rebuild, so an id taken
/// from a diagram is valid against that same diagram only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Dense index of an edge within one diagram's element arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Session-wide identifier of an opened diagram.
///
/// The same id keys the history node created when the diagram is opened, which is how
/// link-opened diagrams find their parent in the history forest. Id 0 is reserved for
/// the history's virtual root and is never allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagramId(u64);

impl DiagramId {
    /// The history forest's virtual root.
    pub const ROOT: DiagramId = DiagramId(0);

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Monotonic allocator for [`DiagramId`]s, unique across the session.
#[derive(Debug)]
pub struct DiagramIdGen {
    next: AtomicU64,
}

impl DiagramIdGen {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> DiagramId {
        DiagramId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for DiagramIdGen {
    fn default() -> Self {
        Self::new()
    }
}
