// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout-engine collaborator seam.
//!
//! The viewer never computes layouts; an external engine does, behind
//! [`LayoutEngine`]. Its internal context is process-wide shared state that is not
//! safe for concurrent invocation, so all access goes through [`LayoutContext`],
//! which serializes compute calls with a mutex and pairs every compute with exactly
//! one release via [`LayoutLease`].

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::model::geometry::{Point, Rect};
use crate::model::graph_ast::GraphAst;

/// Placement of one node, in layout space: points, bottom-left origin, center anchored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

/// Routed geometry of one edge, in layout space.
///
/// `control_points` holds the concatenated cubic Bézier runs; a valid route has
/// `len % 3 == 1`. `start`/`end` are the optional explicit endpoints the engine
/// emits when the spline does not touch the node boundary itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeRoute {
    pub control_points: SmallVec<[Point; 8]>,
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub label_pos: Option<Point>,
}

/// Everything the engine hands back for one graph.
///
/// `edge_routes` is parallel to the description's edge order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSnapshot {
    pub bounding_box: Rect,
    pub node_placements: BTreeMap<SmolStr, NodePlacement>,
    pub edge_routes: Vec<EdgeRoute>,
}

impl LayoutSnapshot {
    pub fn placement(&self, node_name: &str) -> Option<&NodePlacement> {
        self.node_placements.get(node_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    EngineFailure { message: String },
    MissingPlacement { node: SmolStr },
    MissingRoute { edge_index: usize },
    MalformedSpline { edge_index: usize, points: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineFailure { message } => write!(f, "layout engine failure: {message}"),
            Self::MissingPlacement { node } => {
                write!(f, "layout produced no placement for node '{node}'")
            }
            Self::MissingRoute { edge_index } => {
                write!(f, "layout produced no route for edge #{edge_index}")
            }
            Self::MalformedSpline { edge_index, points } => write!(
                f,
                "malformed spline for edge #{edge_index}: {points} control points (expected 3k+1)"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The external layout collaborator.
///
/// `compute` turns a parsed description into placements, routes, and a bounding box;
/// `release` frees whatever per-graph state the engine retained for that snapshot.
/// The context guarantees `release` is called exactly once per successful `compute`.
pub trait LayoutEngine: Send {
    fn compute(&mut self, ast: &GraphAst) -> Result<LayoutSnapshot, LayoutError>;
    fn release(&mut self, snapshot: &LayoutSnapshot);
}

/// Process-wide gate in front of the engine.
///
/// Only one layout computation executes at a time, even with several diagrams being
/// built concurrently.
pub struct LayoutContext {
    engine: Mutex<Box<dyn LayoutEngine>>,
}

impl LayoutContext {
    pub fn new(engine: Box<dyn LayoutEngine>) -> Arc<Self> {
        Arc::new(Self {
            engine: Mutex::new(engine),
        })
    }

    /// Runs one serialized layout computation. The returned lease releases the
    /// engine-held state when dropped.
    pub fn compute(self: &Arc<Self>, ast: &GraphAst) -> Result<LayoutLease, LayoutError> {
        let snapshot = self.lock_engine().compute(ast)?;
        Ok(LayoutLease {
            context: Arc::clone(self),
            snapshot: Some(snapshot),
        })
    }

    fn lock_engine(&self) -> MutexGuard<'_, Box<dyn LayoutEngine>> {
        // A panic while holding the lock poisons it; the engine state itself is
        // still the only copy we have, so keep going with it.
        match self.engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext").finish_non_exhaustive()
    }
}

/// Owns one computed layout until the consuming diagram is dropped.
pub struct LayoutLease {
    context: Arc<LayoutContext>,
    snapshot: Option<LayoutSnapshot>,
}

impl LayoutLease {
    pub fn snapshot(&self) -> &LayoutSnapshot {
        // The option is only vacated in drop.
        self.snapshot.as_ref().expect("layout lease still held")
    }
}

impl fmt::Debug for LayoutLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutLease")
            .field("released", &self.snapshot.is_none())
            .finish()
    }
}

impl Drop for LayoutLease {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.context.lock_engine().release(&snapshot);
        }
    }
}
