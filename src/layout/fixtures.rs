// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic in-crate layout engines for tests and benches.
//!
//! The real engine is an external collaborator; these stand-ins produce a trivial
//! single-row placement with straight-ish cubic routes, which is all the model and
//! propagation tests need.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::{EdgeRoute, LayoutEngine, LayoutError, LayoutSnapshot, NodePlacement};
use crate::model::geometry::{Point, Rect};
use crate::model::graph_ast::GraphAst;

const CELL_WIDTH: f64 = 120.0;
const CELL_HEIGHT: f64 = 72.0;
const NODE_WIDTH: f64 = 100.0;
const NODE_HEIGHT: f64 = 50.0;

/// Compute/release call counts, shared with the test that owns the engine.
#[derive(Debug, Default)]
pub(crate) struct EngineCounters {
    computed: AtomicUsize,
    released: AtomicUsize,
}

impl EngineCounters {
    pub(crate) fn computed(&self) -> usize {
        self.computed.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

/// Lays every node on one row, in description order.
#[derive(Debug, Default)]
pub(crate) struct RowLayoutEngine {
    counters: Arc<EngineCounters>,
}

impl RowLayoutEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn counters(&self) -> Arc<EngineCounters> {
        Arc::clone(&self.counters)
    }
}

impl LayoutEngine for RowLayoutEngine {
    fn compute(&mut self, ast: &GraphAst) -> Result<LayoutSnapshot, LayoutError> {
        self.counters.computed.fetch_add(1, Ordering::SeqCst);

        let mut snapshot = LayoutSnapshot {
            bounding_box: Rect::new(0.0, 0.0, ast.nodes().len() as f64 * CELL_WIDTH, CELL_HEIGHT),
            ..LayoutSnapshot::default()
        };

        for (index, node) in ast.nodes().iter().enumerate() {
            let center = Point::new(index as f64 * CELL_WIDTH + CELL_WIDTH / 2.0, CELL_HEIGHT / 2.0);
            snapshot.node_placements.insert(
                SmolStr::new(node.name()),
                NodePlacement {
                    center,
                    width: NODE_WIDTH,
                    height: NODE_HEIGHT,
                },
            );
        }

        for edge in ast.edges() {
            let tail = snapshot
                .placement(edge.tail())
                .map(|p| p.center)
                .ok_or_else(|| LayoutError::MissingPlacement {
                    node: SmolStr::new(edge.tail()),
                })?;
            let head = snapshot
                .placement(edge.head())
                .map(|p| p.center)
                .ok_or_else(|| LayoutError::MissingPlacement {
                    node: SmolStr::new(edge.head()),
                })?;

            let lerp = |t: f64| {
                Point::new(tail.x + (head.x - tail.x) * t, tail.y + (head.y - tail.y) * t)
            };
            let mut control_points: SmallVec<[Point; 8]> = SmallVec::new();
            control_points.push(tail);
            control_points.push(lerp(1.0 / 3.0));
            control_points.push(lerp(2.0 / 3.0));
            control_points.push(head);

            snapshot.edge_routes.push(EdgeRoute {
                control_points,
                start: None,
                end: None,
                label_pos: edge.attr("label").map(|_| lerp(0.5)),
            });
        }

        Ok(snapshot)
    }

    fn release(&mut self, _snapshot: &LayoutSnapshot) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fails every compute with a fixed engine message.
#[derive(Debug)]
pub(crate) struct FailingLayoutEngine {
    message: String,
    counters: Arc<EngineCounters>,
}

impl FailingLayoutEngine {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            counters: Arc::default(),
        }
    }

    pub(crate) fn counters(&self) -> Arc<EngineCounters> {
        Arc::clone(&self.counters)
    }
}

impl LayoutEngine for FailingLayoutEngine {
    fn compute(&mut self, _ast: &GraphAst) -> Result<LayoutSnapshot, LayoutError> {
        self.counters.computed.fetch_add(1, Ordering::SeqCst);
        Err(LayoutError::EngineFailure {
            message: self.message.clone(),
        })
    }

    fn release(&mut self, _snapshot: &LayoutSnapshot) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}
