// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Subtree propagation over a diagram's directed structure.
//!
//! One conditional breadth-first walk ([`propagate_from_node`]) carries every
//! interactive flag change: hide on double-click, highlight on hover, unhighlight
//! on leave. The named operations below are the fixed action/stop pairings the
//! viewer uses.
//!
//! The stop predicate gates ENQUEUEING, not the current element: a successor is
//! walked only when none of its incoming-edge tails satisfies the predicate. The
//! start node itself is always acted on, and the edge leading to a blocked
//! successor still receives the action.

use std::collections::{BTreeSet, VecDeque};

use crate::model::diagram::{ElementFlags, GraphDiagram};
use crate::model::ids::{EdgeId, NodeId};

/// Flag mutation applied to every reached element, node or edge alike.
pub type FlagAction<'a> = &'a mut dyn FnMut(&mut ElementFlags);

/// Node predicate consulted on the tails feeding a candidate successor.
pub type StopPredicate<'a> = &'a dyn Fn(&GraphDiagram, NodeId) -> bool;

/// Breadth-first conditional propagation from a node.
///
/// Visits `start` and every successor reachable without crossing a blocked node.
/// A candidate head is blocked when any tail of its incoming edges satisfies
/// `stop` at the moment the head is considered; because the current node has
/// already been acted on, it usually no longer blocks its own successors. With
/// `include_incoming`, the incoming edges of every visited node get the action
/// too. Cycles terminate through the finished set.
pub fn propagate_from_node(
    diagram: &mut GraphDiagram,
    start: NodeId,
    action: FlagAction<'_>,
    stop: Option<StopPredicate<'_>>,
    include_incoming: bool,
) {
    let mut waiting = VecDeque::new();
    let mut waiting_set = BTreeSet::new();
    let mut finished = BTreeSet::new();

    waiting.push_back(start);
    waiting_set.insert(start);

    while let Some(current) = waiting.pop_front() {
        waiting_set.remove(&current);
        action(diagram.node_flags_mut(current));

        if include_incoming {
            for edge in diagram.incoming_edges(current).to_vec() {
                action(diagram.edge_flags_mut(edge));
            }
        }

        for edge in diagram.outgoing_edges(current).to_vec() {
            let head = diagram.edge(edge).head();
            let to_process = match stop {
                Some(stop) => !diagram
                    .incoming_edges(head)
                    .iter()
                    .any(|&incoming| stop(diagram, diagram.edge(incoming).tail())),
                None => true,
            };
            action(diagram.edge_flags_mut(edge));
            if to_process && !waiting_set.contains(&head) && !finished.contains(&head) {
                waiting.push_back(head);
                waiting_set.insert(head);
            }
        }

        finished.insert(current);
    }
}

/// Propagation started on an edge: the edge always gets the action, and the walk
/// continues from its head only when the head itself does not satisfy `stop`.
pub fn propagate_from_edge(
    diagram: &mut GraphDiagram,
    edge: EdgeId,
    action: FlagAction<'_>,
    stop: Option<StopPredicate<'_>>,
) {
    action(diagram.edge_flags_mut(edge));
    let head = diagram.edge(edge).head();
    let proceed = match stop {
        Some(stop) => !stop(diagram, head),
        None => true,
    };
    if proceed {
        propagate_from_node(diagram, head, action, stop, false);
    }
}

/// Hides a node and everything below it that has no other visible parent.
/// Incoming edges of hidden nodes go invisible with them.
pub fn hide_subtree_from_node(diagram: &mut GraphDiagram, node: NodeId) {
    propagate_from_node(
        diagram,
        node,
        &mut |flags| flags.set_visible(false),
        Some(&|diagram, node| diagram.node(node).flags().is_visible()),
        true,
    );
}

/// Hides an edge, and its head's subtree when the head is already invisible.
pub fn hide_subtree_from_edge(diagram: &mut GraphDiagram, edge: EdgeId) {
    propagate_from_edge(
        diagram,
        edge,
        &mut |flags| flags.set_visible(false),
        Some(&|diagram, node| diagram.node(node).flags().is_visible()),
    );
}

/// Highlights a node's entire subtree, unconditionally.
pub fn highlight_subtree(diagram: &mut GraphDiagram, node: NodeId) {
    propagate_from_node(
        diagram,
        node,
        &mut |flags| flags.set_highlighted(true),
        None,
        false,
    );
}

/// Removes a highlight.
///
/// With an active selection elsewhere, the walk stops at nodes that still have a
/// highlighted incoming edge, so the selection's own subtree keeps its highlight.
/// Without one the whole subtree is cleared.
pub fn unhighlight_subtree(diagram: &mut GraphDiagram, node: NodeId, selection_active: bool) {
    let stop: Option<StopPredicate<'_>> = if selection_active {
        Some(&has_highlighted_ancestor_node)
    } else {
        None
    };
    propagate_from_node(
        diagram,
        node,
        &mut |flags| flags.set_highlighted(false),
        stop,
        false,
    );
}

/// True when any incoming edge of the node is highlighted.
pub fn has_highlighted_ancestor_node(diagram: &GraphDiagram, node: NodeId) -> bool {
    diagram
        .incoming_edges(node)
        .iter()
        .any(|&edge| diagram.edge(edge).flags().is_highlighted())
}

/// Edge variant: delegates to the edge's tail node.
pub fn has_highlighted_ancestor_edge(diagram: &GraphDiagram, edge: EdgeId) -> bool {
    has_highlighted_ancestor_node(diagram, diagram.edge(edge).tail())
}

#[cfg(test)]
mod tests;
