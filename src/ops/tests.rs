// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::*;
use crate::model::diagram::GraphDiagram;
use crate::model::fixtures::{build_diagram, CYCLE_DOT, DIAMOND_DOT};

fn node_id(diagram: &GraphDiagram, name: &str) -> NodeId {
    diagram.node_by_name(name).expect("fixture node")
}

fn edge_id(diagram: &GraphDiagram, tail: &str, head: &str) -> EdgeId {
    let tail = node_id(diagram, tail);
    let head = node_id(diagram, head);
    diagram
        .edges()
        .iter()
        .find(|e| e.tail() == tail && e.head() == head)
        .map(|e| e.id())
        .expect("fixture edge")
}

#[test]
fn propagation_over_a_cycle_terminates_and_touches_each_element_once() {
    let mut diagram = build_diagram(CYCLE_DOT);
    let start = node_id(&diagram, "a");

    let mut calls = 0usize;
    propagate_from_node(&mut diagram, start, &mut |_| calls += 1, None, false);

    // Three nodes and three edges, one action each.
    assert_eq!(calls, 6);
}

#[test]
fn highlight_covers_the_whole_subtree() {
    let mut diagram = build_diagram(CYCLE_DOT);
    let b = node_id(&diagram, "b");
    highlight_subtree(&mut diagram, b);

    for node in diagram.nodes() {
        assert!(node.flags().is_highlighted(), "node {}", node.name());
    }
    for edge in diagram.edges() {
        assert!(edge.flags().is_highlighted(), "edge {}", edge.id());
    }
}

#[test]
fn hide_stops_at_nodes_with_another_visible_parent() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let b = node_id(&diagram, "b");
    hide_subtree_from_node(&mut diagram, b);

    let visible = |name: &str| diagram.node(node_id(&diagram, name)).flags().is_visible();
    assert!(!visible("b"));
    assert!(visible("a"));
    assert!(visible("c"));
    // Still reachable through the visible branch via c.
    assert!(visible("d"));

    // The edges around b go invisible with it, the rest stay.
    let edge_visible = |tail: &str, head: &str| {
        diagram
            .edge(edge_id(&diagram, tail, head))
            .flags()
            .is_visible()
    };
    assert!(!edge_visible("a", "b"));
    assert!(!edge_visible("b", "d"));
    assert!(edge_visible("a", "c"));
    assert!(edge_visible("c", "d"));
}

#[test]
fn hide_from_the_root_takes_the_whole_diagram_down() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let a = node_id(&diagram, "a");
    hide_subtree_from_node(&mut diagram, a);

    for node in diagram.nodes() {
        assert!(!node.flags().is_visible(), "node {}", node.name());
    }
    for edge in diagram.edges() {
        assert!(!edge.flags().is_visible(), "edge {}", edge.id());
    }
}

#[test]
fn hide_is_idempotent() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let b = node_id(&diagram, "b");
    hide_subtree_from_node(&mut diagram, b);
    let after_first: Vec<bool> = diagram
        .nodes()
        .iter()
        .map(|n| n.flags().is_visible())
        .collect();

    hide_subtree_from_node(&mut diagram, b);
    let after_second: Vec<bool> = diagram
        .nodes()
        .iter()
        .map(|n| n.flags().is_visible())
        .collect();

    assert_eq!(after_first, after_second);
}

#[test]
fn hiding_an_edge_leaves_a_still_visible_head_alone() {
    let mut diagram = build_diagram("digraph { dpi=72; a -> b; b -> c }");
    let a_to_b = edge_id(&diagram, "a", "b");
    hide_subtree_from_edge(&mut diagram, a_to_b);

    assert!(!diagram
        .edge(edge_id(&diagram, "a", "b"))
        .flags()
        .is_visible());
    assert!(diagram.node(node_id(&diagram, "b")).flags().is_visible());
    assert!(diagram.node(node_id(&diagram, "c")).flags().is_visible());
}

#[test]
fn hiding_an_edge_into_an_already_hidden_head_continues_downward() {
    let mut diagram = build_diagram("digraph { dpi=72; a -> b; b -> c }");
    let b = node_id(&diagram, "b");
    diagram.node_flags_mut(b).set_visible(false);

    let a_to_b = edge_id(&diagram, "a", "b");
    hide_subtree_from_edge(&mut diagram, a_to_b);

    assert!(!diagram
        .edge(edge_id(&diagram, "b", "c"))
        .flags()
        .is_visible());
    assert!(!diagram.node(node_id(&diagram, "c")).flags().is_visible());
}

#[test]
fn unhighlight_with_an_active_selection_preserves_the_other_branch() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let a = node_id(&diagram, "a");
    let b = node_id(&diagram, "b");
    highlight_subtree(&mut diagram, a);

    unhighlight_subtree(&mut diagram, b, true);

    let highlighted = |name: &str| {
        diagram
            .node(node_id(&diagram, name))
            .flags()
            .is_highlighted()
    };
    assert!(!highlighted("b"));
    assert!(highlighted("a"));
    assert!(highlighted("c"));
    // d keeps its highlight: c -> d is still a highlighted incoming edge.
    assert!(highlighted("d"));
    assert!(!diagram
        .edge(edge_id(&diagram, "b", "d"))
        .flags()
        .is_highlighted());
    assert!(diagram
        .edge(edge_id(&diagram, "c", "d"))
        .flags()
        .is_highlighted());
}

#[test]
fn unhighlight_without_a_selection_clears_everything_reachable() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let a = node_id(&diagram, "a");
    highlight_subtree(&mut diagram, a);

    unhighlight_subtree(&mut diagram, a, false);

    for node in diagram.nodes() {
        assert!(!node.flags().is_highlighted(), "node {}", node.name());
    }
    for edge in diagram.edges() {
        assert!(!edge.flags().is_highlighted(), "edge {}", edge.id());
    }
}

#[test]
fn ancestor_highlight_checks_look_at_incoming_edges_only() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let a_to_b = edge_id(&diagram, "a", "b");
    diagram.edge_flags_mut(a_to_b).set_highlighted(true);

    assert!(has_highlighted_ancestor_node(
        &diagram,
        node_id(&diagram, "b")
    ));
    assert!(!has_highlighted_ancestor_node(
        &diagram,
        node_id(&diagram, "a")
    ));
    // The edge variant asks about its tail's ancestors, not itself.
    assert!(!has_highlighted_ancestor_edge(&diagram, a_to_b));
    let b_to_d = edge_id(&diagram, "b", "d");
    assert!(has_highlighted_ancestor_edge(&diagram, b_to_d));
}

#[test]
fn reset_clears_the_effects_of_any_propagation() {
    let mut diagram = build_diagram(DIAMOND_DOT);
    let a = node_id(&diagram, "a");
    hide_subtree_from_node(&mut diagram, a);
    highlight_subtree(&mut diagram, a);

    diagram.reset();

    for node in diagram.nodes() {
        assert!(node.flags().is_visible());
        assert!(!node.flags().is_highlighted());
    }
    for edge in diagram.edges() {
        assert!(edge.flags().is_visible());
        assert!(!edge.flags().is_highlighted());
    }
}
