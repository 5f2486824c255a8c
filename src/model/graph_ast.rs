// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smol_str::SmolStr;

/// Dpi assumed when the description omits the attribute (or carries a zero/garbage value).
pub const FALLBACK_DPI: f64 = 96.0;

/// A parsed graph description, before layout.
///
/// Nodes and edges keep description order; endpoints named by an edge before (or
/// without) an explicit node statement are created on first mention, so every edge's
/// endpoints are guaranteed to resolve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphAst {
    name: Option<SmolStr>,
    graph_attrs: BTreeMap<SmolStr, String>,
    nodes: Vec<AstNode>,
    node_index: BTreeMap<SmolStr, usize>,
    edges: Vec<AstEdge>,
}

impl GraphAst {
    pub fn new(name: Option<SmolStr>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nodes(&self) -> &[AstNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[AstEdge] {
        &self.edges
    }

    pub fn node_position(&self, name: &str) -> Option<usize> {
        self.node_index.get(name).copied()
    }

    pub fn graph_attr(&self, key: &str) -> Option<&str> {
        self.graph_attrs.get(key).map(String::as_str)
    }

    pub fn set_graph_attr(&mut self, key: impl Into<SmolStr>, value: impl Into<String>) {
        self.graph_attrs.insert(key.into(), value.into());
    }

    /// Ensures a node exists and merges `attrs` into it, last write wins.
    pub fn add_node(&mut self, name: SmolStr, attrs: BTreeMap<SmolStr, String>) -> usize {
        match self.node_index.get(&name) {
            Some(&position) => {
                self.nodes[position].attrs.extend(attrs);
                position
            }
            None => {
                let position = self.nodes.len();
                self.node_index.insert(name.clone(), position);
                self.nodes.push(AstNode { name, attrs });
                position
            }
        }
    }

    /// Adds an edge, creating endpoint nodes on first mention.
    pub fn add_edge(&mut self, tail: SmolStr, head: SmolStr, attrs: BTreeMap<SmolStr, String>) {
        self.add_node(tail.clone(), BTreeMap::new());
        self.add_node(head.clone(), BTreeMap::new());
        self.edges.push(AstEdge { tail, head, attrs });
    }

    /// The requested dpi: the `dpi` graph attribute, or [`FALLBACK_DPI`] when the
    /// attribute is absent, unparseable, or zero.
    pub fn dpi(&self) -> f64 {
        self.graph_attr("dpi")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|dpi| *dpi > 0.0)
            .unwrap_or(FALLBACK_DPI)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    name: SmolStr,
    attrs: BTreeMap<SmolStr, String>,
}

impl AstNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<SmolStr, String> {
        &self.attrs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstEdge {
    tail: SmolStr,
    head: SmolStr,
    attrs: BTreeMap<SmolStr, String>,
}

impl AstEdge {
    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }
}
