// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The diagram model: immutable scene geometry plus mutable visual flags.
//!
//! A [`GraphDiagram`] is built once from a parsed description and a layout snapshot;
//! afterwards only per-element visibility/highlight flags change. The layout lease is
//! held for the diagram's lifetime and released exactly once when it is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use smol_str::SmolStr;

use crate::format::dot::{self, DotParseError};
use crate::layout::{LayoutContext, LayoutError, LayoutLease};
use crate::model::geometry::{arrowhead, PathSeg, Point, Rect, SceneTransform, DOT_DEFAULT_DPI};
use crate::model::graph_ast::GraphAst;
use crate::model::ids::{DiagramId, EdgeId, NodeId};

/// The mutable part of every element. Geometry never changes without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementFlags {
    visible: bool,
    highlighted: bool,
}

impl ElementFlags {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self {
            visible: true,
            highlighted: false,
        }
    }
}

/// Visual outline of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Default: ellipse inscribed in the bounding box.
    Ellipse,
    /// `shape=rect`.
    Rectangle,
    /// `shape=diamond`: four-point kite over the bounding box midpoints. It degenerates
    /// to a true diamond only when the box is square.
    Kite,
}

/// Where a node's code lives, for the source-line-of-interest notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    file: String,
    line: u32,
}

impl SourceRef {
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    id: NodeId,
    name: SmolStr,
    shape: ShapeKind,
    bounds: Rect,
    label: Option<String>,
    link: Option<String>,
    source_ref: Option<SourceRef>,
    flags: ElementFlags,
}

impl NodeRecord {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Label text with `\n` escapes already expanded; anchored at the bounds center.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_anchor(&self) -> Point {
        self.bounds.center()
    }

    /// The raw link string from the description, if any. Nodes with a link get a
    /// pointing cursor in the shell.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn source_ref(&self) -> Option<&SourceRef> {
        self.source_ref.as_ref()
    }

    /// Kite vertices (top, left, bottom, right midpoints), for [`ShapeKind::Kite`].
    pub fn kite_points(&self) -> Option<[Point; 4]> {
        match self.shape {
            ShapeKind::Kite => Some([
                self.bounds.top_mid(),
                self.bounds.left_mid(),
                self.bounds.bottom_mid(),
                self.bounds.right_mid(),
            ]),
            _ => None,
        }
    }

    pub fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    text: String,
    position: Point,
}

impl EdgeLabel {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    id: EdgeId,
    tail: NodeId,
    head: NodeId,
    path: Vec<PathSeg>,
    arrowhead: [Point; 4],
    label: Option<EdgeLabel>,
    flags: ElementFlags,
}

impl EdgeRecord {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn tail(&self) -> NodeId {
        self.tail
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn path(&self) -> &[PathSeg] {
        &self.path
    }

    /// Triangle anchored at the path's terminal point, oriented along the end tangent.
    pub fn arrowhead(&self) -> &[Point; 4] {
        &self.arrowhead
    }

    pub fn label(&self) -> Option<&EdgeLabel> {
        self.label.as_ref()
    }

    pub fn flags(&self) -> &ElementFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut ElementFlags {
        &mut self.flags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenError {
    FileNotFound { path: PathBuf },
    Io { path: PathBuf, message: String },
    Parse { path: PathBuf, source: DotParseError },
    Layout { source: LayoutError },
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => {
                write!(f, "diagram file not found: {}", path.display())
            }
            Self::Io { path, message } => {
                write!(f, "cannot read diagram file {}: {message}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse diagram {}: {source}", path.display())
            }
            Self::Layout { source } => write!(f, "layout failed: {source}"),
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Layout { source } => Some(source),
            _ => None,
        }
    }
}

/// One rendered diagram: element arenas plus adjacency, built from one description.
#[derive(Debug)]
pub struct GraphDiagram {
    id: DiagramId,
    path: PathBuf,
    dpi: f64,
    scale: f64,
    scene_rect: Rect,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    node_names: BTreeMap<SmolStr, NodeId>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    // Never read after construction; held so its drop releases the engine state.
    _layout: LayoutLease,
}

impl GraphDiagram {
    /// Reads, parses, lays out, and builds a diagram in one step.
    ///
    /// Any failure leaves no state behind; the layout lease of a successful compute is
    /// carried inside the diagram and released when it is dropped.
    pub fn construct(
        id: DiagramId,
        path: &Path,
        layout: &Arc<LayoutContext>,
    ) -> Result<Self, OpenError> {
        let text = fs::read_to_string(path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => OpenError::FileNotFound {
                path: path.to_owned(),
            },
            _ => OpenError::Io {
                path: path.to_owned(),
                message: error.to_string(),
            },
        })?;
        let ast = dot::parse(&text).map_err(|source| OpenError::Parse {
            path: path.to_owned(),
            source,
        })?;
        let lease = layout
            .compute(&ast)
            .map_err(|source| OpenError::Layout { source })?;
        Self::from_layout(id, path.to_owned(), &ast, lease)
            .map_err(|source| OpenError::Layout { source })
    }

    /// Builds the element arenas from an already-computed layout.
    ///
    /// This is the presentation-thread half of the two-phase open: the layout may have
    /// been computed on a worker, element construction happens here.
    pub fn from_layout(
        id: DiagramId,
        path: PathBuf,
        ast: &GraphAst,
        lease: LayoutLease,
    ) -> Result<Self, LayoutError> {
        let dpi = ast.dpi();
        let scale = dpi / DOT_DEFAULT_DPI;

        let mut nodes = Vec::with_capacity(ast.nodes().len());
        let mut edges = Vec::with_capacity(ast.edges().len());
        let mut node_names = BTreeMap::new();
        let scene_rect;

        {
            let snapshot = lease.snapshot();
            let bb = snapshot.bounding_box;
            let transform = SceneTransform::new(scale, bb.y + bb.height);
            scene_rect = Rect::new(bb.x * scale, 0.0, bb.width * scale, bb.height * scale);

            for (index, ast_node) in ast.nodes().iter().enumerate() {
                let placement =
                    snapshot
                        .placement(ast_node.name())
                        .ok_or_else(|| LayoutError::MissingPlacement {
                            node: SmolStr::new(ast_node.name()),
                        })?;
                let center = transform.to_scene(placement.center);
                let width = transform.to_scene_length(placement.width);
                let height = transform.to_scene_length(placement.height);

                let id = NodeId::from_index(index);
                node_names.insert(SmolStr::new(ast_node.name()), id);
                nodes.push(NodeRecord {
                    id,
                    name: SmolStr::new(ast_node.name()),
                    shape: match ast_node.attr("shape") {
                        Some("rect") => ShapeKind::Rectangle,
                        Some("diamond") => ShapeKind::Kite,
                        _ => ShapeKind::Ellipse,
                    },
                    bounds: Rect::new(
                        center.x - width / 2.0,
                        center.y - height / 2.0,
                        width,
                        height,
                    ),
                    label: ast_node.attr("label").map(|label| label.replace("\\n", "\n")),
                    link: ast_node
                        .attr("URL")
                        .filter(|url| !url.is_empty())
                        .map(str::to_owned),
                    source_ref: match (ast_node.attr("file"), ast_node.attr("line")) {
                        (Some(file), Some(line)) => {
                            line.trim().parse::<u32>().ok().map(|line| SourceRef {
                                file: file.to_owned(),
                                line,
                            })
                        }
                        _ => None,
                    },
                    flags: ElementFlags::default(),
                });
            }

            for (index, ast_edge) in ast.edges().iter().enumerate() {
                let route = snapshot
                    .edge_routes
                    .get(index)
                    .ok_or(LayoutError::MissingRoute { edge_index: index })?;
                if route.control_points.len() % 3 != 1 {
                    return Err(LayoutError::MalformedSpline {
                        edge_index: index,
                        points: route.control_points.len(),
                    });
                }

                let tail = node_names
                    .get(ast_edge.tail())
                    .copied()
                    .expect("edge endpoints resolve within the description");
                let head = node_names
                    .get(ast_edge.head())
                    .copied()
                    .expect("edge endpoints resolve within the description");

                let points: Vec<Point> = route
                    .control_points
                    .iter()
                    .map(|p| transform.to_scene(*p))
                    .collect();

                let mut path = Vec::with_capacity(points.len() + 2);
                match route.start {
                    Some(start) => {
                        path.push(PathSeg::MoveTo(transform.to_scene(start)));
                        path.push(PathSeg::LineTo(points[0]));
                    }
                    None => path.push(PathSeg::MoveTo(points[0])),
                }
                for triple in points[1..].chunks_exact(3) {
                    path.push(PathSeg::CubicTo(triple[0], triple[1], triple[2]));
                }
                let terminal = match route.end {
                    Some(end) => {
                        let end = transform.to_scene(end);
                        path.push(PathSeg::LineTo(end));
                        end
                    }
                    None => points[points.len() - 1],
                };

                // Tangent at the parametric end: last distinct point before the tip.
                let reference = points
                    .iter()
                    .rev()
                    .find(|p| **p != terminal)
                    .copied()
                    .unwrap_or(terminal);

                let label = ast_edge.attr("label").map(|text| EdgeLabel {
                    text: text.to_owned(),
                    position: route
                        .label_pos
                        .map(|pos| transform.to_scene(pos))
                        .unwrap_or_else(|| points[points.len() / 2]),
                });

                edges.push(EdgeRecord {
                    id: EdgeId::from_index(index),
                    tail,
                    head,
                    path,
                    arrowhead: arrowhead(terminal, reference),
                    label,
                    flags: ElementFlags::default(),
                });
            }
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            outgoing[edge.tail.index()].push(edge.id);
            incoming[edge.head.index()].push(edge.id);
        }

        Ok(Self {
            id,
            path,
            dpi,
            scale,
            scene_rect,
            nodes,
            edges,
            node_names,
            outgoing,
            incoming,
            _layout: lease,
        })
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scene_rect(&self) -> Rect {
        self.scene_rect
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    pub fn edge(&self, id: EdgeId) -> &EdgeRecord {
        &self.edges[id.index()]
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn node_flags_mut(&mut self, id: NodeId) -> &mut ElementFlags {
        self.nodes[id.index()].flags_mut()
    }

    pub fn edge_flags_mut(&mut self, id: EdgeId) -> &mut ElementFlags {
        self.edges[id.index()].flags_mut()
    }

    pub fn outgoing_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.outgoing[id.index()]
    }

    pub fn incoming_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.incoming[id.index()]
    }

    /// Restores every element to visible and unhighlighted.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.flags.reset();
        }
        for edge in &mut self.edges {
            edge.flags.reset();
        }
    }

}
