// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The workspace: open diagrams, the browsing history, and the event stream a
//! shell consumes.
//!
//! All state mutation happens on the owner's thread. The one concession to
//! concurrency is the two-phase open: layout runs on a blocking worker so a slow
//! engine does not freeze interaction, and the result is handed back through a
//! oneshot channel for element construction where the workspace lives.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::config::ViewerConfig;
use crate::format::dot;
use crate::history::{HistoryRecord, HistoryRef, HistoryTree};
use crate::layout::{LayoutContext, LayoutEngine, LayoutError, LayoutLease};
use crate::model::diagram::{GraphDiagram, OpenError};
use crate::model::graph_ast::GraphAst;
use crate::model::ids::{DiagramId, DiagramIdGen, NodeId};
use crate::nav::{self, LinkResolutionError};
use crate::ops;

/// What the workspace tells its shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    /// A diagram finished building and became active.
    DiagramBuilt { diagram_id: DiagramId },
    /// A node link was activated; the shell decides whether to follow it.
    NavigationRequested { origin: DiagramId, target: PathBuf },
    /// The hovered node carries a source location worth showing.
    SourceLineOfInterest { file: String, line: u32 },
}

/// Layout in flight for one description, started by [`Workspace::begin_layout`].
#[derive(Debug)]
pub struct PendingLayout {
    path: PathBuf,
    ast: Arc<GraphAst>,
    receiver: oneshot::Receiver<Result<LayoutLease, LayoutError>>,
}

impl PendingLayout {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Everything one viewer session owns.
pub struct Workspace {
    config: ViewerConfig,
    layout: Arc<LayoutContext>,
    diagrams: BTreeMap<DiagramId, GraphDiagram>,
    history: HistoryTree,
    ids: DiagramIdGen,
    events: mpsc::UnboundedSender<ViewerEvent>,
    active: Option<DiagramId>,
}

impl Workspace {
    pub fn new(
        config: ViewerConfig,
        engine: Box<dyn LayoutEngine>,
    ) -> (Self, mpsc::UnboundedReceiver<ViewerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                config,
                layout: LayoutContext::new(engine),
                diagrams: BTreeMap::new(),
                history: HistoryTree::new(),
                ids: DiagramIdGen::new(),
                events,
                active: None,
            },
            receiver,
        )
    }

    /// Opens a diagram file as a new top-level history entry.
    pub fn open_diagram(&mut self, path: &Path) -> Result<DiagramId, OpenError> {
        self.open_under(path, HistoryRef::empty())
    }

    /// Opens a diagram reached from `origin`, attaching it under the origin's
    /// history entry. Falls back to top-level when the origin left the history.
    pub fn open_linked_diagram(
        &mut self,
        origin: DiagramId,
        path: &Path,
    ) -> Result<DiagramId, OpenError> {
        let parent = self.history.find_by_id(origin);
        self.open_under(path, parent)
    }

    fn open_under(&mut self, path: &Path, parent: HistoryRef) -> Result<DiagramId, OpenError> {
        if let Some(existing) = self.diagram_by_path(path) {
            self.active = Some(existing);
            return Ok(existing);
        }

        let id = self.ids.allocate();
        let diagram = GraphDiagram::construct(id, path, &self.layout)?;
        self.register(diagram, parent);
        Ok(id)
    }

    /// First half of a non-blocking open: read and parse here, ship the layout
    /// computation to a blocking worker. Must run inside a tokio runtime.
    pub fn begin_layout(&self, path: &Path) -> Result<PendingLayout, OpenError> {
        let text = fs::read_to_string(path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => OpenError::FileNotFound {
                path: path.to_owned(),
            },
            _ => OpenError::Io {
                path: path.to_owned(),
                message: error.to_string(),
            },
        })?;
        let ast = Arc::new(dot::parse(&text).map_err(|source| OpenError::Parse {
            path: path.to_owned(),
            source,
        })?);

        let (sender, receiver) = oneshot::channel();
        let layout = Arc::clone(&self.layout);
        let worker_ast = Arc::clone(&ast);
        tokio::task::spawn_blocking(move || {
            let _ = sender.send(layout.compute(&worker_ast));
        });

        Ok(PendingLayout {
            path: path.to_owned(),
            ast,
            receiver,
        })
    }

    /// Second half: awaits the layout and builds the diagram on this thread.
    /// With `origin`, the new entry attaches under that diagram's history row.
    pub async fn finish_open(
        &mut self,
        pending: PendingLayout,
        origin: Option<DiagramId>,
    ) -> Result<DiagramId, OpenError> {
        let lease = pending
            .receiver
            .await
            .unwrap_or_else(|_| {
                Err(LayoutError::EngineFailure {
                    message: "layout worker dropped its result".to_owned(),
                })
            })
            .map_err(|source| OpenError::Layout { source })?;

        if let Some(existing) = self.diagram_by_path(&pending.path) {
            // The lease drops here, releasing the redundant layout.
            self.active = Some(existing);
            return Ok(existing);
        }

        let id = self.ids.allocate();
        let diagram = GraphDiagram::from_layout(id, pending.path, &pending.ast, lease)
            .map_err(|source| OpenError::Layout { source })?;
        let parent = origin
            .map(|origin| self.history.find_by_id(origin))
            .unwrap_or_else(HistoryRef::empty);
        self.register(diagram, parent);
        Ok(id)
    }

    fn register(&mut self, diagram: GraphDiagram, parent: HistoryRef) {
        let id = diagram.id();
        let record =
            HistoryRecord::from_diagram_path(id, self.config.diagrams_root(), diagram.path());
        let appended = self.history.append(&parent, record);
        debug_assert!(appended, "freshly allocated ids never collide");
        self.diagrams.insert(id, diagram);
        self.active = Some(id);
        let _ = self.events.send(ViewerEvent::DiagramBuilt { diagram_id: id });
    }

    /// Hover entry: highlight the subtree and surface the node's source line.
    pub fn hover_node(&mut self, diagram_id: DiagramId, node: NodeId) {
        let Some(diagram) = self.diagrams.get_mut(&diagram_id) else {
            return;
        };
        ops::highlight_subtree(diagram, node);
        if let Some(source_ref) = diagram.node(node).source_ref() {
            let _ = self.events.send(ViewerEvent::SourceLineOfInterest {
                file: source_ref.file().to_owned(),
                line: source_ref.line(),
            });
        }
    }

    /// Hover exit. Selected nodes and nodes under a highlighted ancestor keep
    /// their highlight; otherwise the subtree is cleared, sparing branches an
    /// active selection still covers.
    pub fn leave_node(
        &mut self,
        diagram_id: DiagramId,
        node: NodeId,
        node_is_selected: bool,
        selection_active: bool,
    ) {
        let Some(diagram) = self.diagrams.get_mut(&diagram_id) else {
            return;
        };
        if node_is_selected || ops::has_highlighted_ancestor_node(diagram, node) {
            return;
        }
        ops::unhighlight_subtree(diagram, node, selection_active);
    }

    /// Follows a node's link, if any, and asks the shell to navigate.
    pub fn activate_node_link(
        &mut self,
        diagram_id: DiagramId,
        node: NodeId,
    ) -> Result<(), LinkResolutionError> {
        let Some(diagram) = self.diagrams.get(&diagram_id) else {
            return Ok(());
        };
        let Some(link) = diagram.node(node).link() else {
            return Ok(());
        };
        let current_dir = diagram.path().parent().unwrap_or_else(|| Path::new(""));
        let target = nav::resolve_existing(current_dir, link, self.config.diagrams_root())?;
        let _ = self.events.send(ViewerEvent::NavigationRequested {
            origin: diagram_id,
            target,
        });
        Ok(())
    }

    /// Drops a diagram and its layout lease. The history entry stays; reopening
    /// the same path later makes a fresh one.
    pub fn close_diagram(&mut self, id: DiagramId) -> bool {
        let removed = self.diagrams.remove(&id).is_some();
        if self.active == Some(id) {
            self.active = self.diagrams.keys().next_back().copied();
        }
        removed
    }

    pub fn diagram(&self, id: DiagramId) -> Option<&GraphDiagram> {
        self.diagrams.get(&id)
    }

    pub fn diagram_mut(&mut self, id: DiagramId) -> Option<&mut GraphDiagram> {
        self.diagrams.get_mut(&id)
    }

    pub fn history(&self) -> &HistoryTree {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryTree {
        &mut self.history
    }

    pub fn active_diagram_id(&self) -> Option<DiagramId> {
        self.active
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn diagram_by_path(&self, path: &Path) -> Option<DiagramId> {
        self.diagrams
            .values()
            .find(|diagram| diagram.path() == path)
            .map(GraphDiagram::id)
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("diagrams", &self.diagrams.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
