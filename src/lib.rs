// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Undine — headless core of an interactive call-graph diagram viewer.
//!
//! Diagrams are read from layout-annotated GraphViz-style descriptions, turned into
//! scene-space elements, explored via conditional subtree propagation (hide/highlight),
//! and every visited diagram is recorded in a browsable history forest.

pub mod config;
pub mod format;
pub mod history;
pub mod layout;
pub mod model;
pub mod nav;
pub mod ops;
pub mod viewer;

pub use config::ViewerConfig;
pub use history::{HistoryRecord, HistoryRef, HistoryTree};
pub use layout::{LayoutContext, LayoutEngine};
pub use model::{DiagramId, EdgeId, GraphDiagram, NodeId, OpenError};
pub use viewer::{ViewerEvent, Workspace};
