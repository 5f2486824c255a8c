// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: identifiers, geometry, the parsed description, and the
//! rendered diagram.

pub mod diagram;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geometry;
pub mod graph_ast;
pub mod ids;

pub use diagram::{
    EdgeLabel, EdgeRecord, ElementFlags, GraphDiagram, NodeRecord, OpenError, ShapeKind, SourceRef,
};
pub use ids::{DiagramId, DiagramIdGen, EdgeId, NodeId};
