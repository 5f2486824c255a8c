// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared fixtures: canned descriptions, a one-call diagram builder, and a
//! self-cleaning temp directory for file-based tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::format::dot;
use crate::layout::fixtures::RowLayoutEngine;
use crate::layout::LayoutContext;
use crate::model::diagram::GraphDiagram;
use crate::model::ids::DiagramIdGen;

/// A small call graph exercising every node attribute the model reads.
pub(crate) const SAMPLE_DOT: &str = r#"digraph usb_submit {
    dpi = 72;
    entry [shape=rect, label="usb_submit", URL="./usb_submit_helpers", file="usb.c", line="42"];
    check [shape=diamond, label="urb valid?\ncheap path"];
    fail [label="return -EINVAL"];
    queue [label="queue_urb", URL="core/queue_urb"];
    entry -> check;
    check -> fail [label="no"];
    check -> queue [label="yes"];
}"#;

/// Two disjoint paths from `a` to `d`.
pub(crate) const DIAMOND_DOT: &str = "digraph { dpi=72; a -> b; a -> c; b -> d; c -> d }";

/// A three-node cycle, for termination tests.
pub(crate) const CYCLE_DOT: &str = "digraph { dpi=72; a -> b; b -> c; c -> a }";

/// Builds a diagram from a description string with the row engine.
pub(crate) fn build_diagram(text: &str) -> GraphDiagram {
    let context = LayoutContext::new(Box::new(RowLayoutEngine::new()));
    let ast = dot::parse(text).expect("fixture description parses");
    let lease = context.compute(&ast).expect("fixture layout");
    GraphDiagram::from_layout(
        DiagramIdGen::new().allocate(),
        PathBuf::from("fixture.dot"),
        &ast,
        lease,
    )
    .expect("fixture diagram builds")
}

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub(crate) struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub(crate) fn new(prefix: &str) -> Self {
        let unique = TEMP_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("{prefix}-{}-{unique}", process::id()));
        fs::create_dir_all(&path).expect("temp dir created");
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dirs created");
        }
        fs::write(&path, contents).expect("file written");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}
