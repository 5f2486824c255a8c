// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Browsing history as a tree of opened diagrams.
//!
//! Every diagram opened through a navigation link becomes a child of the diagram
//! it was opened from; diagrams opened directly sit under the invisible root.
//! The tree is addressed through opaque [`HistoryRef`] values and mutations are
//! announced to observers with begin/end brackets, so an attached view can stay
//! in sync row by row.

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use smol_str::SmolStr;

use crate::model::ids::DiagramId;

/// Display columns, in presentation order.
pub const COLUMNS: [&str; 3] = ["Symbol", "Dir", "File"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Symbol,
    Dir,
    File,
}

impl Column {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Symbol),
            1 => Some(Self::Dir),
            2 => Some(Self::File),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Symbol => 0,
            Self::Dir => 1,
            Self::File => 2,
        }
    }
}

/// One history row: the decomposed identity of an opened diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    id: DiagramId,
    symbol: SmolStr,
    dir: SmolStr,
    file: SmolStr,
    valid: bool,
}

impl HistoryRecord {
    /// Decomposes a diagram path into symbol, directory, and source file.
    ///
    /// Diagram files live at `<root>/<dir>/<file>.c/<symbol>.<ext>`. Paths that
    /// do not follow that convention yield a blank, invalid record; the entry
    /// still takes its place in the tree.
    pub fn from_diagram_path(id: DiagramId, diagrams_root: &Path, path: &Path) -> Self {
        let pattern = format!(
            "{}(.*/)(.*\\.c)/(.*)\\.",
            regex::escape(&diagrams_root.to_string_lossy())
        );
        let captured = Regex::new(&pattern)
            .ok()
            .and_then(|extractor| {
                let path = path.to_string_lossy().into_owned();
                extractor.captures(&path).map(|caps| {
                    (
                        SmolStr::new(&caps[3]),
                        SmolStr::new(format!("./{}", &caps[1])),
                        SmolStr::new(&caps[2]),
                    )
                })
            });
        match captured {
            Some((symbol, dir, file)) => Self {
                id,
                symbol,
                dir,
                file,
                valid: true,
            },
            None => Self::blank(id),
        }
    }

    /// An invalid record with empty cells.
    pub fn blank(id: DiagramId) -> Self {
        Self {
            id,
            symbol: SmolStr::default(),
            dir: SmolStr::default(),
            file: SmolStr::default(),
            valid: false,
        }
    }

    pub fn id(&self) -> DiagramId {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Symbol => &self.symbol,
            Column::Dir => &self.dir,
            Column::File => &self.file,
        }
    }
}

/// Opaque position in the tree. The empty ref stands for the invisible root.
///
/// A ref stays meaningful as long as the entry it points at exists; tree
/// operations hand out fresh refs rather than fixing up old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryRef(Option<RefParts>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RefParts {
    id: DiagramId,
    row: usize,
    column: usize,
}

impl HistoryRef {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn diagram(&self) -> Option<DiagramId> {
        self.0.map(|parts| parts.id)
    }

    /// Row within the parent. `None` for the empty ref.
    pub fn row(&self) -> Option<usize> {
        self.0.map(|parts| parts.row)
    }

    pub fn column(&self) -> Option<usize> {
        self.0.map(|parts| parts.column)
    }
}

/// Receives row change notifications, bracketed around each mutation.
pub trait HistoryObserver {
    fn begin_insert_rows(&mut self, parent: &HistoryRef, first: usize, last: usize);
    fn end_insert_rows(&mut self);
    fn begin_remove_rows(&mut self, parent: &HistoryRef, first: usize, last: usize);
    fn end_remove_rows(&mut self);
}

#[derive(Debug)]
struct Entry {
    record: HistoryRecord,
    parent: DiagramId,
    children: Vec<DiagramId>,
}

/// The history tree itself.
pub struct HistoryTree {
    entries: BTreeMap<DiagramId, Entry>,
    observers: Vec<Box<dyn HistoryObserver>>,
}

impl HistoryTree {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            DiagramId::ROOT,
            Entry {
                record: HistoryRecord::blank(DiagramId::ROOT),
                parent: DiagramId::ROOT,
                children: Vec::new(),
            },
        );
        Self {
            entries,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn HistoryObserver>) {
        self.observers.push(observer);
    }

    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    pub fn header(&self, section: usize) -> Option<&'static str> {
        COLUMNS.get(section).copied()
    }

    /// Number of children under `parent`. Refs off the first column never have
    /// children.
    pub fn row_count(&self, parent: &HistoryRef) -> usize {
        if parent.column().map_or(false, |column| column != 0) {
            return 0;
        }
        self.resolve(parent)
            .and_then(|id| self.entries.get(&id))
            .map_or(0, |entry| entry.children.len())
    }

    /// Ref for the cell at `(row, column)` under `parent`; empty when out of
    /// range.
    pub fn index(&self, parent: &HistoryRef, row: usize, column: usize) -> HistoryRef {
        if column >= COLUMNS.len() {
            return HistoryRef::empty();
        }
        let Some(parent_id) = self.resolve(parent) else {
            return HistoryRef::empty();
        };
        let Some(parent_entry) = self.entries.get(&parent_id) else {
            return HistoryRef::empty();
        };
        match parent_entry.children.get(row) {
            Some(&id) => HistoryRef(Some(RefParts { id, row, column })),
            None => HistoryRef::empty(),
        }
    }

    /// Parent ref of `child`, always in column 0; empty for top-level entries.
    pub fn parent(&self, child: &HistoryRef) -> HistoryRef {
        let Some(child_id) = child.diagram() else {
            return HistoryRef::empty();
        };
        let Some(entry) = self.entries.get(&child_id) else {
            return HistoryRef::empty();
        };
        if entry.parent == DiagramId::ROOT {
            return HistoryRef::empty();
        }
        match self.row_of(entry.parent) {
            Some(row) => HistoryRef(Some(RefParts {
                id: entry.parent,
                row,
                column: 0,
            })),
            None => HistoryRef::empty(),
        }
    }

    /// Cell text for a ref; `None` for the empty ref or a stale one.
    pub fn data(&self, index: &HistoryRef) -> Option<&str> {
        let parts = index.0?;
        let column = Column::from_index(parts.column)?;
        self.entries
            .get(&parts.id)
            .map(|entry| entry.record.cell(column))
    }

    pub fn record(&self, index: &HistoryRef) -> Option<&HistoryRecord> {
        self.entries
            .get(&index.diagram()?)
            .map(|entry| &entry.record)
    }

    /// Inserts a record at `position` under `parent` (clamped to the child
    /// count). Fails on a stale parent ref or a duplicate diagram id.
    pub fn insert(&mut self, parent: &HistoryRef, record: HistoryRecord, position: usize) -> bool {
        let Some(parent_id) = self.resolve(parent) else {
            return false;
        };
        let id = record.id();
        if self.entries.contains_key(&id) {
            return false;
        }
        let child_count = match self.entries.get(&parent_id) {
            Some(entry) => entry.children.len(),
            None => return false,
        };
        let position = position.min(child_count);

        for observer in &mut self.observers {
            observer.begin_insert_rows(parent, position, position);
        }
        self.entries.insert(
            id,
            Entry {
                record,
                parent: parent_id,
                children: Vec::new(),
            },
        );
        if let Some(entry) = self.entries.get_mut(&parent_id) {
            entry.children.insert(position, id);
        }
        for observer in &mut self.observers {
            observer.end_insert_rows();
        }
        true
    }

    /// Inserts after the last existing child.
    pub fn append(&mut self, parent: &HistoryRef, record: HistoryRecord) -> bool {
        self.insert(parent, record, usize::MAX)
    }

    /// Removes the child at `row` under `parent`, with its whole subtree.
    /// Out-of-range rows fail without notifying observers.
    pub fn remove(&mut self, parent: &HistoryRef, row: usize) -> bool {
        let Some(parent_id) = self.resolve(parent) else {
            return false;
        };
        let removed = match self.entries.get(&parent_id) {
            Some(entry) => match entry.children.get(row) {
                Some(&id) => id,
                None => return false,
            },
            None => return false,
        };

        for observer in &mut self.observers {
            observer.begin_remove_rows(parent, row, row);
        }
        if let Some(entry) = self.entries.get_mut(&parent_id) {
            entry.children.remove(row);
        }
        let mut doomed = vec![removed];
        while let Some(id) = doomed.pop() {
            if let Some(entry) = self.entries.remove(&id) {
                doomed.extend(entry.children);
            }
        }
        for observer in &mut self.observers {
            observer.end_remove_rows();
        }
        true
    }

    /// Level-order search for the entry holding `id`; empty when absent.
    pub fn find_by_id(&self, id: DiagramId) -> HistoryRef {
        let mut frontier = vec![DiagramId::ROOT];
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for parent in frontier {
                let Some(entry) = self.entries.get(&parent) else {
                    continue;
                };
                for (row, &child) in entry.children.iter().enumerate() {
                    if child == id {
                        return HistoryRef(Some(RefParts {
                            id,
                            row,
                            column: 0,
                        }));
                    }
                    next.push(child);
                }
            }
            frontier = next;
        }
        HistoryRef::empty()
    }

    fn resolve(&self, index: &HistoryRef) -> Option<DiagramId> {
        match index.0 {
            None => Some(DiagramId::ROOT),
            Some(parts) => self.entries.contains_key(&parts.id).then_some(parts.id),
        }
    }

    fn row_of(&self, id: DiagramId) -> Option<usize> {
        let entry = self.entries.get(&id)?;
        let parent = self.entries.get(&entry.parent)?;
        parent.children.iter().position(|&child| child == id)
    }
}

impl Default for HistoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HistoryTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryTree")
            .field("entries", &self.entries)
            .field("observers", &self.observers.len())
            .finish()
    }
}
