//! Data model and memoization store for include trees.
//!
//! A run creates one [`DependencyCache`] and hands it to a
//! [`traversal::Traversal`] for every entry point. Paths are interned into
//! [`PathId`]s so cycle checks and cached child lists compare integers, not
//! strings.
//!
//! Records are write-once: the first record stored for a path is the one every
//! later encounter replays, from any entry point.
//!
//! External names live in their own key space. `<lib/foo.h>` and a local
//! `lib/foo.h` share a label but never an id.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub mod resolver;
pub mod traversal;

/// Interned canonical path (or external/missing label).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(u32);

/// How a cached path was classified when first resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Normal,
    External,
    Missing,
}

/// Status attached to every emitted tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Normal,
    External,
    Missing,
    Circular,
}

impl From<Classification> for NodeStatus {
    fn from(c: Classification) -> Self {
        match c {
            Classification::Normal => NodeStatus::Normal,
            Classification::External => NodeStatus::External,
            Classification::Missing => NodeStatus::Missing,
        }
    }
}

impl NodeStatus {
    /// Annotation appended after the label in text output.
    #[must_use]
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            NodeStatus::Normal => None,
            NodeStatus::External => Some("(Ext)"),
            NodeStatus::Missing => Some("(!)"),
            NodeStatus::Circular => Some("(C)"),
        }
    }
}

/// One node of an include tree, emitted in DFS pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEvent {
    pub depth: usize,
    pub label: Arc<str>,
    pub status: NodeStatus,
}

/// What the cache remembers about one path.
///
/// External and Missing records never have children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub classification: Classification,
    pub children: Arc<[PathId]>,
}

impl DependencyRecord {
    #[must_use]
    pub fn leaf(classification: Classification) -> Self {
        Self { classification, children: Arc::from(Vec::new()) }
    }

    #[must_use]
    pub fn normal(children: Vec<PathId>) -> Self {
        Self { classification: Classification::Normal, children: Arc::from(children) }
    }
}

/// Counters describing how much work the cache saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Files whose text was read and scanned for directives.
    pub files_read: usize,
    /// Visits answered from a stored record.
    pub hits: usize,
    /// Visits that had to expand a file for the first time.
    pub misses: usize,
}

/// Process-lifetime store of per-path results plus the path interner.
#[derive(Debug, Default)]
pub struct DependencyCache {
    labels: Vec<Arc<str>>,
    ids: HashMap<Arc<str>, PathId>,
    external_ids: HashMap<Arc<str>, PathId>,
    records: HashMap<PathId, DependencyRecord>,
    stats: CacheStats,
}

fn intern_into(labels: &mut Vec<Arc<str>>, ids: &mut HashMap<Arc<str>, PathId>, label: &str) -> PathId {
    if let Some(id) = ids.get(label) {
        return *id;
    }
    let id = PathId(u32::try_from(labels.len()).unwrap_or(u32::MAX));
    let arc: Arc<str> = Arc::from(label);
    labels.push(arc.clone());
    ids.insert(arc, id);
    id
}

impl DependencyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a canonical path (or missing label), returning the existing id when already known.
    pub fn intern(&mut self, label: &str) -> PathId {
        intern_into(&mut self.labels, &mut self.ids, label)
    }

    /// Intern the name of a `<...>` include.
    pub fn intern_external(&mut self, name: &str) -> PathId {
        intern_into(&mut self.labels, &mut self.external_ids, name)
    }

    #[must_use]
    pub fn id_of(&self, label: &str) -> Option<PathId> {
        self.ids.get(label).copied()
    }

    #[must_use]
    pub fn external_id_of(&self, name: &str) -> Option<PathId> {
        self.external_ids.get(name).copied()
    }

    /// Label for an id produced by this cache.
    ///
    /// # Panics
    /// Panics if `id` was interned by a different cache.
    #[must_use]
    pub fn label(&self, id: PathId) -> &Arc<str> {
        &self.labels[id.0 as usize]
    }

    #[must_use]
    pub fn lookup(&self, id: PathId) -> Option<&DependencyRecord> {
        self.records.get(&id)
    }

    #[must_use]
    pub fn lookup_label(&self, label: &str) -> Option<&DependencyRecord> {
        self.id_of(label).and_then(|id| self.lookup(id))
    }

    #[must_use]
    pub fn lookup_external(&self, name: &str) -> Option<&DependencyRecord> {
        self.external_id_of(name).and_then(|id| self.lookup(id))
    }

    /// Store `record` unless one already exists. Returns whether it was stored.
    pub fn insert_if_absent(&mut self, id: PathId, record: DependencyRecord) -> bool {
        match self.records.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(v) => {
                v.insert(record);
                true
            }
        }
    }

    /// Number of paths with a stored record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }
}
