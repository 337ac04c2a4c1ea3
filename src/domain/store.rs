//! Read-only queries over a built hierarchy.

use std::collections::HashSet;

use generational_arena::Index;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::instrument;

use crate::config::Settings;
use crate::domain::arena::TreeArena;
use crate::domain::builder::TreeBuilder;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{Record, RecordId};

/// Immutable index of records and their hierarchy.
///
/// Lookups of unknown ids never fail: single-record lookups answer `None`,
/// sequence lookups answer an empty `Vec`.
#[derive(Debug)]
pub struct TreeStore {
    index: IndexMap<RecordId, Index>,
    arena: TreeArena,
    settings: Settings,
}

impl TreeStore {
    pub(crate) fn from_parts(
        index: IndexMap<RecordId, Index>,
        arena: TreeArena,
        settings: Settings,
    ) -> Self {
        Self {
            index,
            arena,
            settings,
        }
    }

    /// Build with default settings.
    pub fn build<I>(records: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        TreeBuilder::new().build(records)
    }

    pub fn from_values<I>(values: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        TreeBuilder::new().build_from_values(values)
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        TreeBuilder::new().build_from_json(json)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn arena(&self) -> &TreeArena {
        &self.arena
    }

    fn node_index(&self, id: &RecordId) -> Option<Index> {
        self.index.get(id).copied()
    }

    fn record_at(&self, idx: Index) -> Option<&Record> {
        self.arena.get_node(idx).map(|node| &node.record)
    }

    /// All records in first-seen id order.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all(&self) -> Vec<&Record> {
        self.index
            .values()
            .filter_map(|&idx| self.record_at(idx))
            .collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_item(&self, id: &RecordId) -> Option<&Record> {
        self.node_index(id).and_then(|idx| self.record_at(idx))
    }

    /// Direct children of `id` in input order.
    #[instrument(level = "trace", skip(self))]
    pub fn get_children(&self, id: &RecordId) -> Vec<&Record> {
        self.node_index(id)
            .and_then(|idx| self.arena.get_node(idx))
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.record_at(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `id` itself followed by its ancestors, closest first.
    ///
    /// The walk ends at the root or at the first unresolvable parent.
    /// Revisiting a node fails with `CycleDetected`.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_parents(&self, id: &RecordId) -> DomainResult<Vec<&Record>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.node_index(id);

        while let Some(idx) = current {
            let Some(node) = self.arena.get_node(idx) else {
                break;
            };
            if !visited.insert(idx) {
                return Err(DomainError::CycleDetected(node.record.id().clone()));
            }
            chain.push(&node.record);
            current = node.parent;
        }
        Ok(chain)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn root(&self) -> Option<&Record> {
        self.arena.root().and_then(|idx| self.record_at(idx))
    }

    /// Records whose parent id matches no record.
    pub fn orphans(&self) -> Vec<&Record> {
        self.get_all()
            .into_iter()
            .filter(|record| {
                record
                    .parent()
                    .as_id()
                    .is_some_and(|parent| !self.index.contains_key(parent))
            })
            .collect()
    }

    /// Every record below `id`, pre-order, `id` itself excluded.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, id: &RecordId) -> Vec<&Record> {
        self.node_index(id)
            .map(|start| {
                self.arena
                    .iter_from(start)
                    .filter(|&(idx, _)| idx != start)
                    .map(|(_, node)| &node.record)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Levels in the rooted tree, 0 without a root.
    pub fn depth(&self) -> usize {
        self.arena.depth()
    }

    /// Leaves of the rooted tree, left to right.
    pub fn leaves(&self) -> Vec<&Record> {
        self.arena
            .leaf_nodes()
            .into_iter()
            .filter_map(|idx| self.record_at(idx))
            .collect()
    }

    /// Pre-order walk of the rooted tree. Orphans are not visited.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.arena.iter().map(|(_, node)| &node.record)
    }

    /// Post-order walk of the rooted tree.
    pub fn iter_postorder(&self) -> impl Iterator<Item = &Record> + '_ {
        self.arena.iter_postorder().map(|(_, node)| &node.record)
    }
}
