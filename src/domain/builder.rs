//! Tree builder: turns a flat record sequence into an indexed hierarchy.

use generational_arena::Index;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::{DuplicateIdPolicy, RootPolicy, Settings};
use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::{ParentRef, Record, RecordId};
use crate::domain::store::TreeStore;

/// Constructs a [`TreeStore`] in two linear passes.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    settings: Settings,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build from raw JSON values. Every value is validated before any
    /// indexing happens; one malformed record fails the whole build.
    #[instrument(level = "debug", skip(self, values))]
    pub fn build_from_values<I>(&self, values: I) -> DomainResult<TreeStore>
    where
        I: IntoIterator<Item = Value>,
    {
        let records = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Record::from_value(value, index))
            .collect::<DomainResult<Vec<_>>>()?;
        self.build(records)
    }

    /// Build from a JSON array of record objects.
    pub fn build_from_json(&self, json: &str) -> DomainResult<TreeStore> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        self.build_from_values(values)
    }

    #[instrument(level = "debug", skip(self, records))]
    pub fn build<I>(&self, records: I) -> DomainResult<TreeStore>
    where
        I: IntoIterator<Item = Record>,
    {
        let records = records.into_iter();
        let (lower, _) = records.size_hint();
        let mut arena = TreeArena::with_capacity(lower);
        let mut index: IndexMap<RecordId, Index> = IndexMap::with_capacity(lower);

        // Pass 1: one node per distinct id, position fixed at first sight
        for record in records {
            let id = record.id().clone();
            match index.get(&id) {
                Some(&idx) => match self.settings.duplicate_ids {
                    DuplicateIdPolicy::Reject => return Err(DomainError::DuplicateId(id)),
                    DuplicateIdPolicy::LastWriteWins => {
                        warn!(%id, "duplicate record id, later record replaces earlier");
                        arena.replace_record(idx, record);
                    }
                },
                None => {
                    let idx = arena.insert_node(record);
                    index.insert(id, idx);
                }
            }
        }

        // Pass 2: link in index order
        for (id, &idx) in &index {
            let Some(parent) = arena.get_node(idx).map(|n| n.record.parent().clone()) else {
                continue;
            };
            match parent {
                ParentRef::Root => self.claim_root(&mut arena, idx, id)?,
                ParentRef::Id(parent_id) => match index.get(&parent_id) {
                    Some(&parent_idx) => arena.attach(idx, parent_idx),
                    None => debug!(%id, parent = %parent_id, "orphan: parent not found"),
                },
            }
        }

        debug!(nodes = arena.len(), has_root = arena.root().is_some(), "tree built");
        Ok(TreeStore::from_parts(index, arena, self.settings.clone()))
    }

    fn claim_root(&self, arena: &mut TreeArena, idx: Index, id: &RecordId) -> DomainResult<()> {
        let Some(previous) = arena.set_root(idx) else {
            return Ok(());
        };
        let first = arena
            .get_node(previous)
            .map(|n| n.record.id().clone())
            .unwrap_or_else(|| id.clone());
        match self.settings.multiple_roots {
            RootPolicy::Reject => Err(DomainError::MultipleRoots {
                first,
                second: id.clone(),
            }),
            RootPolicy::LastWins => {
                warn!(displaced = %first, root = %id, "multiple root records, last one wins");
                Ok(())
            }
        }
    }
}
