use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::record::Record;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Record carried by this node
    pub record: Record,
    /// Index of the resolved parent node, None for the root and for orphans
    pub parent: Option<Index>,
    /// Indices of child nodes in input order
    pub children: Vec<Index>,
}

/// Arena-based tree structure for the record hierarchy.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The arena owns every node; children are stored as indices.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
            root: None,
        }
    }

    /// Inserts an unlinked node. Linking happens in a second pass via `attach`.
    #[instrument(level = "trace", skip(self, record), fields(id = %record.id()))]
    pub fn insert_node(&mut self, record: Record) -> Index {
        self.arena.insert(TreeNode {
            record,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Replaces the record of an existing node, keeping its slot.
    pub fn replace_record(&mut self, idx: Index, record: Record) -> Option<Record> {
        self.arena
            .get_mut(idx)
            .map(|node| std::mem::replace(&mut node.record, record))
    }

    /// Appends `child` to the children of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, child: Index, parent: Index) {
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    pub fn set_root(&mut self, idx: Index) -> Option<Index> {
        self.root.replace(idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order traversal of the subtree at `start`, `start` included.
    pub fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, Some(start))
    }

    /// Post-order traversal from the root.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels below and including the root, 0 for a rootless tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max_depth = 0;
        let mut visited = HashSet::new();
        let mut stack = vec![(root, 1)];

        while let Some((idx, depth)) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                for &child in &node.children {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Leaf nodes reachable from the root, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: Option<Index>) -> Self {
        Self {
            arena,
            stack: start.into_iter().collect(),
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if !self.visited.insert(current_idx) {
                continue;
            }
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
    visited: HashSet<Index>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().map(|root| (root, false)).into_iter().collect(),
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, expanded)) = self.stack.pop() {
            let Some(node) = self.arena.get_node(current_idx) else {
                continue;
            };
            if expanded {
                return Some((current_idx, node));
            }
            if !self.visited.insert(current_idx) {
                continue;
            }
            self.stack.push((current_idx, true));
            for &child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}
