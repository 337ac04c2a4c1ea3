/*
Rendering is an observer over a finished store: building never prints.
Callers that want the original "print after build" behaviour do

    println!("{}", store.render());
 */
use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use termtree::{GlyphPalette, Tree};
use tracing::instrument;

use crate::domain::TreeStore;

/// Label for the single leaf that replaces children cut off by `max_depth`.
pub const ELIDED_LABEL: &str = "…";

pub trait TreeRender {
    /// Nested `termtree` value of the rooted tree, at most
    /// `display.max_depth` levels deep.
    fn to_tree_string(&self) -> Tree<String>;

    /// Full rooted tree as text, one line per node, no depth limit.
    fn render(&self) -> String;
}

impl TreeRender for TreeStore {
    /// A `termtree::Tree` nests one value per level and drops recursively,
    /// so its depth is capped. A node on the last allowed level that still
    /// has children gets one `…` leaf instead. A `max_depth` of 0 acts as 1.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let arena = self.arena();
        let display = &self.settings().display;
        let Some(root_idx) = arena.root() else {
            return Tree::new(display.empty_label.clone());
        };
        let max_depth = display.max_depth.max(1);

        // Pre-order with depths; reversed, every node follows its descendants
        let mut order: Vec<(Index, usize)> = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root_idx, 1)];
        while let Some((idx, depth)) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            order.push((idx, depth));
            if depth < max_depth {
                if let Some(node) = arena.get_node(idx) {
                    for &child in node.children.iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        let mut built: HashMap<Index, Tree<String>> = HashMap::new();
        for &(idx, depth) in order.iter().rev() {
            let Some(node) = arena.get_node(idx) else {
                continue;
            };
            let leaves: Vec<Tree<String>> = if depth < max_depth {
                node.children
                    .iter()
                    .filter_map(|child| built.remove(child))
                    .collect()
            } else if node.children.is_empty() {
                Vec::new()
            } else {
                vec![Tree::new(ELIDED_LABEL.to_string())]
            };
            built.insert(idx, Tree::new(node.record.id().to_string()).with_leaves(leaves));
        }

        built
            .remove(&root_idx)
            .unwrap_or_else(|| Tree::new(display.empty_label.clone()))
    }

    /// Same layout and glyphs as `termtree`, written line by line from an
    /// explicit stack.
    #[instrument(level = "debug", skip(self))]
    fn render(&self) -> String {
        let arena = self.arena();
        let Some(root_idx) = arena.root() else {
            return format!("{}\n", self.settings().display.empty_label);
        };
        let glyphs = GlyphPalette::new();

        let mut out = String::new();
        let mut visited = HashSet::new();
        // (node, indentation inherited from ancestors, last among siblings, is root)
        let mut stack: Vec<(Index, String, bool, bool)> =
            vec![(root_idx, String::new(), true, true)];

        while let Some((idx, indent, last, is_root)) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            let Some(node) = arena.get_node(idx) else {
                continue;
            };

            let child_indent = if is_root {
                out.push_str(&node.record.id().to_string());
                String::new()
            } else {
                out.push_str(&indent);
                out.push_str(if last { glyphs.last_item } else { glyphs.middle_item });
                out.push_str(glyphs.item_indent);
                out.push_str(&node.record.id().to_string());
                let skip = if last { glyphs.last_skip } else { glyphs.middle_skip };
                format!("{}{}{}", indent, skip, glyphs.skip_indent)
            };
            out.push('\n');

            let count = node.children.len();
            for (i, &child) in node.children.iter().enumerate().rev() {
                stack.push((child, child_indent.clone(), i + 1 == count, false));
            }
        }
        out
    }
}
