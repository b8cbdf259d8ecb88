//! Category tree flattening
//!
//! Turns the nested category tree into the flat, indented option list a
//! select control shows, plus the reverse id → name lookup.

use serde::Serialize;
use shared::models::{Category, CategoryId};

/// Default per-level label prefix: three non-breaking spaces
pub const DEFAULT_INDENT: &str = "\u{a0}\u{a0}\u{a0}";

/// Name reported for an id that is not in the tree
pub const NOT_SPECIFIED: &str = "not specified";

/// One selectable category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: CategoryId,
    /// Indent repeated once per depth level, then the category name
    pub label: String,
}

/// Flatten with the default indentation
pub fn flatten(tree: &[Category]) -> Vec<CategoryOption> {
    flatten_with(tree, DEFAULT_INDENT)
}

/// Pre-order flatten, preserving sibling order
pub fn flatten_with(tree: &[Category], indent: &str) -> Vec<CategoryOption> {
    let mut options = Vec::new();
    let mut stack: Vec<(&Category, usize)> = tree.iter().rev().map(|c| (c, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        options.push(CategoryOption {
            value: node.id.clone(),
            label: format!("{}{}", indent.repeat(depth), node.name),
        });
        // Reversed so the first child is popped next
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }

    options
}

/// Name of the first node (pre-order) whose id matches
pub fn name_of<'a>(tree: &'a [Category], id: &CategoryId) -> &'a str {
    let mut stack: Vec<&Category> = tree.iter().rev().collect();

    while let Some(node) = stack.pop() {
        if &node.id == id {
            return &node.name;
        }
        stack.extend(node.children.iter().rev());
    }

    NOT_SPECIFIED
}

/// Total number of nodes in the tree
pub fn count_nodes(tree: &[Category]) -> usize {
    let mut count = 0;
    let mut stack: Vec<&Category> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.children.iter());
    }
    count
}
