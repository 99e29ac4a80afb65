//! Selection-body rendering for inferred field trees.
//!
//! A leaf renders as its bare name; a field with children renders as its name
//! followed by a nested body. Children appear in the order they were first
//! recorded, depth-first.
//!
//! - **Compact output** via [`to_selection()`] - one line, ready to splice into a query
//! - **Pretty output** via [`to_selection_pretty()`] - one field per line, 2-space indentation
//!
//! # Examples
//!
//! ```
//! use await_fields::fields::FieldTree;
//! use await_fields::output::{to_selection, to_selection_pretty};
//!
//! let tree = FieldTree::from_paths(["name", "address.city"]);
//!
//! assert_eq!(to_selection(&tree), "{ name address { city } }");
//! assert_eq!(
//!     to_selection_pretty(&tree),
//!     "{\n  name\n  address {\n    city\n  }\n}"
//! );
//! ```

use crate::fields::{FieldTree, NodeId};

/// Pending work while walking a tree.
enum Step<'t> {
    Field(&'t str, NodeId, usize),
    Close(usize),
}

/// Renders field trees as selection bodies.
///
/// The walk uses an explicit stack, so arbitrarily deep trees render without
/// growing the call stack.
pub struct SelectionPrinter {
    pretty: bool,
}

impl SelectionPrinter {
    pub fn new(pretty: bool) -> Self {
        SelectionPrinter { pretty }
    }

    pub fn print(&self, tree: &FieldTree) -> String {
        let root = tree.root();
        if tree.is_leaf(root) {
            return "{}".to_string();
        }

        // (indent level, text) per output line
        let mut lines: Vec<(usize, String)> = vec![(0, "{".to_string())];
        let mut stack = vec![Step::Close(0)];
        push_children(&mut stack, tree, root, 1);

        while let Some(step) = stack.pop() {
            match step {
                Step::Field(name, node, level) if tree.is_leaf(node) => {
                    lines.push((level, name.to_string()));
                }
                Step::Field(name, node, level) => {
                    lines.push((level, format!("{} {{", name)));
                    stack.push(Step::Close(level));
                    push_children(&mut stack, tree, node, level + 1);
                }
                Step::Close(level) => lines.push((level, "}".to_string())),
            }
        }

        if self.pretty {
            lines
                .iter()
                .map(|(level, text)| format!("{}{}", self.indent(*level), text))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            lines
                .into_iter()
                .map(|(_, text)| text)
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Queues the children of `node` so the first child is popped first
fn push_children<'t>(stack: &mut Vec<Step<'t>>, tree: &'t FieldTree, node: NodeId, level: usize) {
    let children: Vec<_> = tree.children(node).collect();
    for (name, child) in children.into_iter().rev() {
        stack.push(Step::Field(name, child, level));
    }
}

/// Renders a field tree as a one-line selection body.
///
/// An empty tree renders as `{}`.
pub fn to_selection(tree: &FieldTree) -> String {
    SelectionPrinter::new(false).print(tree)
}

/// Renders a field tree with one field per line.
pub fn to_selection_pretty(tree: &FieldTree) -> String {
    SelectionPrinter::new(true).print(tree)
}
