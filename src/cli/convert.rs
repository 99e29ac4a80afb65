//! Field tree -> JSON conversion utilities

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{
    Analysis,
    fields::{FieldTree, NodeId},
};

/// Convert a field tree to nested JSON objects; leaves become `{}`
pub fn tree_to_json(tree: &FieldTree) -> Value {
    // pre-order puts every node before its descendants, so walking it
    // backwards builds children before their parents
    let mut order = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(tree.children(node).map(|(_, child)| child));
    }

    let mut built: HashMap<NodeId, Value> = HashMap::new();
    for &node in order.iter().rev() {
        let object = tree
            .children(node)
            .map(|(name, child)| {
                let value = built
                    .remove(&child)
                    .unwrap_or_else(|| Value::Object(Map::new()));
                (name.to_string(), value)
            })
            .collect::<Map<String, Value>>();
        built.insert(node, Value::Object(object));
    }

    built
        .remove(&tree.root())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Convert a whole analysis to `{ "fields": {...}, "diagnostics": [...] }`
///
/// With `selections`, each source expression maps to its rendered selection
/// body instead of its field tree.
pub fn analysis_to_json(analysis: &Analysis, selections: bool) -> Value {
    let fields = if selections {
        analysis
            .selections()
            .into_iter()
            .map(|(source, body)| (source, Value::String(body)))
            .collect::<Map<String, Value>>()
    } else {
        analysis
            .fields
            .iter()
            .map(|(source, tree)| (source.clone(), tree_to_json(tree)))
            .collect::<Map<String, Value>>()
    };

    let diagnostics = analysis
        .diagnostics
        .iter()
        .map(|d| Value::String(d.to_string()))
        .collect();

    let mut result = Map::new();
    result.insert("fields".to_string(), Value::Object(fields));
    result.insert("diagnostics".to_string(), Value::Array(diagnostics));
    Value::Object(result)
}
