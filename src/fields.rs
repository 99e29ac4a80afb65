use indexmap::IndexMap;

/// Stable index of a node inside a [`FieldTree`].
///
/// Several aliases may hold the same `NodeId`; a field recorded through one of
/// them is visible through all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A field and the sub-fields read from it.
///
/// An empty node is a leaf (scalar) field. Children keep insertion order and
/// names are unique.
#[derive(Debug, Clone, Default)]
pub struct FieldNode {
    children: IndexMap<String, NodeId>,
    /// Distance from the root
    depth: usize,
}

/// Arena of [`FieldNode`]s recording which fields of one awaited value are used.
///
/// # Examples
///
/// ```
/// use await_fields::fields::FieldTree;
///
/// let mut tree = FieldTree::new();
/// let root = tree.root();
/// tree.insert_path(root, ["address", "city"]);
/// tree.insert_path(root, ["name"]);
///
/// let names: Vec<&str> = tree.children(root).map(|(name, _)| name).collect();
/// assert_eq!(names, ["address", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct FieldTree {
    nodes: Vec<FieldNode>,
}

impl Default for FieldTree {
    fn default() -> Self {
        FieldTree::new()
    }
}

impl FieldTree {
    pub fn new() -> Self {
        FieldTree {
            nodes: vec![FieldNode::default()],
        }
    }

    /// Builds a tree from dotted paths such as `address.city`
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = FieldTree::new();
        let root = tree.root();
        for path in paths {
            tree.insert_path(root, path.as_ref().split('.').filter(|s| !s.is_empty()));
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the child named `name`, creating it if needed
    pub fn child(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent.0].children.get(name) {
            return id;
        }

        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(FieldNode {
            children: IndexMap::new(),
            depth,
        });
        self.nodes[parent.0].children.insert(name.to_string(), id);
        id
    }

    /// Inserts a chain of nested fields below `from` and returns the last one
    ///
    /// Re-inserting an existing chain changes nothing. An empty chain returns
    /// `from` itself.
    pub fn insert_path<I, S>(&mut self, from: NodeId, segments: I) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .fold(from, |node, segment| self.child(node, segment.as_ref()))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.nodes[id.0]
            .children
            .iter()
            .map(|(name, &child)| (name.as_str(), child))
    }

    /// Number of fields between the root and `id`
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.0].depth
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// Whether nothing at all was recorded
    pub fn is_empty(&self) -> bool {
        self.is_leaf(self.root())
    }

    /// Looks up a dotted path from the root
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        path.split('.')
            .filter(|s| !s.is_empty())
            .try_fold(self.root(), |node, segment| {
                self.nodes[node.0].children.get(segment).copied()
            })
    }

    /// Every root-to-leaf path, dotted, in rendering order
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        let mut stack: Vec<(NodeId, String)> = vec![(self.root(), String::new())];

        while let Some((node, prefix)) = stack.pop() {
            let children: Vec<_> = self.children(node).collect();
            for (name, child) in children.into_iter().rev() {
                let path = if prefix.is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{}", prefix, name)
                };
                stack.push((child, path));
            }
            if node != self.root() && self.is_leaf(node) {
                paths.push(prefix);
            }
        }

        paths
    }
}
