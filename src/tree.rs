//! Display tree derived from a [`Document`].
//!
//! Nodes live in an arena indexed by [`NodeId`], stored in pre-order. Each node records the path
//! segments it adds on top of its parent, so a node's document location is rebuilt by walking up
//! to the root rather than by re-reading label text.

use crate::{BimValue, Document, Path, PathSegment, statics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The single top-level "Model" node.
    Root,
    /// A `"key: value"` field.
    Leaf { key: String },
    /// One of the named collections under `model`.
    Group,
    /// An element of a collection, labeled by its `name`.
    Item,
}

#[derive(Debug, Clone)]
pub struct DisplayNode {
    label: String,
    kind: NodeKind,
    segments: Vec<PathSegment>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

impl DisplayNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The key of a leaf node.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { key } => Some(key),
            _ => None,
        }
    }

    /// The value text of a leaf node (the label after `"key: "`).
    pub fn value_text(&self) -> Option<&str> {
        let key = self.key()?;
        self.label
            .strip_prefix(key)?
            .strip_prefix(statics::LABEL_SEPARATOR)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

/// Split a label into key and value text at the first `": "`.
/// Group and item labels (bare names) have no separator and yield `None`.
pub fn split_label(label: &str) -> Option<(&str, &str)> {
    label.split_once(statics::LABEL_SEPARATOR)
}

fn leaf_label(key: &str, value_text: &str) -> String {
    format!("{key}{}{value_text}", statics::LABEL_SEPARATOR)
}

fn item_label(item: &BimValue) -> String {
    match item {
        BimValue::Object(fields) => match fields.get(statics::BIM_NAME) {
            Some(name) => name.display_text(),
            None => statics::EN_ITEM_UNNAMED.to_string(),
        },
        other => other.display_text(),
    }
}

#[derive(Debug, Clone)]
pub struct ModelTree {
    nodes: Vec<DisplayNode>,
}

impl ModelTree {
    /// Project `document` into display nodes.
    ///
    /// Layout: a root "Model" node holding `name` and `compatibilityLevel` leaves, then one group
    /// per collection under `model`, one item per collection element and one leaf per field of
    /// each element, all in document order.
    pub fn build(document: &Document) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.push(None, NodeKind::Root, statics::EN_ROOT_LABEL.to_string(), vec![]);
        tree.nodes[root.0].expanded = true;

        let value = document.root();
        for key in statics::BIM_ROOT_FIELDS {
            let text = value.get(key).map(BimValue::display_text).unwrap_or_default();
            tree.push_leaf(root, key, &text);
        }

        let model = value.get(statics::BIM_MODEL);
        for collection in statics::BIM_COLLECTIONS {
            let group = tree.push(
                Some(root),
                NodeKind::Group,
                collection.to_string(),
                vec![
                    PathSegment::key(statics::BIM_MODEL),
                    PathSegment::key(collection),
                ],
            );

            let items = model
                .and_then(|m| m.get(collection))
                .and_then(BimValue::as_array)
                .unwrap_or_default();
            for (index, item) in items.iter().enumerate() {
                let item_node = tree.push(
                    Some(group),
                    NodeKind::Item,
                    item_label(item),
                    vec![PathSegment::Index(index)],
                );
                let Some(fields) = item.as_object() else {
                    continue;
                };
                for (key, field) in fields {
                    tree.push_leaf(item_node, key, &field.display_text());
                }
            }
        }

        tree
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind,
        label: String,
        segments: Vec<PathSegment>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DisplayNode {
            label,
            kind,
            segments,
            parent,
            children: Vec::new(),
            expanded: false,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn push_leaf(&mut self, parent: NodeId, key: &str, value_text: &str) -> NodeId {
        self.push(
            Some(parent),
            NodeKind::Leaf {
                key: key.to_string(),
            },
            leaf_label(key, value_text),
            vec![PathSegment::key(key)],
        )
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&DisplayNode> {
        self.nodes.get(id.0)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(DisplayNode::label)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(DisplayNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(DisplayNode::children).unwrap_or_default()
    }

    /// All node ids in pre-order (parents before children, siblings in document order).
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// The document location a node was derived from. Walks up to the root collecting each
    /// node's own segments; the root contributes none. Unknown ids resolve to the root path.
    pub fn resolve_path(&self, id: NodeId) -> Path {
        let mut reversed = Vec::new();
        let mut current = self.node(id);
        while let Some(node) = current {
            reversed.extend(node.segments.iter().rev().cloned());
            current = node.parent.and_then(|p| self.node(p));
        }
        reversed.reverse();
        Path::new(reversed)
    }

    /// First node (in pre-order) whose resolved path equals `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.iter().find(|id| self.resolve_path(*id) == *path)
    }

    /// Replace a node's label with `"{key}: {new_value_text}"`. Children and tree shape are left
    /// alone. Returns `false` for unknown ids.
    pub fn refresh_label(&mut self, id: NodeId, key: &str, new_value_text: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        node.label = leaf_label(key, new_value_text);
        true
    }

    /// Re-derive an item node's label after its `name` field changed.
    pub fn refresh_item_label(&mut self, id: NodeId, item: &BimValue) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.kind == NodeKind::Item => {
                node.label = item_label(item);
                true
            }
            _ => false,
        }
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.expanded = expanded;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelTree, NodeKind, split_label};
    use crate::{Document, bim_path, statics};
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::parse(
            r#"{
                "name": "SemanticModel",
                "compatibilityLevel": 1500,
                "model": {
                    "dataSources": [ { "name": "SqlServer", "type": "structured" } ],
                    "tables": [
                        { "name": "Sales", "isHidden": false },
                        { "description": "no name here" },
                        "odd"
                    ],
                    "annotations": [ { "name": "PBI_QueryOrder", "value": "[]" } ]
                }
            }"#,
        )
        .unwrap()
    }

    fn labels_of(tree: &ModelTree, id: super::NodeId) -> Vec<String> {
        tree.children(id)
            .iter()
            .map(|c| tree.label(*c).unwrap().to_string())
            .collect()
    }

    #[test]
    fn build_lays_out_root_fields_then_collections() {
        let tree = ModelTree::build(&sample());
        let root = tree.root();
        assert_eq!(tree.label(root), Some(statics::EN_ROOT_LABEL));
        assert!(tree.node(root).unwrap().is_expanded());
        assert_eq!(
            labels_of(&tree, root),
            vec![
                "name: SemanticModel",
                "compatibilityLevel: 1500",
                "dataSources",
                "tables",
                "relationships",
                "perspectives",
                "annotations",
                "translations",
            ]
        );
    }

    #[test]
    fn items_use_name_or_fallback_label() {
        let tree = ModelTree::build(&sample());
        let tables = tree.find_by_path(&bim_path!["model", "tables"]).unwrap();
        assert_eq!(labels_of(&tree, tables), vec!["Sales", "Unnamed", "odd"]);

        let sales = tree.children(tables)[0];
        assert_eq!(labels_of(&tree, sales), vec!["name: Sales", "isHidden: false"]);
        assert_eq!(tree.node(sales).unwrap().kind(), &NodeKind::Item);

        // Non-mapping elements get no field leaves.
        let odd = tree.children(tables)[2];
        assert!(tree.children(odd).is_empty());
    }

    #[test]
    fn missing_collections_become_empty_groups() {
        let tree = ModelTree::build(&sample());
        let relationships = tree
            .find_by_path(&bim_path!["model", "relationships"])
            .unwrap();
        assert_eq!(tree.label(relationships), Some("relationships"));
        assert!(tree.children(relationships).is_empty());
    }

    #[test]
    fn resolve_path_walks_to_root() {
        let tree = ModelTree::build(&sample());
        let root = tree.root();
        assert_eq!(tree.resolve_path(root), bim_path![]);

        let name_leaf = tree.children(root)[0];
        assert_eq!(tree.resolve_path(name_leaf), bim_path!["name"]);

        let tables = tree.children(root)[3];
        let sales = tree.children(tables)[0];
        let hidden = tree.children(sales)[1];
        assert_eq!(
            tree.resolve_path(hidden),
            bim_path!["model", "tables", 0usize, "isHidden"]
        );
    }

    #[test]
    fn every_path_resolves_to_the_value_in_its_label() {
        let doc = sample();
        let tree = ModelTree::build(&doc);
        for id in tree.iter() {
            let node = tree.node(id).unwrap();
            let value = doc.get(&tree.resolve_path(id));
            match node.kind() {
                NodeKind::Leaf { .. } => {
                    let value = value.unwrap();
                    assert_eq!(node.value_text(), Some(value.display_text().as_str()));
                }
                NodeKind::Group if node.children().is_empty() => {}
                _ => assert!(value.is_ok(), "{} did not resolve", node.label()),
            }
        }
    }

    #[test]
    fn refresh_label_only_touches_the_label() {
        let mut tree = ModelTree::build(&sample());
        let before = tree.len();
        let leaf = tree
            .find_by_path(&bim_path!["model", "dataSources", 0usize, "type"])
            .unwrap();
        assert!(tree.refresh_label(leaf, "type", "provider"));
        assert_eq!(tree.label(leaf), Some("type: provider"));
        assert_eq!(tree.len(), before);
        assert_eq!(
            tree.resolve_path(leaf),
            bim_path!["model", "dataSources", 0usize, "type"]
        );
    }

    #[test]
    fn value_with_separator_does_not_confuse_paths() {
        let doc = Document::parse(
            r#"{ "name": "a: b", "compatibilityLevel": 1, "model": {} }"#,
        )
        .unwrap();
        let tree = ModelTree::build(&doc);
        let leaf = tree.children(tree.root())[0];
        let node = tree.node(leaf).unwrap();
        assert_eq!(node.label(), "name: a: b");
        assert_eq!(node.value_text(), Some("a: b"));
        assert_eq!(tree.resolve_path(leaf), bim_path!["name"]);
    }

    #[test]
    fn split_label_requires_separator() {
        assert_eq!(split_label("name: Sales"), Some(("name", "Sales")));
        assert_eq!(split_label("expression: a: b"), Some(("expression", "a: b")));
        assert_eq!(split_label("tables"), None);
        assert_eq!(split_label("key:value"), None);
    }

    #[test]
    fn groups_start_collapsed_and_remember_toggles() {
        let mut tree = ModelTree::build(&sample());
        let tables = tree.find_by_path(&bim_path!["model", "tables"]).unwrap();
        assert!(!tree.node(tables).unwrap().is_expanded());

        tree.set_expanded(tables, true);
        assert!(tree.node(tables).unwrap().is_expanded());
    }
}
