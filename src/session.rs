use crate::{
    BimValue, Coercion, Document, EditError, ModelTree, NodeId, NodeKind, Path, ValueKind,
    statics,
};

/// The one field currently open in the detail form.
///
/// Created by [`EditSession::select`] on a `"key: value"` leaf whose document value is a scalar.
/// Selecting another node replaces the session; uncommitted text is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    node: NodeId,
    key: String,
    path: Path,
    original_kind: ValueKind,
    text: String,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub node: NodeId,
    pub path: Path,
    pub previous: BimValue,
    pub value: BimValue,
}

impl EditSession {
    /// Open `node` for editing. Returns `None` for group/item/root nodes, for leaves holding a
    /// container, and for leaves whose location no longer resolves.
    pub fn select(tree: &ModelTree, document: &Document, node: NodeId) -> Option<Self> {
        let display = tree.node(node)?;
        let key = display.key()?;
        let text = display.value_text()?;

        let path = tree.resolve_path(node);
        let current = document.get(&path).ok()?;
        if !current.is_scalar() {
            return None;
        }

        Some(Self {
            node,
            key: key.to_string(),
            path,
            original_kind: current.kind(),
            text: text.to_string(),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runtime type of the value when the field was selected.
    pub fn original_kind(&self) -> ValueKind {
        self.original_kind
    }

    /// Current contents of the edit box.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Write `new_text` to the document location of the selected leaf and refresh its label.
    ///
    /// Every segment must resolve, including the last: a field that has disappeared is reported
    /// as [`crate::PathError::MissingKey`] and neither the document nor the label changes.
    /// The session stays open afterwards with the edit box showing the stored value.
    pub fn commit(
        &mut self,
        new_text: &str,
        document: &mut Document,
        tree: &mut ModelTree,
        coercion: Coercion,
    ) -> Result<Committed, EditError> {
        let previous = document.get(&self.path)?.clone();
        let value = document.assign_text(&self.path, new_text, coercion)?;

        let shown = value.display_text();
        tree.refresh_label(self.node, &self.key, &shown);
        if self.key == statics::BIM_NAME {
            self.refresh_owning_item(document, tree);
        }
        self.text = shown;

        Ok(Committed {
            node: self.node,
            path: self.path.clone(),
            previous,
            value,
        })
    }

    fn refresh_owning_item(&self, document: &Document, tree: &mut ModelTree) {
        let Some(item) = tree.parent(self.node) else {
            return;
        };
        if tree.node(item).map(|n| n.kind()) != Some(&NodeKind::Item) {
            return;
        }
        if let Ok(value) = document.get(&tree.resolve_path(item)) {
            tree.refresh_item_label(item, value);
        }
    }
}
