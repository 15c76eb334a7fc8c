use crate::{
    Coercion, Committed, Document, EditError, EditSession, LoadError, ModelTree, NodeId,
    SaveError, statics,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => statics::NL_LF,
            LineEnding::CrLf => statics::NL_CRLF,
        }
    }
}

/// Read and parse a model file. Any failure ends the session; nothing partial is returned.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let bytes = read_file(path)?;
    parse_bytes(path, &bytes)
}

/// Overwrite `path` with the canonical serialization of `document` (LF line endings, no BOM).
pub fn save(document: &Document, path: &Path) -> Result<(), SaveError> {
    write_file(path, document.serialize().as_bytes())
}

fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bytes(path: &Path, bytes: &[u8]) -> Result<Document, LoadError> {
    Document::from_bytes(bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    fs::write(path, bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// What the detail form should show after a node was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Editable { key: String, value_text: String },
    NotEditable,
}

/// A loaded model file together with its display tree and the field under edit.
/// This is what the window shell holds for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub source_path: PathBuf,
    pub line_ending: LineEnding,
    pub document: Document,
    pub tree: ModelTree,
    pub coercion: Coercion,
    pub dirty: bool,
    session: Option<EditSession>,
}

impl LoadedModel {
    pub fn load_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = read_file(path)?;
        let document = parse_bytes(path, &bytes)?;
        let line_ending = detect_line_ending(&bytes);

        let model = Self::from_document(document, path.to_path_buf(), line_ending);
        info!(
            path = %path.display(),
            nodes = model.tree.len(),
            ?line_ending,
            "loaded model"
        );
        Ok(model)
    }

    pub fn from_document(document: Document, source_path: PathBuf, line_ending: LineEnding) -> Self {
        let tree = ModelTree::build(&document);
        Self {
            source_path,
            line_ending,
            document,
            tree,
            coercion: Coercion::default(),
            dirty: false,
            session: None,
        }
    }

    /// File name used in user-facing messages.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }

    /// Replace the current session with one for `node`. Any uncommitted text is dropped.
    pub fn select(&mut self, node: NodeId) -> Selection {
        self.session = EditSession::select(&self.tree, &self.document, node);
        match &self.session {
            Some(session) => {
                debug!(path = %session.path(), kind = %session.original_kind(), "selected field");
                Selection::Editable {
                    key: session.key().to_string(),
                    value_text: session.text().to_string(),
                }
            }
            None => Selection::NotEditable,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    /// Commit `text` to the selected field. On error the document and tree are unchanged and the
    /// session stays open so the user can try again.
    pub fn commit(&mut self, text: &str) -> Result<Committed, EditError> {
        let Some(session) = self.session.as_mut() else {
            return Err(EditError::NoActiveSession);
        };

        match session.commit(text, &mut self.document, &mut self.tree, self.coercion) {
            Ok(committed) => {
                self.dirty = true;
                debug!(
                    path = %committed.path,
                    from = committed.previous.type_name(),
                    to = committed.value.type_name(),
                    "committed edit"
                );
                Ok(committed)
            }
            Err(e) => {
                warn!(path = %session.path(), error = %e, "edit dropped");
                Err(e)
            }
        }
    }

    /// Commit whatever is currently in the session's edit box.
    pub fn commit_buffer(&mut self) -> Result<Committed, EditError> {
        let text = self
            .session
            .as_ref()
            .map(|s| s.text().to_string())
            .ok_or(EditError::NoActiveSession)?;
        self.commit(&text)
    }

    /// Serialized file contents using the line ending the file was loaded with.
    pub fn serialized_bytes(&self) -> Vec<u8> {
        self.document
            .serialize_with_newline(self.line_ending.as_str())
            .into_bytes()
    }

    /// Overwrite the file the model was loaded from.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let path = self.source_path.clone();
        self.save_to_path(&path)
    }

    /// Write to `path`; on success it becomes the source path. On failure nothing in memory
    /// changes and the save can be retried.
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), SaveError> {
        let bytes = self.serialized_bytes();
        if let Err(e) = write_file(path, &bytes) {
            warn!(path = %path.display(), error = %e, "save failed");
            return Err(e);
        }

        info!(path = %path.display(), bytes = bytes.len(), "saved model");
        self.source_path = path.to_path_buf();
        self.dirty = false;
        Ok(())
    }
}

fn detect_line_ending(bytes: &[u8]) -> LineEnding {
    // Majority vote over line terminators; a stray CRLF in an LF file does not flip it.
    let terminators = bytes.iter().filter(|b| **b == b'\n').count();
    let crlf = bytes.windows(2).filter(|w| **w == *b"\r\n").count();
    if crlf > terminators - crlf {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    }
}

#[cfg(test)]
mod tests {
    use super::{LineEnding, LoadedModel, Selection, detect_line_ending};
    use crate::{Document, EditError, bim_path};
    use std::path::PathBuf;

    fn model() -> LoadedModel {
        let doc = Document::parse(
            r#"{ "name": "M", "compatibilityLevel": 1500, "model": { "tables": [] } }"#,
        )
        .unwrap();
        LoadedModel::from_document(doc, PathBuf::from("dir/Model.bim"), LineEnding::Lf)
    }

    #[test]
    fn detect_line_ending_uses_majority() {
        let mostly_lf = b"{\n  a: 1,\n  b: 2,\r\n  c: 3,\n}\n";
        assert_eq!(detect_line_ending(mostly_lf), LineEnding::Lf);

        let mostly_crlf = b"{\r\n  a: 1,\r\n  b: 2,\n  c: 3,\r\n}\r\n";
        assert_eq!(detect_line_ending(mostly_crlf), LineEnding::CrLf);
    }

    #[test]
    fn commit_without_selection_is_rejected() {
        let mut m = model();
        assert_eq!(m.commit("x").unwrap_err(), EditError::NoActiveSession);
        assert!(!m.dirty);
    }

    #[test]
    fn selecting_a_group_clears_the_session() {
        let mut m = model();
        let name = m.tree.find_by_path(&bim_path!["name"]).unwrap();
        assert_eq!(
            m.select(name),
            Selection::Editable {
                key: "name".into(),
                value_text: "M".into()
            }
        );
        assert!(m.session().is_some());

        let tables = m.tree.find_by_path(&bim_path!["model", "tables"]).unwrap();
        assert_eq!(m.select(tables), Selection::NotEditable);
        assert!(m.session().is_none());
    }

    #[test]
    fn commit_buffer_uses_edit_box_text_and_marks_dirty() {
        let mut m = model();
        let level = m.tree.find_by_path(&bim_path!["compatibilityLevel"]).unwrap();
        m.select(level);
        m.session_mut().unwrap().text_mut().replace_range(.., "1600");

        let committed = m.commit_buffer().unwrap();
        assert_eq!(committed.value.as_i64(), Some(1600));
        assert!(m.dirty);
    }

    #[test]
    fn file_name_is_the_last_component() {
        assert_eq!(model().file_name(), "Model.bim");
    }
}
