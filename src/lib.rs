//! Core library for the Aurora Tabular Modeller.
//! Projects a tabular model definition (`.bim` JSON) into a display tree, maps tree nodes back to
//! document paths, and applies single-field edits that keep integer fields integers.

mod document;
mod error;
mod gui;
mod path;
mod persist;
mod session;
pub mod statics;
mod tree;
mod value;

pub use document::{Coercion, Document};
pub use error::{EditError, LoadError, ParseError, PathError, SaveError};
pub use gui::run_gui;
pub use path::{Path, PathSegment};
pub use persist::{LineEnding, LoadedModel, Selection, load, save};
pub use session::{Committed, EditSession};
pub use tree::{DisplayNode, ModelTree, NodeId, NodeKind, split_label};
pub use value::{BimNumber, BimValue, ValueKind};
