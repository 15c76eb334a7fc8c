//! Error types surfaced by the document core and the file gateway.
//!
//! Load failures end the session; path, edit and save failures are reported and leave the
//! in-memory document as it was.

use crate::{Path, ValueKind};
use std::path::PathBuf;
use thiserror::Error;

/// The raw text could not be turned into a document. No partial document is ever exposed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file is not valid UTF-8")]
    Encoding(#[source] std::str::Utf8Error),

    #[error("malformed JSON: {message}")]
    Syntax { message: String },

    #[error("top-level value must be an object, found {found}")]
    RootNotMapping { found: ValueKind },
}

/// A path did not resolve against the current document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("the document root cannot be replaced")]
    EmptyPath,

    #[error("key '{key}' not found under {path}")]
    MissingKey { path: Path, key: String },

    #[error("index {index} out of range under {path} (length {len})")]
    IndexOutOfRange { path: Path, index: usize, len: usize },

    #[error("{path} is a {found}, it cannot be descended into with that segment")]
    NotAContainer { path: Path, found: ValueKind },

    #[error("{path} holds a {found}, only scalar values can be replaced")]
    NotAScalar { path: Path, found: ValueKind },
}

/// A commit from the edit form was rejected. The document is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no field is selected for editing")]
    NoActiveSession,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("'{text}' is not an integer (required by {path})")]
    InvalidInteger { path: Path, text: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("writing {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
