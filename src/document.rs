use crate::{
    BimNumber, BimValue, EditError, ParseError, Path, PathError, PathSegment, statics,
};

/// How text from the edit form is written over an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Parse as an integer; if that fails, store the raw text as a string instead.
    #[default]
    Lenient,
    /// Parse as an integer; if that fails, reject the edit.
    Strict,
}

/// A parsed model definition. The root is always a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: BimValue,
}

impl Document {
    /// Parse raw text, tolerating a leading byte-order marker.
    pub fn parse(raw_text: &str) -> Result<Self, ParseError> {
        let text = raw_text.strip_prefix(statics::UTF8_BOM).unwrap_or(raw_text);
        let root = BimValue::parse_json5(text).map_err(|e| ParseError::Syntax {
            message: e.to_string(),
        })?;
        Self::from_value(root)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(bytes).map_err(ParseError::Encoding)?;
        Self::parse(text)
    }

    pub fn from_value(root: BimValue) -> Result<Self, ParseError> {
        match root {
            BimValue::Object(_) => Ok(Self { root }),
            other => Err(ParseError::RootNotMapping {
                found: other.kind(),
            }),
        }
    }

    pub fn root(&self) -> &BimValue {
        &self.root
    }

    /// Resolve `path` segment by segment. The empty path yields the root.
    pub fn get(&self, path: &Path) -> Result<&BimValue, PathError> {
        let mut current = &self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = step(current, segment, || path.prefix(depth))?;
        }
        Ok(current)
    }

    pub fn get_mut(&mut self, path: &Path) -> Result<&mut BimValue, PathError> {
        let mut current = &mut self.root;
        for (depth, segment) in path.segments().iter().enumerate() {
            current = step_mut(current, segment, || path.prefix(depth))?;
        }
        Ok(current)
    }

    /// Replace the scalar at `path` with `new_value`, returning the previous value.
    ///
    /// The location must already exist and hold a scalar; nothing is created implicitly and
    /// containers are never replaced. On error the document is untouched.
    pub fn set(&mut self, path: &Path, new_value: BimValue) -> Result<BimValue, PathError> {
        if path.is_root() {
            return Err(PathError::EmptyPath);
        }
        if !new_value.is_scalar() {
            return Err(PathError::NotAScalar {
                path: path.clone(),
                found: new_value.kind(),
            });
        }

        let slot = self.get_mut(path)?;
        if !slot.is_scalar() {
            return Err(PathError::NotAScalar {
                path: path.clone(),
                found: slot.kind(),
            });
        }
        Ok(std::mem::replace(slot, new_value))
    }

    /// Write edit-form text over the scalar at `path`, keeping integer fields integers when the
    /// text parses. Returns the value that was stored.
    pub fn assign_text(
        &mut self,
        path: &Path,
        text: &str,
        coercion: Coercion,
    ) -> Result<BimValue, EditError> {
        let current = self.get(path)?;
        let new_value = if current.is_integer() {
            match (BimNumber::parse_integer(text), coercion) {
                (Some(n), _) => BimValue::Number(n),
                (None, Coercion::Lenient) => BimValue::String(text.to_string()),
                (None, Coercion::Strict) => {
                    return Err(EditError::InvalidInteger {
                        path: path.clone(),
                        text: text.to_string(),
                    });
                }
            }
        } else {
            BimValue::String(text.to_string())
        };

        self.set(path, new_value.clone())?;
        Ok(new_value)
    }

    /// Canonical text: 4-space indentation, key order preserved, no byte-order marker.
    pub fn serialize(&self) -> String {
        self.root.to_bim_pretty()
    }

    pub fn serialize_with_newline(&self, newline: &str) -> String {
        self.root.to_bim_pretty_with_newline(newline)
    }
}

fn step<'a>(
    value: &'a BimValue,
    segment: &PathSegment,
    at: impl Fn() -> Path,
) -> Result<&'a BimValue, PathError> {
    match (value, segment) {
        (BimValue::Object(map), PathSegment::Key(key)) => {
            map.get(key).ok_or_else(|| PathError::MissingKey {
                path: at(),
                key: key.clone(),
            })
        }
        (BimValue::Array(values), PathSegment::Index(index)) => {
            values.get(*index).ok_or_else(|| PathError::IndexOutOfRange {
                path: at(),
                index: *index,
                len: values.len(),
            })
        }
        (other, _) => Err(PathError::NotAContainer {
            path: at(),
            found: other.kind(),
        }),
    }
}

fn step_mut<'a>(
    value: &'a mut BimValue,
    segment: &PathSegment,
    at: impl Fn() -> Path,
) -> Result<&'a mut BimValue, PathError> {
    match (value, segment) {
        (BimValue::Object(map), PathSegment::Key(key)) => {
            map.get_mut(key).ok_or_else(|| PathError::MissingKey {
                path: at(),
                key: key.clone(),
            })
        }
        (BimValue::Array(values), PathSegment::Index(index)) => {
            let len = values.len();
            values
                .get_mut(*index)
                .ok_or_else(|| PathError::IndexOutOfRange {
                    path: at(),
                    index: *index,
                    len,
                })
        }
        (other, _) => Err(PathError::NotAContainer {
            path: at(),
            found: other.kind(),
        }),
    }
}
