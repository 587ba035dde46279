//! Nested attribute paths.
//!
//! A key such as `"name.first"` addresses the `first` member of the object
//! stored under the `name` attribute. Paths are parsed only when the separator
//! appears after the first character, so `".hidden"` stays a plain key.

use thiserror::Error;

use crate::value::{empty_container, Value};

/// Errors raised while writing through a nested path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An intermediate value cannot hold children.
    #[error("Path segment '{segment}' does not address a container")]
    NotAContainer {
        /// The segment that could not be entered or assigned.
        segment: String,
    },
}

/// A parsed nested attribute path with at least two segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrPath {
    segments: Vec<String>,
}

impl AttrPath {
    /// Parse `key` as a nested path.
    ///
    /// Returns `None` when `key` does not contain `separator` past its first
    /// character; such keys are plain attributes.
    ///
    /// ```
    /// use modelplus::path::AttrPath;
    ///
    /// let path = AttrPath::parse("name.first", '.').unwrap();
    /// assert_eq!(path.root(), "name");
    /// assert!(AttrPath::parse("name", '.').is_none());
    /// assert!(AttrPath::parse(".name", '.').is_none());
    /// ```
    #[must_use]
    pub fn parse(key: &str, separator: char) -> Option<Self> {
        match key.find(separator) {
            Some(idx) if idx > 0 => Some(Self {
                segments: key.split(separator).map(str::to_string).collect(),
            }),
            _ => None,
        }
    }

    /// The top-level attribute this path lives under.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Segments below the root.
    #[must_use]
    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }

    /// All segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

fn array_index(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()
}

/// Walk `segments` below `value`.
///
/// Objects are entered by key and arrays by numeric index. Anything else
/// along the way resolves to `None` instead of failing.
#[must_use]
pub fn lookup<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(array_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Assign `new_value` at `segments` below `root`, creating missing objects.
///
/// Nothing is written when an intermediate value is a scalar.
pub fn assign(root: &mut Value, segments: &[String], new_value: Value) -> Result<(), PathError> {
    let Some((leaf, parents)) = segments.split_last() else {
        *root = new_value;
        return Ok(());
    };

    // Check the whole walk first so a failure leaves `root` untouched.
    let mut probe: Option<&Value> = Some(root);
    for segment in parents {
        probe = match probe {
            None => None,
            Some(Value::Object(map)) => map.get(segment),
            Some(Value::Array(items)) => match array_index(segment).and_then(|i| items.get(i)) {
                Some(item) => Some(item),
                None => {
                    return Err(PathError::NotAContainer {
                        segment: segment.clone(),
                    })
                }
            },
            Some(_) => {
                return Err(PathError::NotAContainer {
                    segment: segment.clone(),
                })
            }
        };
    }
    if let Some(parent) = probe {
        let assignable = match parent {
            Value::Object(_) => true,
            Value::Array(items) => array_index(leaf).is_some_and(|i| i < items.len()),
            _ => false,
        };
        if !assignable {
            return Err(PathError::NotAContainer {
                segment: leaf.clone(),
            });
        }
    }

    let mut current = root;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.entry(segment.clone()).or_insert_with(empty_container),
            Value::Array(items) => {
                let idx = array_index(segment).ok_or_else(|| PathError::NotAContainer {
                    segment: segment.clone(),
                })?;
                items.get_mut(idx).ok_or_else(|| PathError::NotAContainer {
                    segment: segment.clone(),
                })?
            }
            _ => {
                return Err(PathError::NotAContainer {
                    segment: segment.clone(),
                })
            }
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(leaf.clone(), new_value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = array_index(leaf)
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| PathError::NotAContainer {
                    segment: leaf.clone(),
                })?;
            *slot = new_value;
            Ok(())
        }
        _ => Err(PathError::NotAContainer {
            segment: leaf.clone(),
        }),
    }
}

/// Remove the leaf addressed by `segments` below `root`, leaving its
/// siblings and ancestors in place. Returns the removed value.
pub fn remove(root: &mut Value, segments: &[String]) -> Option<Value> {
    let (leaf, parents) = segments.split_last()?;
    let mut current = root;
    for segment in parents {
        current = match current {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(items) => items.get_mut(array_index(segment)?)?,
            _ => return None,
        };
    }
    match current {
        Value::Object(map) => map.remove(leaf),
        _ => None,
    }
}
