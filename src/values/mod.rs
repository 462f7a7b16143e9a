//! Values documents, leaf paths and provenance
//!
//! A values file is loaded into a [`ConfigDocument`]: an insertion-ordered
//! tree whose inner nodes are mappings and whose leaves are opaque YAML values
//! (scalars, sequences, null). Sequences are never descended into.

mod flatten;
mod merge;

pub use flatten::flatten;
pub use merge::{merge, MergedValues};

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::path::Path;

/// Path reported for problems at the document root
const ROOT_PATH: &str = "<root>";

/// A node in a values document
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// Nested mapping, descended into by merge and flatten
    Mapping(ConfigDocument),
    /// Anything else: scalars, null, sequences and tagged values
    Leaf(Value),
}

impl ValueNode {
    pub fn is_mapping(&self) -> bool {
        matches!(self, ValueNode::Mapping(_))
    }

    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            ValueNode::Leaf(value) => Some(value),
            ValueNode::Mapping(_) => None,
        }
    }
}

/// A mapping-rooted values document with string keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    entries: IndexMap<String, ValueNode>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse YAML text into a document
    ///
    /// `source_id` only labels parse errors. An empty file is an empty document.
    pub fn parse(text: &str, source_id: &SourceId) -> Result<Self> {
        let yaml_error = |source| Error::Yaml {
            source_id: source_id.to_string(),
            source,
        };
        let mut value: Value = serde_yaml::from_str(text).map_err(yaml_error)?;
        // `<<: *anchor` is kept as a literal key until merged explicitly
        value.apply_merge().map_err(yaml_error)?;
        Self::from_yaml(value)
    }

    /// Convert a parsed YAML value, rejecting anything not shaped like values
    pub fn from_yaml(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => Self::from_mapping(mapping, ""),
            other => Err(Error::InvalidDocumentShape {
                path: ROOT_PATH.to_string(),
                message: format!("expected a mapping, found {}", describe(&other)),
            }),
        }
    }

    fn from_mapping(mapping: serde_yaml::Mapping, prefix: &str) -> Result<Self> {
        let mut entries = IndexMap::with_capacity(mapping.len());

        for (key, value) in mapping {
            let key = key_to_string(key, prefix)?;
            let node = match value {
                Value::Mapping(nested) => {
                    let path = join_path(prefix, &key);
                    ValueNode::Mapping(Self::from_mapping(nested, &path)?)
                }
                other => ValueNode::Leaf(other),
            };
            entries.insert(key, node);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        self.entries.get(key)
    }

    /// Look up a node by dotted path (`a.b.c`)
    #[cfg(test)]
    pub(crate) fn get_path(&self, path: &str) -> Option<&ValueNode> {
        let mut segments = path.split('.');
        let mut node = self.entries.get(segments.next()?)?;
        for segment in segments {
            match node {
                ValueNode::Mapping(doc) => node = doc.entries.get(segment)?,
                ValueNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: ValueNode) -> Option<ValueNode> {
        self.entries.insert(key.into(), node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ensure `key` holds a mapping, replacing a leaf if needed, and return it.
    /// A key that already exists keeps its position.
    pub(crate) fn mapping_entry(&mut self, key: &str) -> &mut ConfigDocument {
        let slot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| ValueNode::Mapping(ConfigDocument::new()));
        if !slot.is_mapping() {
            *slot = ValueNode::Mapping(ConfigDocument::new());
        }
        match slot {
            ValueNode::Mapping(doc) => doc,
            ValueNode::Leaf(_) => unreachable!("slot was just replaced with a mapping"),
        }
    }
}

fn key_to_string(key: Value, prefix: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(Error::InvalidDocumentShape {
            path: if prefix.is_empty() {
                ROOT_PATH.to_string()
            } else {
                prefix.to_string()
            },
            message: format!("mapping keys must be scalars, found {}", describe(&other)),
        }),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Dotted path addressing one leaf of a document, e.g. `resources.limits.cpu`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LeafPath(String);

impl LeafPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strict ancestor prefixes, shortest first: `a.b.c` yields `a`, `a.b`
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0.match_indices('.').map(move |(idx, _)| &self.0[..idx])
    }
}

impl std::fmt::Display for LeafPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LeafPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LeafPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Identifier of the document a key came from, usually its file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identify a document by its file name only, e.g. `values-prod.yaml`
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self(name)
    }

    /// Fallback for leaves with no recorded provenance
    pub fn unknown() -> Self {
        Self("unknown source".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A document paired with its identifier, ready to be merged
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: SourceId,
    pub document: ConfigDocument,
}

impl SourceDocument {
    pub fn new(id: impl Into<SourceId>, document: ConfigDocument) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }
}

/// Which document last set each path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceMap {
    sources: HashMap<LeafPath, SourceId>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: LeafPath, source: SourceId) {
        self.sources.insert(path, source);
    }

    pub fn get(&self, path: &str) -> Option<&SourceId> {
        self.sources.get(path)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
