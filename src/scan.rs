//! Template reference scanning
//!
//! Templates are never executed or parsed. The scanner looks for the values
//! accessor written as a field access (`.Values` in `.Values.image.tag`)
//! anywhere in the text, including inside `if`/`range`/`with` blocks and
//! nested pipelines, and records the dotted identifier chain that follows it.
//! The accessor word on its own (`Values:` as a YAML key, prose in a comment)
//! is not a reference.
//!
//! ## Recognized forms
//!
//! ```text
//! {{ .Values.image.tag }}          -> "image.tag"
//! {{- range .Values.ingress.hosts }} -> "ingress.hosts"
//! {{ $.Values.global }}            -> "global"
//! {{ $root.Values.global }}        -> "global"
//! {{ toYaml .Values | nindent 2 }} -> ""   (root: the whole object escapes)
//! {{ index .Values "my-key" }}     -> ""   (root: dynamic lookup)
//! ```

use crate::error::{Error, Result};
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;

/// Accessor used by Helm templates
pub const DEFAULT_ACCESSOR: &str = "Values";

/// The root reference, recorded for a bare accessor
pub const ROOT_REFERENCE: &str = "";

/// Set of referenced paths, possibly including the root reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    paths: HashSet<String>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.paths.insert(path.into())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Whether the whole values object was referenced
    pub fn has_root(&self) -> bool {
        self.paths.contains(ROOT_REFERENCE)
    }

    /// Set union, reusing the larger allocation
    pub fn union(mut self, mut other: ReferenceSet) -> ReferenceSet {
        if self.paths.len() < other.paths.len() {
            std::mem::swap(&mut self, &mut other);
        }
        self.paths.extend(other.paths);
        self
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Extend<String> for ReferenceSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.paths.extend(iter);
    }
}

/// Extracts accessor references from raw template text
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    pattern: Regex,
}

impl ReferenceScanner {
    /// Build a scanner for `accessor`, which must be a plain identifier
    pub fn new(accessor: &str) -> Result<Self> {
        let is_identifier = !accessor.is_empty()
            && accessor
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return Err(Error::InvalidAccessor(accessor.to_string()));
        }

        let pattern = Regex::new(&format!(
            r"\.{}\b(?:\.([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*))?",
            regex::escape(accessor)
        ))
        .map_err(|_| Error::InvalidAccessor(accessor.to_string()))?;

        Ok(Self { pattern })
    }

    /// Every path referenced in `text`; a bare accessor yields the root reference
    pub fn scan(&self, text: &str) -> ReferenceSet {
        let mut references = ReferenceSet::new();
        for caps in self.pattern.captures_iter(text) {
            let path = caps.get(1).map_or(ROOT_REFERENCE, |m| m.as_str());
            if !references.contains(path) {
                references.insert(path);
            }
        }
        references
    }

    /// Scan many texts and union the results
    pub fn scan_all<S>(&self, texts: &[S], parallel: bool) -> ReferenceSet
    where
        S: AsRef<str> + Sync,
    {
        if parallel {
            texts
                .par_iter()
                .map(|text| self.scan(text.as_ref()))
                .reduce(ReferenceSet::new, ReferenceSet::union)
        } else {
            texts
                .iter()
                .map(|text| self.scan(text.as_ref()))
                .fold(ReferenceSet::new(), ReferenceSet::union)
        }
    }
}

impl Default for ReferenceScanner {
    fn default() -> Self {
        Self::new(DEFAULT_ACCESSOR).expect("default accessor is a valid identifier")
    }
}
