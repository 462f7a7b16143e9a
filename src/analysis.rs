//! Usage resolution
//!
//! A leaf `a.b.c` is used when the reference set contains `a.b.c`, any strict
//! ancestor (`a.b`, `a`), or the root reference. Templates that hand a whole
//! submap to `toYaml`, `range` or `with` touch every key below it, so an
//! ancestor reference must never leave its descendants reported as unused.
//!
//! ## Ignore patterns
//!
//! Keys can be retained explicitly (config `ignore:` or `--ignore`):
//! - `global` retains `global` and everything below it
//! - `extra*` retains every path starting with `extra` (`extraEnv`, `extraVolumes.x`)

use crate::scan::ReferenceSet;
use crate::values::LeafPath;

/// Decides which leaves are never referenced
#[derive(Debug, Clone, Default)]
pub struct UsageResolver {
    ignore: Vec<IgnorePattern>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IgnorePattern {
    /// Path and all of its descendants
    Subtree(String),
    /// Plain string prefix, written with a trailing `*`
    Prefix(String),
}

impl IgnorePattern {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.strip_suffix('*') {
            Some(prefix) => Some(IgnorePattern::Prefix(prefix.to_string())),
            None => Some(IgnorePattern::Subtree(raw.to_string())),
        }
    }

    fn matches(&self, leaf: &LeafPath) -> bool {
        match self {
            IgnorePattern::Prefix(prefix) => leaf.as_str().starts_with(prefix.as_str()),
            IgnorePattern::Subtree(path) => {
                leaf.as_str() == path || leaf.ancestors().any(|a| a == path)
            }
        }
    }
}

impl UsageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore
            .extend(patterns.into_iter().filter_map(|p| IgnorePattern::parse(p.as_ref())));
        self
    }

    /// Whether `leaf` is referenced directly or through an ancestor
    pub fn is_used(&self, leaf: &LeafPath, references: &ReferenceSet) -> bool {
        references.has_root()
            || references.contains(leaf.as_str())
            || leaf.ancestors().any(|ancestor| references.contains(ancestor))
    }

    fn is_ignored(&self, leaf: &LeafPath) -> bool {
        self.ignore.iter().any(|pattern| pattern.matches(leaf))
    }

    /// The unused subset of `leaves`, in input order
    pub fn resolve(&self, leaves: &[LeafPath], references: &ReferenceSet) -> Vec<LeafPath> {
        if references.has_root() {
            return Vec::new();
        }

        leaves
            .iter()
            .filter(|leaf| !self.is_used(leaf, references) && !self.is_ignored(leaf))
            .cloned()
            .collect()
    }
}
