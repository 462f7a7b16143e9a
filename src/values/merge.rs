//! Deep merge of layered values documents
//!
//! Documents are applied strictly in the order given: the base values file
//! first, then every override file. Scalars are last-writer-wins; nested
//! mappings are unified recursively. Every path a document touches, leaf or
//! mapping, has its provenance overwritten with that document's id.

use super::{join_path, ConfigDocument, LeafPath, ProvenanceMap, SourceDocument, SourceId, ValueNode};
use tracing::debug;

/// Result of merging: the logical values document plus per-path provenance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedValues {
    pub document: ConfigDocument,
    pub provenance: ProvenanceMap,
}

impl MergedValues {
    /// Apply `documents`, in order, on top of this result
    pub fn layer(mut self, documents: &[SourceDocument]) -> Self {
        for source in documents {
            debug!("Merging values from {}", source.id);
            merge_into(
                &mut self.document,
                &source.document,
                &mut self.provenance,
                &source.id,
                "",
            );
        }
        self
    }

    /// Dotted leaf paths of the merged document
    pub fn leaves(&self) -> Vec<LeafPath> {
        super::flatten(&self.document)
    }
}

/// Merge an ordered sequence of documents, starting from an empty one
pub fn merge(documents: &[SourceDocument]) -> MergedValues {
    MergedValues::default().layer(documents)
}

fn merge_into(
    target: &mut ConfigDocument,
    updates: &ConfigDocument,
    provenance: &mut ProvenanceMap,
    source: &SourceId,
    prefix: &str,
) {
    for (key, node) in updates.iter() {
        let path = join_path(prefix, key);
        provenance.record(LeafPath::new(path.clone()), source.clone());

        match node {
            ValueNode::Mapping(nested) => {
                let slot = target.mapping_entry(key);
                merge_into(slot, nested, provenance, source, &path);
            }
            ValueNode::Leaf(value) => {
                target.insert(key, ValueNode::Leaf(value.clone()));
            }
        }
    }
}
