use super::{join_path, ConfigDocument, LeafPath, ValueNode};

/// Flatten a document into its dotted leaf paths
///
/// Pre-order, depth-first, following the document's key order. Empty mappings
/// produce no paths; sequences and null are leaves.
pub fn flatten(document: &ConfigDocument) -> Vec<LeafPath> {
    let mut leaves = Vec::new();
    collect(document, "", &mut leaves);
    leaves
}

fn collect(document: &ConfigDocument, prefix: &str, leaves: &mut Vec<LeafPath>) {
    for (key, node) in document.iter() {
        let path = join_path(prefix, key);
        match node {
            ValueNode::Mapping(nested) => collect(nested, &path, leaves),
            ValueNode::Leaf(_) => leaves.push(LeafPath::new(path)),
        }
    }
}
