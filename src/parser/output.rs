//! JSON output types for the extracted outline.

use super::{Document, OutlineNode};
use serde::{Deserialize, Serialize};

/// Root of the JSON outline output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineOutput {
    pub outline: OutlineRoot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineRoot {
    pub metadata: OutlineMetadata,
    pub headings: Vec<OutlineNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineMetadata {
    pub source: Option<String>,
    #[serde(rename = "headingCount")]
    pub heading_count: usize,
    /// Deepest nesting in the tree (roots are depth 1, 0 when empty)
    #[serde(rename = "maxDepth")]
    pub max_depth: usize,
}

/// Build the nested JSON output for a document.
pub fn build_json_output(doc: &Document, source: Option<String>) -> OutlineOutput {
    let headings = doc.build_tree();
    OutlineOutput {
        outline: OutlineRoot {
            metadata: OutlineMetadata {
                source,
                heading_count: doc.headings.len(),
                max_depth: max_depth(&headings),
            },
            headings,
        },
    }
}

fn max_depth(nodes: &[OutlineNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + max_depth(&node.children))
        .max()
        .unwrap_or(0)
}
