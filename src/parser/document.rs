use serde::{Deserialize, Serialize};

/// A single heading extracted from a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Anchor identifier, unique within one parse pass
    pub id: String,
    /// Display text with inline markup stripped
    pub text: String,
    /// Heading level (1-6)
    pub level: usize,
    /// Zero-based source line
    pub line: usize,
}

/// A heading together with the headings nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub id: String,
    pub text: String,
    pub level: usize,
    pub line: usize,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(heading: &Heading) -> Self {
        Self {
            id: heading.id.clone(),
            text: heading.text.clone(),
            level: heading.level,
            line: heading.line,
            children: Vec::new(),
        }
    }

    /// True if `id` names any node strictly below this one.
    pub fn has_descendant(&self, id: &str) -> bool {
        let mut stack: Vec<&OutlineNode> = self.children.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return true;
            }
            stack.extend(node.children.iter());
        }
        false
    }

    /// Render this node and its subtree with box-drawing characters.
    pub fn render_box_tree(&self, prefix: &str, is_last: bool) -> String {
        let mut out = String::new();
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(&format!(
            "{}{}{} {}\n",
            prefix,
            connector,
            "#".repeat(self.level),
            self.text
        ));

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        for (i, child) in self.children.iter().enumerate() {
            let last = i == self.children.len() - 1;
            out.push_str(&child.render_box_tree(&child_prefix, last));
        }
        out
    }
}

/// A parsed markdown document: the source text and its flat heading list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    pub headings: Vec<Heading>,
}

impl Document {
    pub fn new(content: String, headings: Vec<Heading>) -> Self {
        Self { content, headings }
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    /// Build the nested outline from the flat heading list.
    pub fn build_tree(&self) -> Vec<OutlineNode> {
        build_tree(&self.headings)
    }

    /// Headings at `level` whose text contains `query` (case-insensitive).
    /// A `None` criterion matches everything.
    pub fn filter_headings(&self, level: Option<usize>, query: Option<&str>) -> Vec<&Heading> {
        let query = query.map(str::to_lowercase);
        self.headings
            .iter()
            .filter(|h| level.is_none_or(|level| h.level == level))
            .filter(|h| {
                query
                    .as_deref()
                    .is_none_or(|query| h.text.to_lowercase().contains(query))
            })
            .collect()
    }
}

/// Nest a flat, document-ordered heading list into a forest.
///
/// Open headings live on a stack. Each incoming heading closes every open
/// heading at the same or a deeper level; the closed node is attached to the
/// heading below it on the stack, or becomes a root when nothing is left.
/// Skipped levels nest directly under the nearest shallower heading.
pub fn build_tree(headings: &[Heading]) -> Vec<OutlineNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        while stack.last().is_some_and(|open| open.level >= heading.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::leaf(heading));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Ids of every node containing `target`, outermost first.
///
/// Returns an empty list for roots and for ids that are not in the forest.
pub fn ancestor_ids(tree: &[OutlineNode], target: &str) -> Vec<String> {
    // (node, depth) pairs; `path` holds the ids of the current node's ancestors
    let mut stack: Vec<(&OutlineNode, usize)> = tree.iter().rev().map(|n| (n, 0)).collect();
    let mut path: Vec<&str> = Vec::new();

    while let Some((node, depth)) = stack.pop() {
        path.truncate(depth);
        if node.id == target {
            return path.iter().map(|id| id.to_string()).collect();
        }
        path.push(&node.id);
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    Vec::new()
}
