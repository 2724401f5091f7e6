//! Flattening the outline for display.
//!
//! Every helper here renders nothing for an empty outline: hosts should skip
//! the outline widget entirely rather than draw an empty frame.

use crate::parser::OutlineNode;
use crate::tracker::SectionTracker;

/// One visible line of a collapsible outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow<'a> {
    pub node: &'a OutlineNode,
    /// Nesting depth in the tree (roots are 0)
    pub depth: usize,
    pub has_children: bool,
    /// Children are shown below this row
    pub open: bool,
    pub active: bool,
    /// An ancestor of the active heading
    pub on_active_path: bool,
}

/// Rows currently visible given the tracker's expanded/active state.
pub fn visible_rows(tracker: &SectionTracker) -> Vec<OutlineRow<'_>> {
    let mut rows = Vec::new();
    let active = tracker.active_id();
    let mut stack: Vec<(&OutlineNode, usize)> =
        tracker.tree().iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        let open = tracker.is_branch_open(node);
        rows.push(OutlineRow {
            node,
            depth,
            has_children: !node.children.is_empty(),
            open,
            active: !active.is_empty() && node.id == active,
            on_active_path: !active.is_empty() && node.has_descendant(active),
        });

        if open {
            stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
    }

    rows
}

/// Box-drawing text tree of the whole outline, or `None` when empty.
pub fn text_tree(tree: &[OutlineNode]) -> Option<String> {
    if tree.is_empty() {
        return None;
    }

    let mut out = String::new();
    for (i, node) in tree.iter().enumerate() {
        out.push_str(&node.render_box_tree("", i == tree.len() - 1));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;
    use crate::tracker::TrackerConfig;

    fn tracker(md: &str) -> SectionTracker {
        SectionTracker::new(parse_markdown(md), TrackerConfig::default())
    }

    fn row_ids<'a>(rows: &[OutlineRow<'a>]) -> Vec<&'a str> {
        rows.iter().map(|row| row.node.id.as_str()).collect()
    }

    #[test]
    fn test_collapsed_outline_shows_roots_only() {
        let tracker = tracker("# A\n## B\n### C\n# D\n## E");
        let rows = visible_rows(&tracker);
        assert_eq!(row_ids(&rows), vec!["a", "d"]);
        assert!(rows.iter().all(|row| row.has_children && !row.open));
    }

    #[test]
    fn test_active_path_is_visible() {
        let mut tracker = tracker("# A\n## B\n### C\n## X\n# D\n## E");
        tracker.update_positions(&vec![("a", -50.0), ("b", -20.0), ("c", 10.0)]);

        let rows = visible_rows(&tracker);
        assert_eq!(row_ids(&rows), vec!["a", "b", "c", "x", "d"]);
        assert_eq!(rows[2].depth, 2);
        assert!(rows[2].active);
        assert!(rows[0].on_active_path && rows[1].on_active_path);
        assert!(!rows[3].on_active_path && !rows[3].active);
    }

    #[test]
    fn test_manual_toggle_opens_extra_branch() {
        let mut tracker = tracker("# A\n## B\n# D\n## E");
        tracker.toggle("d");

        let rows = visible_rows(&tracker);
        assert_eq!(row_ids(&rows), vec!["a", "d", "e"]);
        assert_eq!(rows[2].depth, 1);
    }

    #[test]
    fn test_empty_outline_renders_nothing() {
        let tracker = tracker("plain text");
        assert!(visible_rows(&tracker).is_empty());
        assert!(text_tree(tracker.tree()).is_none());
    }

    #[test]
    fn test_text_tree() {
        let tracker = tracker("# A\n## B\n# C");
        assert_eq!(
            text_tree(tracker.tree()).unwrap(),
            "├── # A\n│   └── ## B\n└── # C\n"
        );
    }
}
