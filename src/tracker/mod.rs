//! Active-section tracking for a rendered document.
//!
//! A [`SectionTracker`] owns the outline of one document version together
//! with the viewer state derived from scrolling: which heading is active and
//! which outline branches are expanded. Hosts feed it anchor positions
//! through [`AnchorLocator`] and perform scrolling through [`Viewport`], so
//! the tracking logic never touches a concrete UI.

mod listener;

pub use listener::{FrameRequest, ListenerPhase, ScrollListener};

use crate::parser::{self, Document, OutlineNode};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Resolves heading anchors to their position in the viewport.
pub trait AnchorLocator {
    /// Offset of the anchor's top edge below the viewport top (negative when
    /// scrolled past), or `None` when no such anchor is rendered.
    fn anchor_top(&self, id: &str) -> Option<f64>;
}

impl AnchorLocator for HashMap<String, f64> {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.get(id).copied()
    }
}

impl<S: AsRef<str>> AnchorLocator for [(S, f64)] {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.iter()
            .find(|(anchor, _)| anchor.as_ref() == id)
            .map(|(_, top)| *top)
    }
}

impl<S: AsRef<str>> AnchorLocator for Vec<(S, f64)> {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.as_slice().anchor_top(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A scrollable surface that renders the document's heading anchors.
pub trait Viewport: AnchorLocator {
    /// Current scroll position, in the same units as anchor offsets
    fn scroll_top(&self) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Distance below the viewport top that counts as "reached"; roughly the
    /// height of a fixed header
    pub scroll_offset: f64,
    /// Delay between mounting and the first position scan
    pub mount_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            scroll_offset: 120.0,
            mount_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TrackerState {
    /// Heading currently in view; empty until the first scan
    active_id: String,
    expanded_ids: HashSet<String>,
}

/// Outline plus scroll-driven state for one document view.
#[derive(Debug)]
pub struct SectionTracker {
    document: Document,
    tree: Vec<OutlineNode>,
    state: TrackerState,
    config: TrackerConfig,
    listener: ScrollListener,
}

impl SectionTracker {
    pub fn new(document: Document, config: TrackerConfig) -> Self {
        let tree = document.build_tree();
        Self {
            document,
            tree,
            state: TrackerState::default(),
            listener: ScrollListener::new(config.mount_delay),
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tree(&self) -> &[OutlineNode] {
        &self.tree
    }

    pub fn active_id(&self) -> &str {
        &self.state.active_id
    }

    pub fn expanded_ids(&self) -> &HashSet<String> {
        &self.state.expanded_ids
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.state.expanded_ids.contains(id)
    }

    /// True when there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.document.headings.is_empty()
    }

    /// Whether a node's children should be shown.
    ///
    /// A branch is open when it is expanded or when the active heading sits
    /// somewhere below it, so the active row stays visible after a manual
    /// collapse.
    pub fn is_branch_open(&self, node: &OutlineNode) -> bool {
        if node.children.is_empty() {
            return false;
        }
        self.is_expanded(&node.id)
            || (!self.state.active_id.is_empty() && node.has_descendant(&self.state.active_id))
    }

    pub fn listener(&self) -> &ScrollListener {
        &self.listener
    }

    /// Start the mount delay. The first scan runs on the first frame after it.
    pub fn mount(&mut self, now: Instant) {
        if self.is_empty() {
            return;
        }
        self.listener.mount(now);
    }

    /// Stop listening and drop any scheduled work.
    pub fn detach(&mut self) {
        self.listener.detach();
    }

    /// A scroll event happened; schedule a recompute for the next frame.
    pub fn on_scroll(&mut self) -> Option<FrameRequest> {
        self.listener.on_scroll()
    }

    /// Run one animation frame.
    ///
    /// Fires the mount timer when due, then performs at most one position
    /// update if a frame was requested. Returns true if the state changed.
    pub fn on_frame<A>(&mut self, now: Instant, anchors: &A) -> bool
    where
        A: AnchorLocator + ?Sized,
    {
        self.listener.poll_timer(now);
        if self.listener.take_pending().is_some() {
            self.update_positions(anchors)
        } else {
            false
        }
    }

    /// Run the frame behind `request` if it is still the live one.
    ///
    /// For hosts that schedule a callback per [`FrameRequest`] returned by
    /// [`on_scroll`](Self::on_scroll) instead of ticking [`on_frame`](Self::on_frame).
    /// A superseded request does nothing. Returns true if the state changed.
    pub fn run_frame<A>(&mut self, request: FrameRequest, anchors: &A) -> bool
    where
        A: AnchorLocator + ?Sized,
    {
        if self.listener.fire(request) {
            self.update_positions(anchors)
        } else {
            false
        }
    }

    /// Pick the active heading from the current anchor offsets.
    ///
    /// The active heading is the last one whose anchor has reached the
    /// scroll offset line; above the first heading, the first located one is
    /// used. Headings without an anchor are skipped. If no anchor can be
    /// located the state is left alone. Returns true if the state changed.
    pub fn update_positions<A>(&mut self, anchors: &A) -> bool
    where
        A: AnchorLocator + ?Sized,
    {
        let mut first_located: Option<&str> = None;
        let mut current: Option<&str> = None;

        for heading in &self.document.headings {
            let Some(top) = anchor_top(anchors, &heading.id) else {
                continue;
            };
            first_located.get_or_insert(heading.id.as_str());
            if top <= self.config.scroll_offset {
                current = Some(heading.id.as_str());
            }
        }

        let Some(id) = current.or(first_located).map(str::to_string) else {
            return false;
        };
        self.activate(&id)
    }

    /// Scroll so that `id` sits just below the header and make it active.
    ///
    /// Does not wait for the resulting scroll to settle. A heading without an
    /// anchor is a no-op. Returns true if the heading was found.
    pub fn navigate<V: Viewport + ?Sized>(&mut self, id: &str, viewport: &mut V) -> bool {
        let Some(top) = anchor_top(&*viewport, id) else {
            tracing::debug!(id, "navigate target has no anchor");
            return false;
        };

        let target = viewport.scroll_top() + top - self.config.scroll_offset;
        viewport.scroll_to(target, ScrollBehavior::Smooth);
        self.activate(id);
        true
    }

    /// Flip a single branch open or closed without touching anything else.
    pub fn toggle(&mut self, id: &str) {
        if !self.state.expanded_ids.remove(id) {
            self.state.expanded_ids.insert(id.to_string());
        }
    }

    /// Swap in a new document version.
    ///
    /// The outline and state are rebuilt from scratch and the old listener is
    /// torn down before a fresh one is mounted.
    pub fn replace_document(&mut self, document: Document, now: Instant) {
        self.listener.detach();
        *self = Self::new(document, self.config);
        self.mount(now);
        tracing::debug!(
            headings = self.document.headings.len(),
            "tracker rebuilt for new document"
        );
    }

    fn activate(&mut self, id: &str) -> bool {
        let expanded: HashSet<String> = parser::ancestor_ids(&self.tree, id).into_iter().collect();
        if self.state.active_id == id && self.state.expanded_ids == expanded {
            return false;
        }

        tracing::debug!(active = id, expanded = expanded.len(), "active section changed");
        self.state.active_id = id.to_string();
        self.state.expanded_ids = expanded;
        true
    }
}

fn anchor_top<A: AnchorLocator + ?Sized>(anchors: &A, id: &str) -> Option<f64> {
    anchors.anchor_top(id).filter(|top| top.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;

    const NESTED: &str = "# A\n## B\n### C\n## D\n# E";

    /// A page laid out with absolute anchor positions.
    struct FakePage {
        scroll: f64,
        anchors: Vec<(String, f64)>,
        scrolls: Vec<(f64, ScrollBehavior)>,
    }

    impl FakePage {
        fn new(anchors: &[(&str, f64)]) -> Self {
            Self {
                scroll: 0.0,
                anchors: anchors.iter().map(|(id, y)| (id.to_string(), *y)).collect(),
                scrolls: Vec::new(),
            }
        }
    }

    impl AnchorLocator for FakePage {
        fn anchor_top(&self, id: &str) -> Option<f64> {
            self.anchors.anchor_top(id).map(|y| y - self.scroll)
        }
    }

    impl Viewport for FakePage {
        fn scroll_top(&self) -> f64 {
            self.scroll
        }

        fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
            self.scroll = top;
            self.scrolls.push((top, behavior));
        }
    }

    fn tracker(md: &str) -> SectionTracker {
        SectionTracker::new(parse_markdown(md), TrackerConfig::default())
    }

    fn expanded(tracker: &SectionTracker) -> Vec<&str> {
        let mut ids: Vec<&str> = tracker.expanded_ids().iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_initial_state_is_empty() {
        let tracker = tracker(NESTED);
        assert_eq!(tracker.active_id(), "");
        assert!(tracker.expanded_ids().is_empty());
        assert_eq!(tracker.listener().phase(), ListenerPhase::Idle);
    }

    #[test]
    fn test_update_expands_exactly_the_ancestor_path() {
        let mut tracker = tracker(NESTED);
        let anchors = vec![("a", -300.0), ("b", -200.0), ("c", 50.0), ("d", 400.0), ("e", 900.0)];

        assert!(tracker.update_positions(&anchors));
        assert_eq!(tracker.active_id(), "c");
        assert_eq!(expanded(&tracker), vec!["a", "b"]);
    }

    #[test]
    fn test_heading_at_offset_line_counts_as_reached() {
        let mut tracker = tracker(NESTED);
        let anchors = vec![("a", 0.0), ("b", 120.0), ("c", 121.0)];

        tracker.update_positions(&anchors);
        assert_eq!(tracker.active_id(), "b");
        assert_eq!(expanded(&tracker), vec!["a"]);
    }

    #[test]
    fn test_above_first_heading_activates_first() {
        let mut tracker = tracker(NESTED);
        let anchors = vec![("a", 500.0), ("b", 800.0)];

        tracker.update_positions(&anchors);
        assert_eq!(tracker.active_id(), "a");
        assert!(tracker.expanded_ids().is_empty());
    }

    #[test]
    fn test_missing_anchors_are_skipped() {
        let mut tracker = tracker(NESTED);
        // "a" and "c" were not rendered
        let anchors = vec![("b", 700.0), ("d", 10.0), ("e", 900.0)];

        tracker.update_positions(&anchors);
        assert_eq!(tracker.active_id(), "d");

        let mut other = self::tracker(NESTED);
        other.update_positions(&vec![("c", 600.0)]);
        assert_eq!(other.active_id(), "c");
    }

    #[test]
    fn test_no_anchors_leaves_state_untouched() {
        let mut tracker = tracker(NESTED);
        tracker.update_positions(&vec![("c", 0.0)]);

        let empty: Vec<(&str, f64)> = Vec::new();
        assert!(!tracker.update_positions(&empty));
        assert_eq!(tracker.active_id(), "c");
    }

    #[test]
    fn test_toggle_is_independent_until_next_update() {
        let mut tracker = tracker(NESTED);
        let anchors = vec![("a", -300.0), ("b", -200.0), ("c", 50.0), ("d", 400.0)];
        tracker.update_positions(&anchors);

        tracker.toggle("d");
        assert_eq!(tracker.active_id(), "c");
        assert_eq!(expanded(&tracker), vec!["a", "b", "d"]);

        tracker.toggle("a");
        assert_eq!(expanded(&tracker), vec!["b", "d"]);

        tracker.toggle("d");
        assert_eq!(expanded(&tracker), vec!["b"]);

        tracker.update_positions(&anchors);
        assert_eq!(tracker.active_id(), "c");
        assert_eq!(expanded(&tracker), vec!["a", "b"]);
    }

    #[test]
    fn test_navigate_scrolls_and_activates_duplicate() {
        let mut tracker = tracker("# Intro\ntext\n# Intro\nmore");
        let mut page = FakePage::new(&[("intro", 0.0), ("intro-1", 500.0)]);

        assert!(tracker.navigate("intro-1", &mut page));
        assert_eq!(page.scrolls, vec![(380.0, ScrollBehavior::Smooth)]);
        assert_eq!(tracker.active_id(), "intro-1");

        // After the scroll lands, a position update agrees with the navigation
        assert!(!tracker.update_positions(&page));
        assert_eq!(tracker.active_id(), "intro-1");
    }

    #[test]
    fn test_navigate_collapses_other_branches() {
        let mut tracker = tracker(NESTED);
        let mut page = FakePage::new(&[("a", 0.0), ("b", 100.0), ("c", 200.0), ("d", 300.0)]);
        tracker.toggle("d");

        tracker.navigate("c", &mut page);
        assert_eq!(expanded(&tracker), vec!["a", "b"]);
    }

    #[test]
    fn test_navigate_to_missing_anchor_is_noop() {
        let mut tracker = tracker(NESTED);
        let mut page = FakePage::new(&[("a", 0.0)]);

        assert!(!tracker.navigate("c", &mut page));
        assert!(!tracker.navigate("nope", &mut page));
        assert!(page.scrolls.is_empty());
        assert_eq!(tracker.active_id(), "");
    }

    #[test]
    fn test_branch_open_follows_active_descendant() {
        let mut tracker = tracker(NESTED);
        tracker.update_positions(&vec![("a", -10.0), ("b", -5.0), ("c", 0.0)]);
        tracker.toggle("a");

        let a = &tracker.tree()[0];
        assert!(!tracker.is_expanded("a"));
        assert!(tracker.is_branch_open(a));

        let e = &tracker.tree()[1];
        assert!(!tracker.is_branch_open(e));
    }

    #[test]
    fn test_frames_run_after_mount_delay_only() {
        let start = Instant::now();
        let mut tracker = tracker(NESTED);
        let anchors = vec![("a", 0.0), ("b", 300.0)];

        tracker.mount(start);
        assert!(tracker.on_scroll().is_none());
        assert!(!tracker.on_frame(start + Duration::from_millis(50), &anchors));
        assert_eq!(tracker.active_id(), "");

        assert!(tracker.on_frame(start + Duration::from_millis(200), &anchors));
        assert_eq!(tracker.active_id(), "a");
    }

    #[test]
    fn test_many_scrolls_one_recompute_per_frame() {
        let start = Instant::now();
        let mut tracker = tracker(NESTED);
        tracker.mount(start);
        let later = start + Duration::from_secs(1);
        tracker.on_frame(later, &vec![("a", 0.0)]);

        for _ in 0..10 {
            tracker.on_scroll();
        }
        let anchors = vec![("a", -400.0), ("b", -100.0), ("c", 300.0)];
        assert!(tracker.on_frame(later, &anchors));
        assert_eq!(tracker.active_id(), "b");

        // Nothing pending: a new frame does not rescan
        let moved = vec![("a", -900.0), ("b", -600.0), ("c", -200.0)];
        assert!(!tracker.on_frame(later, &moved));
        assert_eq!(tracker.active_id(), "b");
    }

    #[test]
    fn test_only_the_latest_frame_request_runs() {
        let start = Instant::now();
        let mut tracker = tracker(NESTED);
        tracker.mount(start);
        tracker.on_frame(start + Duration::from_secs(1), &vec![("a", 0.0)]);
        assert_eq!(tracker.active_id(), "a");

        let anchors = vec![("a", -400.0), ("b", -100.0), ("c", 50.0)];
        let stale = tracker.on_scroll().unwrap();
        let live = tracker.on_scroll().unwrap();

        assert!(!tracker.run_frame(stale, &anchors));
        assert_eq!(tracker.active_id(), "a");

        assert!(tracker.run_frame(live, &anchors));
        assert_eq!(tracker.active_id(), "c");
        assert_eq!(expanded(&tracker), vec!["a", "b"]);

        // Already consumed
        assert!(!tracker.run_frame(live, &vec![("a", 0.0)]));
        assert_eq!(tracker.active_id(), "c");
    }

    #[test]
    fn test_detach_stops_updates() {
        let start = Instant::now();
        let mut tracker = tracker(NESTED);
        tracker.mount(start);
        tracker.detach();

        assert!(!tracker.on_frame(start + Duration::from_secs(1), &vec![("a", 0.0)]));
        assert_eq!(tracker.active_id(), "");
        assert!(tracker.on_scroll().is_none());
    }

    #[test]
    fn test_empty_document_never_mounts() {
        let mut tracker = tracker("no headings at all");
        assert!(tracker.is_empty());
        assert!(tracker.tree().is_empty());

        tracker.mount(Instant::now());
        assert_eq!(tracker.listener().phase(), ListenerPhase::Idle);
    }

    #[test]
    fn test_replace_document_resets_everything() {
        let start = Instant::now();
        let mut tracker = tracker(NESTED);
        tracker.mount(start);
        tracker.on_frame(start + Duration::from_secs(1), &vec![("c", 0.0)]);
        assert_eq!(tracker.active_id(), "c");

        tracker.replace_document(parse_markdown("# Fresh\n## Start"), start);
        assert_eq!(tracker.active_id(), "");
        assert!(tracker.expanded_ids().is_empty());
        assert_eq!(tracker.tree().len(), 1);
        assert!(matches!(
            tracker.listener().phase(),
            ListenerPhase::Mounting { .. }
        ));
    }

    #[test]
    fn test_custom_offset() {
        let config = TrackerConfig {
            scroll_offset: 0.0,
            ..TrackerConfig::default()
        };
        let mut tracker = SectionTracker::new(parse_markdown(NESTED), config);
        tracker.update_positions(&vec![("a", -1.0), ("b", 60.0)]);
        assert_eq!(tracker.active_id(), "a");
    }
}
