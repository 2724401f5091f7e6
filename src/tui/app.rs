use crate::config::{Config, clamp_outline_width};
use crate::parser::{self, Document, ExtractOptions};
use crate::render::{self, OutlineRow};
use crate::tracker::{AnchorLocator, ScrollBehavior, SectionTracker, Viewport};
use ratatui::widgets::ListState;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Outline,
    Content,
}

/// The document pane, measured in terminal rows.
///
/// Every heading line is an anchor; its offset is its distance in rows from
/// the top visible line.
#[derive(Debug, Default)]
pub struct ContentView {
    anchors: HashMap<String, usize>,
    /// Heading level by source line
    levels: HashMap<usize, usize>,
    total_lines: usize,
    pub height: usize,
    pub scroll: usize,
    /// Destination of a smooth scroll still in progress
    target: Option<usize>,
}

impl ContentView {
    pub fn new(document: &Document) -> Self {
        Self {
            anchors: document
                .headings
                .iter()
                .map(|h| (h.id.clone(), h.line))
                .collect(),
            levels: document.headings.iter().map(|h| (h.line, h.level)).collect(),
            total_lines: document.content.lines().count(),
            ..Self::default()
        }
    }

    /// Level of the extracted heading on `line`, if any.
    pub fn heading_level(&self, line: usize) -> Option<usize> {
        self.levels.get(&line).copied()
    }

    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.height.max(1))
    }

    /// Jump by `delta` rows, cancelling any smooth scroll. Returns true if moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        self.target = None;
        let next = self
            .scroll
            .saturating_add_signed(delta)
            .min(self.max_scroll());
        let moved = next != self.scroll;
        self.scroll = next;
        moved
    }

    /// Advance a smooth scroll by one frame. Returns true if moved.
    pub fn step(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let distance = target.abs_diff(self.scroll);
        let stride = (distance / 3).max(1);
        self.scroll = if target > self.scroll {
            self.scroll + stride.min(distance)
        } else {
            self.scroll - stride.min(distance)
        };
        if self.scroll == target {
            self.target = None;
        }
        distance > 0
    }

    /// Keep the scroll position valid after a resize or reload.
    pub fn clamp(&mut self) {
        self.scroll = self.scroll.min(self.max_scroll());
        self.target = self.target.map(|t| t.min(self.max_scroll()));
    }
}

impl AnchorLocator for ContentView {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.anchors
            .get(id)
            .map(|&line| line as f64 - self.scroll as f64)
    }
}

impl Viewport for ContentView {
    fn scroll_top(&self) -> f64 {
        self.scroll as f64
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = (top.max(0.0).round() as usize).min(self.max_scroll());
        match behavior {
            ScrollBehavior::Smooth => self.target = Some(top),
            ScrollBehavior::Instant => {
                self.scroll = top;
                self.target = None;
            }
        }
    }
}

pub struct App {
    pub tracker: SectionTracker,
    pub view: ContentView,
    pub filename: String,
    pub file_path: Option<PathBuf>,
    pub focus: Focus,
    pub outline_state: ListState,
    /// Outline row picked by the user; `None` follows the active heading
    selected_id: Option<String>,
    pub show_outline: bool,
    pub outline_width: u16, // Percentage: 20, 30, or 40
    pub status_message: Option<String>,
    config: Config,
}

impl App {
    pub fn new(document: Document, filename: String, file_path: Option<PathBuf>, config: Config) -> Self {
        let view = ContentView::new(&document);
        let tracker = SectionTracker::new(document, config.terminal_tracker_config());

        Self {
            tracker,
            view,
            filename,
            file_path,
            focus: Focus::Content,
            outline_state: ListState::default(),
            selected_id: None,
            show_outline: true,
            outline_width: clamp_outline_width(config.ui.outline_width),
            status_message: None,
            config,
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        self.config.extract_options()
    }

    pub fn content_lines(&self) -> std::str::Lines<'_> {
        self.tracker.document().content.lines()
    }

    pub fn mount(&mut self, now: Instant) {
        self.tracker.mount(now);
    }

    /// One animation frame: advance smooth scrolling, then let the tracker
    /// run its pending recompute.
    pub fn on_frame(&mut self, now: Instant) {
        if self.view.step() {
            self.tracker.on_scroll();
        }
        self.tracker.on_frame(now, &self.view);
    }

    pub fn rows(&self) -> Vec<OutlineRow<'_>> {
        render::visible_rows(&self.tracker)
    }

    /// Index of the highlighted outline row.
    pub fn selected_index(&self, rows: &[OutlineRow<'_>]) -> Option<usize> {
        let wanted = self
            .selected_id
            .as_deref()
            .unwrap_or(self.tracker.active_id());
        rows.iter()
            .position(|row| row.node.id == wanted)
            .or(if rows.is_empty() { None } else { Some(0) })
    }

    fn selected_row_id(&self) -> Option<String> {
        let rows = self.rows();
        self.selected_index(&rows)
            .map(|i| rows[i].node.id.clone())
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Content if !self.tracker.is_empty() && self.show_outline => Focus::Outline,
            _ => Focus::Content,
        };
        if self.focus == Focus::Content {
            self.selected_id = None;
        }
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::Outline => self.move_selection(1),
            Focus::Content => self.scroll_content(1),
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::Outline => self.move_selection(-1),
            Focus::Content => self.scroll_content(-1),
        }
    }

    pub fn page_down(&mut self) {
        self.scroll_content(self.view.height.max(1) as isize);
    }

    pub fn page_up(&mut self) {
        self.scroll_content(-(self.view.height.max(1) as isize));
    }

    pub fn first(&mut self) {
        self.scroll_content(isize::MIN / 2);
    }

    pub fn last(&mut self) {
        self.scroll_content(isize::MAX / 2);
    }

    fn scroll_content(&mut self, delta: isize) {
        if self.view.scroll_by(delta) {
            self.tracker.on_scroll();
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.rows();
        let Some(current) = self.selected_index(&rows) else {
            return;
        };
        let next = current
            .saturating_add_signed(delta)
            .min(rows.len().saturating_sub(1));
        self.selected_id = Some(rows[next].node.id.clone());
    }

    /// Jump the content to the selected outline entry.
    pub fn navigate_selected(&mut self) {
        let Some(id) = self.selected_row_id() else {
            return;
        };
        if !self.tracker.navigate(&id, &mut self.view) {
            self.status_message = Some(format!("✗ No anchor for #{}", id));
        }
    }

    /// Expand or collapse the selected outline entry.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_row_id() {
            self.tracker.toggle(&id);
            self.selected_id = Some(id);
        }
    }

    pub fn toggle_outline(&mut self) {
        self.show_outline = !self.show_outline;
        if !self.show_outline {
            self.focus = Focus::Content;
            self.selected_id = None;
        }
    }

    pub fn cycle_outline_width(&mut self) {
        self.outline_width = match self.outline_width {
            0..=20 => 30,
            21..=30 => 40,
            _ => 20,
        };
    }

    pub fn save_outline_width(&mut self) {
        self.status_message = Some(match self.config.set_outline_width(self.outline_width) {
            Ok(()) => format!("✓ Outline width {}% saved", self.outline_width),
            Err(e) => format!("✗ Could not save config: {}", e),
        });
    }

    /// Re-read the file from disk and rebuild the outline from scratch.
    pub fn reload(&mut self, now: Instant) -> Result<(), String> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        let document = parser::parse_file(&path, self.extract_options())
            .map_err(|e| format!("Failed to reload file: {}", e))?;
        self.load_document(document, now);
        Ok(())
    }

    pub fn load_document(&mut self, document: Document, now: Instant) {
        let scroll = self.view.scroll;
        let height = self.view.height;
        self.view = ContentView::new(&document);
        self.view.height = height;
        self.view.scroll = scroll;
        self.view.clamp();

        self.tracker.replace_document(document, now);
        self.selected_id = None;
        if self.tracker.is_empty() {
            self.focus = Focus::Content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_markdown;
    use std::time::Duration;

    fn doc() -> Document {
        let mut md = String::from("# Intro\n");
        md.push_str(&"text\n".repeat(20));
        md.push_str("## Setup\n");
        md.push_str(&"text\n".repeat(20));
        md.push_str("### Linux\n");
        md.push_str(&"text\n".repeat(40));
        md.push_str("# Intro\n");
        md.push_str(&"text\n".repeat(40));
        parse_markdown(&md)
    }

    fn app() -> App {
        let mut app = App::new(doc(), "post.md".to_string(), None, Config::default());
        app.view.height = 20;
        app
    }

    fn settle(app: &mut App, now: Instant) {
        for _ in 0..100 {
            app.on_frame(now);
        }
    }

    #[test]
    fn test_content_view_anchor_offsets() {
        let mut app = app();
        app.view.scroll = 10;
        assert_eq!(app.view.anchor_top("intro"), Some(-10.0));
        assert_eq!(app.view.anchor_top("setup"), Some(11.0));
        assert_eq!(app.view.anchor_top("missing"), None);
    }

    #[test]
    fn test_scrolling_updates_active_section_after_mount() {
        let start = Instant::now();
        let mut app = app();
        app.mount(start);

        let ready = start + Duration::from_secs(1);
        app.on_frame(ready);
        assert_eq!(app.tracker.active_id(), "intro");

        app.focus = Focus::Content;
        for _ in 0..40 {
            app.next();
        }
        app.on_frame(ready);
        // Linux is on line 42; scroll 40 puts it 2 rows down, inside the 3-row offset
        assert_eq!(app.tracker.active_id(), "linux");
        assert!(app.tracker.is_expanded("intro") && app.tracker.is_expanded("setup"));
    }

    #[test]
    fn test_navigate_smoothly_scrolls_to_duplicate() {
        let start = Instant::now();
        let mut app = app();
        app.mount(start);
        settle(&mut app, start + Duration::from_secs(1));

        app.focus = Focus::Outline;
        app.last_outline_row();
        app.navigate_selected();
        assert_eq!(app.tracker.active_id(), "intro-1");

        settle(&mut app, start + Duration::from_secs(2));
        // Second "Intro" is on line 83; it lands 3 rows below the top
        assert_eq!(app.view.scroll, 80);
        assert_eq!(app.tracker.active_id(), "intro-1");
    }

    #[test]
    fn test_toggle_selected_outline_row() {
        let mut app = app();
        app.focus = Focus::Outline;
        assert_eq!(app.rows().len(), 2);

        app.toggle_selected();
        assert!(app.tracker.is_expanded("intro"));
        assert_eq!(app.rows().len(), 3);
    }

    #[test]
    fn test_load_document_rebuilds_tracker() {
        let start = Instant::now();
        let mut app = app();
        app.mount(start);
        settle(&mut app, start + Duration::from_secs(1));
        assert_eq!(app.tracker.active_id(), "intro");

        app.load_document(parse_markdown("# Replaced\nbody"), start);
        assert_eq!(app.tracker.active_id(), "");
        assert_eq!(app.view.scroll, 0);
        assert_eq!(app.rows().len(), 1);
    }

    #[test]
    fn test_only_extracted_headings_are_styled() {
        let doc = parse_markdown("# Real\n```\n# comment\n```\n## Next");
        let view = ContentView::new(&doc);
        assert_eq!(view.heading_level(0), Some(1));
        assert_eq!(view.heading_level(2), None);
        assert_eq!(view.heading_level(4), Some(2));
    }

    #[test]
    fn test_outline_width_is_clamped() {
        let mut config = Config::default();
        config.ui.outline_width = 500;
        let app = App::new(doc(), "post.md".to_string(), None, config);
        assert_eq!(app.outline_width, 90);
    }

    #[test]
    fn test_empty_document_keeps_content_focus() {
        let mut app = App::new(parse_markdown("no headings"), "x.md".into(), None, Config::default());
        app.toggle_focus();
        assert_eq!(app.focus, Focus::Content);
        assert!(app.rows().is_empty());
    }

    impl App {
        fn last_outline_row(&mut self) {
            for _ in 0..10 {
                self.move_selection(1);
            }
        }
    }
}
