//! # tocnav
//!
//! Table-of-contents extraction and active-section tracking for markdown
//! documents.
//!
//! The library turns markdown into a flat list of headings with stable,
//! collision-free anchor ids, nests them into an outline tree, and tracks
//! which section is currently in view as the host scrolls. It powers the
//! bundled terminal viewer but has no dependency on any particular UI: hosts
//! report anchor positions and perform scrolling through small traits.
//!
//! ## Example
//!
//! ```rust
//! use tocnav::{SectionTracker, TrackerConfig, parse_markdown};
//!
//! let doc = parse_markdown("# Guide\n## Setup\n### Linux\n## Setup");
//! let ids: Vec<_> = doc.headings.iter().map(|h| h.id.as_str()).collect();
//! assert_eq!(ids, ["guide", "setup", "linux", "setup-1"]);
//!
//! let mut tracker = SectionTracker::new(doc, TrackerConfig::default());
//!
//! // Offsets of each rendered anchor below the top of the viewport
//! let anchors = vec![("guide", -400.0), ("setup", -250.0), ("linux", 90.0), ("setup-1", 600.0)];
//! tracker.update_positions(&anchors);
//!
//! assert_eq!(tracker.active_id(), "linux");
//! assert!(tracker.is_expanded("guide") && tracker.is_expanded("setup"));
//! ```

/// Configuration module for persisting user preferences.
pub mod config;

pub mod error;

/// Logging setup for the binary.
pub mod logging;

/// Parser module for markdown documents.
///
/// Provides heading extraction, anchor id allocation and outline trees.
pub mod parser;

/// Outline flattening for display.
pub mod render;

/// Active-section tracking driven by scroll position.
pub mod tracker;

/// TUI module for the interactive terminal viewer.
pub mod tui;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use parser::{Document, Heading, OutlineNode, Slugger, parse_file, parse_markdown};
pub use tracker::{AnchorLocator, SectionTracker, TrackerConfig, Viewport};
