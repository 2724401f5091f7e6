use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tocnav")]
#[command(version)]
#[command(about = "Markdown outline extractor with active-section tracking")]
#[command(
    long_about = "tocnav - Extract a navigable table of contents from markdown.\n\n\
    Launch without flags for the interactive viewer: the outline follows the section\n\
    you are reading, and selecting an entry scrolls the document to it. Use flags for\n\
    CLI mode to list headings with their anchor ids or print the outline tree.\n\n\
    Examples:\n  \
    tocnav README.md                 # Interactive viewer\n  \
    tocnav -l README.md              # List headings with anchor ids\n  \
    tocnav --tree README.md          # Show heading tree\n  \
    tocnav --tree -o json README.md  # Nested outline as JSON\n  \
    tocnav --active-at 120 doc.md    # Section in view at line 120"
)]
pub struct Cli {
    /// Markdown file to read, or '-' for stdin
    ///
    /// The interactive viewer needs a real file so it can reload on change;
    /// stdin is accepted by the CLI modes only.
    ///
    /// Examples:
    ///   tocnav README.md         # Open file
    ///   cat doc.md | tocnav -l - # Pipe markdown
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// List all headings with their anchor ids (non-interactive)
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Show heading tree structure with box-drawing characters (non-interactive)
    #[arg(long = "tree", conflicts_with = "list")]
    pub tree: bool,

    /// Filter listed headings by text pattern (case-insensitive)
    ///
    /// Example: --filter "install" matches "Installation" and "Installing"
    #[arg(long = "filter", value_name = "PATTERN", requires = "list")]
    pub filter: Option<String>,

    /// List only headings at a specific level (1-6)
    #[arg(
        short = 'L',
        long = "level",
        value_name = "LEVEL",
        requires = "list",
        value_parser = clap::value_parser!(u8).range(1..=6)
    )]
    pub level: Option<u8>,

    /// Output format for --list, --tree and --active-at
    ///
    ///   plain - Human-readable text (default)
    ///   json  - JSON for scripting
    #[arg(short = 'o', long = "output", default_value = "plain")]
    pub output: OutputFormat,

    /// Report the active section when the viewport top is at LINE (1-based)
    ///
    /// Uses the same rule as the interactive viewer: the last heading within
    /// the scroll offset of the viewport top wins, and its ancestors are the
    /// expanded path.
    #[arg(long = "active-at", value_name = "LINE", value_parser = clap::value_parser!(usize))]
    pub active_at: Option<usize>,

    /// Load configuration from PATH instead of the default location
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// True when any non-interactive mode was requested.
    pub fn is_cli_mode(&self) -> bool {
        self.list || self.tree || self.active_at.is_some()
    }

    /// True when the input should come from stdin.
    pub fn reads_stdin(&self) -> bool {
        self.file.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// JSON output
    Json,
}
