//! # tocnav
//!
//! Markdown table of contents with active-section tracking.
//!
//! ## Usage
//!
//! Launch the interactive viewer:
//! ```sh
//! tocnav README.md
//! ```
//!
//! List all headings with their anchor ids:
//! ```sh
//! tocnav -l README.md
//! ```
//!
//! Show heading tree:
//! ```sh
//! tocnav --tree README.md
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, OutputFormat};
use color_eyre::Result;
use std::io::{IsTerminal, Read};
use std::path::Path;
use std::process;
use tocnav::tui::{self, App};
use tocnav::{Config, Document, SectionTracker, logging, parser};

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    let logging = logging::init();
    if let Some(ref guard) = logging {
        tracing::debug!(log_dir = %guard.log_dir().display(), "logging to file");
    }

    let config = match args.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if args.is_cli_mode() {
        let (content, source) = read_input(&args)?;
        let doc = parser::parse_markdown_with(&content, config.extract_options());
        tracing::info!(headings = doc.headings.len(), "parsed input");
        return handle_cli_mode(&args, &doc, source, &config);
    }

    let path = match args.file {
        Some(ref path) if !args.reads_stdin() => path,
        Some(_) => {
            eprintln!("Error: the interactive viewer needs a file, not stdin");
            eprintln!("Use -l or --tree to read markdown from stdin.");
            process::exit(1);
        }
        None => {
            eprintln!("Error: no input file");
            eprintln!("Usage: tocnav <FILE>  (see --help)");
            process::exit(1);
        }
    };

    let canonical = path.canonicalize()?;
    let doc = parser::parse_file(&canonical, config.extract_options())?;
    let filename = display_name(&canonical);
    tracing::info!(file = %canonical.display(), headings = doc.headings.len(), "opening viewer");

    let app = App::new(doc, filename, Some(canonical), config);
    let mut terminal = ratatui::init();
    let result = tui::run(&mut terminal, app);
    ratatui::restore();

    result
}

/// Read the document for CLI modes. Returns the content and a source label
/// for JSON metadata.
fn read_input(args: &Cli) -> Result<(String, Option<String>)> {
    match args.file {
        Some(ref path) if !args.reads_stdin() => {
            let content = std::fs::read_to_string(path)?;
            Ok((content, Some(path.display().to_string())))
        }
        Some(_) => Ok((read_stdin()?, None)),
        None if !std::io::stdin().is_terminal() => Ok((read_stdin()?, None)),
        None => {
            eprintln!("Error: no input file");
            eprintln!("Pass a file, '-' for stdin, or pipe markdown in.");
            process::exit(1);
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    std::io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn handle_cli_mode(
    args: &Cli,
    doc: &Document,
    source: Option<String>,
    config: &Config,
) -> Result<()> {
    if let Some(line) = args.active_at {
        print_active_at(doc, line, args.output, config)
    } else if args.tree {
        print_tree(doc, args.output, source)
    } else {
        let headings = doc.filter_headings(args.level.map(usize::from), args.filter.as_deref());
        print_headings(&headings, args.output)
    }
}

fn print_headings(headings: &[&parser::Heading], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for heading in headings {
                let prefix = "#".repeat(heading.level);
                println!("{} {}  #{}", prefix, heading.text, heading.id);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(headings)?);
        }
    }
    Ok(())
}

fn print_tree(doc: &Document, format: OutputFormat, source: Option<String>) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            // Nothing at all for a heading-less document
            if let Some(tree) = tocnav::render::text_tree(&doc.build_tree()) {
                print!("{}", tree);
            }
        }
        OutputFormat::Json => {
            let output = parser::output::build_json_output(doc, source);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Run one position update with the viewport top at `line` (1-based).
fn print_active_at(doc: &Document, line: usize, format: OutputFormat, config: &Config) -> Result<()> {
    let top = line.saturating_sub(1) as f64;
    let anchors: Vec<(&str, f64)> = doc
        .headings
        .iter()
        .map(|h| (h.id.as_str(), h.line as f64 - top))
        .collect();

    let mut tracker = SectionTracker::new(doc.clone(), config.terminal_tracker_config());
    tracker.update_positions(&anchors);

    let active = tracker.active_id();
    let path = parser::ancestor_ids(tracker.tree(), active);

    match format {
        OutputFormat::Plain => {
            if active.is_empty() {
                println!("No headings");
                return Ok(());
            }
            println!("active: #{}", active);
            if !path.is_empty() {
                let path: Vec<_> = path.iter().map(|id| format!("#{}", id)).collect();
                println!("expanded: {}", path.join(" > "));
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "line": line,
                "activeId": active,
                "expandedIds": path,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
