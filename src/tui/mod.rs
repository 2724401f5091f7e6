//! Interactive terminal viewer.
//!
//! Shows the document next to its outline. Scrolling the document moves the
//! active section; Enter on an outline entry scrolls to it and Space folds
//! it. The open file is reloaded when it changes on disk.

mod app;
mod ui;
mod watcher;

pub use app::{App, ContentView, Focus};
pub use watcher::FileWatcher;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Roughly one frame at 60 Hz
const FRAME: Duration = Duration::from_millis(16);

/// Run the TUI application until the user quits.
pub fn run(terminal: &mut DefaultTerminal, app: App) -> Result<()> {
    let mut app = app;
    app.mount(Instant::now());

    let mut file_watcher = match app.file_path.as_deref().map(FileWatcher::new) {
        Some(Ok(watcher)) => Some(watcher),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "live reload disabled");
            None
        }
        None => None,
    };

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;
        app.on_frame(Instant::now());

        if !event::poll(FRAME)? {
            if let Some(ref mut watcher) = file_watcher {
                if watcher.check_for_changes() {
                    app.status_message = Some(match app.reload(Instant::now()) {
                        Ok(()) => "↻ File reloaded (external change)".to_string(),
                        Err(e) => format!("✗ Reload failed: {}", e),
                    });
                }
            }
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        app.status_message = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Tab => app.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => app.next(),
            KeyCode::Char('k') | KeyCode::Up => app.previous(),
            KeyCode::Char('d') | KeyCode::PageDown => app.page_down(),
            KeyCode::Char('u') | KeyCode::PageUp => app.page_up(),
            KeyCode::Char('g') | KeyCode::Home => app.first(),
            KeyCode::Char('G') | KeyCode::End => app.last(),
            KeyCode::Enter => app.navigate_selected(),
            KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('o') => app.toggle_outline(),
            KeyCode::Char('w') => app.cycle_outline_width(),
            KeyCode::Char('W') => app.save_outline_width(),
            _ => {}
        }
    }

    tracing::info!("viewer closed");
    Ok(())
}
