mod util;

use crate::tui::app::{App, Focus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use util::truncate_to_width;

const ACCENT: Color = Color::Cyan;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let [title_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_title_bar(frame, app, title_area);

    // An empty outline gets no pane at all
    if app.show_outline && !app.tracker.is_empty() {
        let [outline_area, content_area] = Layout::horizontal([
            Constraint::Percentage(app.outline_width),
            Constraint::Percentage(100u16.saturating_sub(app.outline_width)),
        ])
        .areas(main_area);
        render_outline(frame, app, outline_area);
        render_content(frame, app, content_area);
    } else {
        render_content(frame, app, main_area);
    }

    render_status_bar(frame, app, status_area);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" tocnav ", Style::default().fg(Color::Black).bg(ACCENT)),
        Span::raw(" "),
        Span::styled(app.filename.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_outline(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = app.rows();
    let selected = app.selected_index(&rows);
    // Two columns of border plus the highlight symbol
    let label_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let indicator = match (row.has_children, row.open) {
                (true, true) => "▼ ",
                (true, false) => "▶ ",
                (false, _) => "  ",
            };
            let label = format!(
                "{}{}{} {}",
                indent,
                indicator,
                "#".repeat(row.node.level),
                row.node.text
            );

            let style = if row.active {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else if row.on_active_path {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::from(Span::styled(
                truncate_to_width(&label, label_width),
                style,
            )))
        })
        .collect();

    let row_count = items.len();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus == Focus::Outline))
                .title(" Outline "),
        )
        .highlight_style(if app.focus == Focus::Outline {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        })
        .highlight_symbol("► ");

    app.outline_state.select(selected);
    frame.render_stateful_widget(list, area, &mut app.outline_state);

    let mut scroll_state = ScrollbarState::new(row_count).position(selected.unwrap_or(0));
    render_scrollbar(frame, area, &mut scroll_state);
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    if app.view.height != inner_height {
        app.view.height = inner_height;
        app.view.clamp();
        // Anchors moved relative to the viewport
        app.tracker.on_scroll();
    }

    let lines: Vec<Line> = app
        .content_lines()
        .enumerate()
        .skip(app.view.scroll)
        .take(inner_height)
        .map(|(line_no, line)| match app.view.heading_level(line_no) {
            Some(level) => Line::from(Span::styled(
                line.to_string(),
                Style::default()
                    .fg(heading_color(level))
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(line.to_string()),
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.focus == Focus::Content)),
    );
    frame.render_widget(paragraph, area);

    let mut scroll_state =
        ScrollbarState::new(app.view.max_scroll().max(1)).position(app.view.scroll);
    render_scrollbar(frame, area, &mut scroll_state);
}

fn render_scrollbar(frame: &mut Frame, area: Rect, state: &mut ScrollbarState) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(Color::DarkGray));

    frame.render_stateful_widget(
        scrollbar,
        area.inner(ratatui::layout::Margin {
            vertical: 1,
            horizontal: 0,
        }),
        state,
    );
}

fn heading_color(level: usize) -> Color {
    match level {
        1 => Color::LightCyan,
        2 => Color::LightBlue,
        3 => Color::LightMagenta,
        _ => Color::Gray,
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref msg) = app.status_message {
        let status = Paragraph::new(msg.clone()).style(
            Style::default()
                .bg(Color::Rgb(0, 80, 120))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status, area);
        return;
    }

    let section = match app.tracker.active_id() {
        "" => String::from("no section"),
        id => format!("#{}", id),
    };
    let text = format!(
        " {} • line {} • Tab:Focus • Enter:Go • Space:Fold • o:Outline • w:Width • q:Quit ",
        section,
        app.view.scroll + 1
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        area,
    );
}
