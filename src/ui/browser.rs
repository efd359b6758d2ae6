use crate::app::App;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

const CHECKED: &str = "☑";
const UNCHECKED: &str = "☐";

pub fn draw_browser<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.browser;

    let title = if session.is_loading {
        " Files (loading...) ".to_string()
    } else if !session.filter.is_empty() {
        format!(
            " Files - filter \"{}\" ({} of {}) ",
            session.filter,
            session.visible_len(),
            session.entries.len()
        )
    } else {
        match session.total {
            Some(total) if total as usize > session.entries.len() => {
                format!(" Files ({} of {}) ", session.entries.len(), total)
            }
            _ => format!(" Files ({}) ", session.entries.len()),
        }
    };

    let header_box = if session.selection.all_checked() {
        CHECKED
    } else {
        UNCHECKED
    };
    let header = Row::new(vec![
        Cell::from(header_box),
        Cell::from("Name"),
        Cell::from("Type"),
        Cell::from("Size"),
        Cell::from("Modified"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = session
        .visible_entries()
        .map(|entry| {
            let checked = session.is_checked(entry);
            let (icon, kind, name_color) = if entry.is_dir() {
                ("📁 ", "Folder", Color::Blue)
            } else {
                ("📄 ", "File", Color::White)
            };
            let size = if entry.is_dir() {
                String::new()
            } else {
                format_file_size(entry.size)
            };

            Row::new(vec![
                Cell::from(Span::styled(
                    if checked { CHECKED } else { UNCHECKED },
                    Style::default().fg(if checked { Color::Green } else { Color::Gray }),
                )),
                Cell::from(Line::from(vec![
                    Span::raw(icon),
                    Span::styled(entry.name.clone(), Style::default().fg(name_color)),
                ])),
                Cell::from(kind),
                Cell::from(size),
                Cell::from(entry.modified_display()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(title),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if session.visible_len() > 0 {
        state.select(Some(session.cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

pub fn draw_details<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.details, app.browser.cursor_entry()) {
        (Some(details), Some(cursor)) if details.path == cursor.path => format!(
            " {}  {}  modified {}",
            details.path,
            format_file_size(details.size),
            details.modified_display()
        ),
        (_, Some(cursor)) => format!(" {}", cursor.path),
        (_, None) => String::new(),
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

pub fn draw_download_panel<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Download ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let dir = app
        .download_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set, press [o])".to_string());
    let selected = app.browser.selection.checked_count();

    let settings = Line::from(vec![
        Span::styled("To: ", Style::default().fg(Color::Gray)),
        Span::styled(dir, Style::default().fg(Color::White)),
        Span::styled("   Unzip: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if app.decompress { "[x]" } else { "[ ]" },
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("   Selected: {}", selected),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(settings), rows[0]);

    let (done, total) = app.download_progress.unwrap_or((0, 0));
    let ratio = if total == 0 {
        0.0
    } else {
        done as f64 / total as f64
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .label(if app.is_downloading() {
            format!("{}/{}", done, total)
        } else {
            String::new()
        })
        .ratio(ratio.clamp(0.0, 1.0));
    f.render_widget(gauge, rows[1]);
}

/// `0 B`, otherwise one decimal in the largest unit below 1024.
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if size == 0 {
        return "0 B".to_string();
    }

    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024u64.pow(5)), "3072.0 TB");
    }
}
