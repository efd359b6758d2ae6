mod browser;
mod footer;
mod help_popup;
mod prompt;
mod status_bar;

use crate::app::{App, InputMode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub use browser::format_file_size;

pub fn draw<B: Backend>(f: &mut Frame, app: &mut App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Account + path
                Constraint::Min(5),    // Listing
                Constraint::Length(1), // Details of the cursor row
                Constraint::Length(4), // Download controls
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(size);

    draw_header::<B>(f, app, chunks[0]);
    browser::draw_browser::<B>(f, app, chunks[1]);
    browser::draw_details::<B>(f, app, chunks[2]);
    browser::draw_download_panel::<B>(f, app, chunks[3]);
    status_bar::draw_status_bar::<B>(f, app, chunks[4]);
    footer::draw_footer::<B>(f, app, chunks[5]);

    match &app.input_mode {
        InputMode::Prompt(kind) => prompt::draw_prompt::<B>(f, app, kind),
        InputMode::Help => help_popup::render_help_popup::<B>(f, app),
        _ => {}
    }

    if app.is_connecting {
        draw_loading_overlay::<B>(f);
    }

    if let Some(dialog) = &app.error_dialog {
        prompt::draw_error_dialog::<B>(f, dialog);
    }
}

fn draw_header<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let account = match &app.user {
        Some(user) => Span::styled(
            format!(
                "● {}  {} / {} used",
                user.display_name(),
                format_file_size(user.used_space),
                format_file_size(user.total_space)
            ),
            Style::default().fg(Color::Green),
        ),
        None if app.is_connecting => {
            Span::styled("◌ Connecting...", Style::default().fg(Color::Cyan))
        }
        None => Span::styled("○ Not connected", Style::default().fg(Color::Red)),
    };

    let path = Span::styled(
        format!("  Path: {}", app.browser.current_path),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    );

    let header = Paragraph::new(Line::from(vec![account, path])).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" diskr - Yandex Disk browser ")
            .title_style(Style::default().add_modifier(Modifier::BOLD)),
    );
    f.render_widget(header, area);
}

fn draw_loading_overlay<B: Backend>(f: &mut Frame) {
    let area = centered_rect(50, 5, f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Yandex Disk")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new("Connecting...\n\nPlease wait...")
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// Rectangle of `percent_x` width and fixed `height`, centered in `r`.
pub(crate) fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height)) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
