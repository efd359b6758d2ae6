use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::app::App;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Browsing",
        &[
            ("j, ↓", "Move down"),
            ("k, ↑", "Move up"),
            ("Enter, l", "Open folder / show file details"),
            ("Bksp, h, ←", "Parent folder"),
            ("g", "Go to path"),
            ("r", "Reload listing"),
            ("/", "Filter rows"),
            ("Esc", "Clear filter"),
            ("y", "Copy path to clipboard"),
        ],
    ),
    (
        "Selection and download",
        &[
            ("Space", "Check / uncheck row"),
            ("a", "Check / uncheck all"),
            ("d", "Download checked rows"),
            ("o", "Set download directory"),
            ("O", "Open download directory"),
            ("z", "Toggle zip extraction"),
        ],
    ),
    (
        "Remote changes",
        &[
            ("n", "New folder"),
            ("x, Del", "Move to trash"),
            ("X", "Delete permanently"),
        ],
    ),
    (
        "Account",
        &[
            ("t", "Enter OAuth token"),
            ("c", "Reconnect"),
            ("S", "Save token"),
            ("C", "Clear token and disconnect"),
        ],
    ),
    (
        "General",
        &[
            ("?, Esc", "Close help"),
            ("q", "Quit"),
            ("Ctrl+C", "Quit from anywhere"),
        ],
    ),
];

pub fn render_help_popup<B: Backend>(f: &mut Frame, app: &App) {
    let block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White));

    let area = popup_rect(70, 80, f.size());
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let text = help_text();
    let line_count = text.lines.len();

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .scroll((app.help_scroll_position, 0));
    f.render_widget(paragraph, inner_area);

    if line_count > inner_area.height as usize {
        let mut scrollbar_state =
            ScrollbarState::new(line_count).position(app.help_scroll_position as usize);

        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            inner_area,
            &mut scrollbar_state,
        );
    }
}

fn help_text<'a>() -> Text<'a> {
    let mut lines = Vec::new();
    for (i, (title, keys)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *title,
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )));
        for (key, action) in keys.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Green)),
                Span::raw(format!("- {}", action)),
            ]));
        }
    }
    Text::from(lines)
}

fn popup_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
