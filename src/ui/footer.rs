use crate::app::{App, InputMode, PromptKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw_footer<B: Backend>(f: &mut Frame, app: &App, area: Rect) {
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (nav_text, action_text) = match &app.input_mode {
        InputMode::Normal if app.is_connecting => {
            ("Connecting to Yandex Disk...", "[Ctrl+C] Quit")
        }
        InputMode::Normal if !app.is_connected() => (
            "[t] Token  [c] Connect",
            "[?] Help  [q] Quit",
        ),
        InputMode::Normal => (
            "↑/k ↓/j Move  [Enter] Open  [Bksp] Up  [Space] Check  [a] All",
            "[d] Download  [o] Dir  [z] Unzip  [/] Filter  [?] Help  [q] Quit",
        ),
        InputMode::Filter => ("↑ ↓ Move  Type to filter", "[Enter] Keep  [Esc] Clear"),
        InputMode::Prompt(PromptKind::ConfirmDelete { .. }) => ("", "[y] Confirm  [n] Cancel"),
        InputMode::Prompt(_) => ("Type a value", "[Enter] Accept  [Esc] Cancel"),
        InputMode::Help => ("↑/k ↓/j Scroll", "[Esc] Close"),
    };

    let nav_help = Paragraph::new(nav_text).style(Style::default().fg(if app.is_connecting {
        Color::Yellow
    } else {
        Color::Gray
    }));

    let action_help = Paragraph::new(action_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Right);

    f.render_widget(nav_help, footer[0]);
    f.render_widget(action_help, footer[1]);
}
