use crate::app::{App, ErrorDialog, PromptKind};
use crate::ui::centered_rect;
use ratatui::{
    backend::Backend,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn prompt_title(kind: &PromptKind) -> &'static str {
    match kind {
        PromptKind::Token => " OAuth token ",
        PromptKind::GoToPath => " Go to path ",
        PromptKind::DownloadDir => " Download directory ",
        PromptKind::NewFolder => " New folder ",
        PromptKind::ConfirmDelete { permanently: true, .. } => " Delete permanently ",
        PromptKind::ConfirmDelete { .. } => " Move to trash ",
    }
}

pub fn draw_prompt<B: Backend>(f: &mut Frame, app: &App, kind: &PromptKind) {
    let area = centered_rect(60, 3, f.size());

    let (text, color) = match kind {
        PromptKind::ConfirmDelete { path, .. } => {
            (format!("{} ? [y/n]", path), Color::Red)
        }
        // Never echo the token itself
        PromptKind::Token => ("*".repeat(app.input.chars().count()), Color::Yellow),
        _ => (app.input.clone(), Color::Yellow),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(prompt_title(kind))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(Line::from(vec![
        Span::raw(text),
        Span::styled("█", Style::default().fg(Color::Gray)),
    ]))
    .block(block);

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

pub fn draw_error_dialog<B: Backend>(f: &mut Frame, dialog: &ErrorDialog) {
    let height = (dialog.message.lines().count() as u16).saturating_add(4);
    let area = centered_rect(70, height, f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", dialog.title))
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::Red));

    let mut lines: Vec<Line> = dialog.message.lines().map(Line::from).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter/Esc] Close",
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
