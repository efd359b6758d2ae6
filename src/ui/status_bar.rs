use crate::app::App;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

const MESSAGE_TTL_SECS: u64 = 5;

fn message_style(message: &str) -> Style {
    let lower = message.to_lowercase();
    if lower.contains("error") || lower.contains("failed") {
        Style::default().fg(Color::Red)
    } else if lower.contains("finished")
        || lower.contains("connected")
        || lower.contains("saved")
        || lower.contains("created")
        || lower.contains("loaded")
    {
        Style::default().fg(Color::Green)
    } else if lower.contains("connecting")
        || lower.contains("loading")
        || lower.contains("downloading")
    {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

pub fn draw_status_bar<B: Backend>(f: &mut Frame, app: &mut App, area: Rect) {
    let Some((message, timestamp)) = &app.status_message else {
        return;
    };

    // Progress messages stay while their work is running
    let keep = app.is_connecting
        || app.is_downloading()
        || timestamp.elapsed().as_secs() < MESSAGE_TTL_SECS;

    if keep {
        let paragraph = Paragraph::new(message.as_str())
            .style(message_style(message))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    } else {
        app.clear_status_message();
    }
}
