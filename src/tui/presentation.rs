use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use newsdesk::{
    app::{AppState, Mode},
    calendar::LoadStatus,
};
use crate::tui::{calendar_views, dialogs};

/// Draws one frame. `pending` is the journal's change count, `None` when the
/// journal could not be opened.
pub fn ui(f: &mut Frame, app: &AppState, pending: Option<usize>) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(main_chunks[1]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(content_chunks[1]);

    let title_text = format!("newsdesk - Content Calendar - {:?} Mode", app.mode);

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    calendar_views::month::render(f, app, content_chunks[0]);
    calendar_views::day_panel::render(f, app, side_chunks[0]);
    calendar_views::sidebar::render(f, app, side_chunks[1], pending);

    let (status_text, status_color) = status_line(app, pending);

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(if matches!(app.mode, Mode::Command) { Alignment::Left } else { Alignment::Center })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, main_chunks[2]);

    if app.show_help {
        dialogs::help::render(f, app);
    }

    if app.editor.is_some() {
        dialogs::event_form::render(f, app);
    }

    if app.delete_confirmation_event_id.is_some() {
        dialogs::delete_confirmation::render(f, app);
    }
}

fn status_line(app: &AppState, pending: Option<usize>) -> (String, ratatui::style::Color) {
    if matches!(app.mode, Mode::Command) {
        return (app.command_buffer.to_string(), app.theme.command_mode);
    }

    if let Some(message) = &app.message {
        let color = if message.is_error { app.theme.error } else { app.theme.success };
        return (message.text.clone(), color);
    }

    let load = match &app.load_status {
        LoadStatus::Idle => "Idle".to_string(),
        LoadStatus::Loading => "Loading...".to_string(),
        LoadStatus::Loaded(count) => format!("Loaded {}", count),
        LoadStatus::Failed(message) => format!("Error: {}", message),
    };
    let pending = pending.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());

    let filters = if app.filter.is_active() { format!(" | {}", app.filter.describe()) } else { String::new() };

    (
        format!(
            "Events: {} | {}{} | Pending: {} | Press 'q' to quit, '?' for help",
            app.store.len(),
            load,
            filters,
            pending
        ),
        app.theme.status_bar,
    )
}
