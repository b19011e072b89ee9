use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use newsdesk::app::AppState;

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(event_id) = &app.delete_confirmation_event_id else {
        return;
    };

    let event = app.store.get(event_id);
    let event_title = event.map(|e| e.title.clone()).unwrap_or_else(|| "this item".to_string());
    let when = event
        .map(|e| e.scheduled_for.format("%a %b %d, %H:%M").to_string())
        .unwrap_or_default();

    let area = f.size();
    let dialog_width = 60.min(area.width);
    let dialog_height = 10.min(area.height);
    let x = (area.width.saturating_sub(dialog_width)) / 2;
    let y = (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = ratatui::layout::Rect {
        x,
        y,
        width: dialog_width,
        height: dialog_height,
    };

    f.render_widget(Clear, dialog_area);

    let dialog_text = vec![
        Line::from(vec![Span::styled("Remove from Calendar?", Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Remove "),
            Span::styled(event_title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Line::from(when),
        Line::from("The change is kept locally until the next reload."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Y", Style::default().fg(app.theme.success)),
            Span::raw(" = Yes, remove | "),
            Span::styled("N", Style::default().fg(app.theme.error)),
            Span::raw(" = No, keep"),
        ]),
    ];

    let dialog_paragraph = Paragraph::new(dialog_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(" Confirm Delete ")
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Center);

    f.render_widget(dialog_paragraph, dialog_area);
}
