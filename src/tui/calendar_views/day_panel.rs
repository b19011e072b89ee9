use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use newsdesk::{app::AppState, ui::theme::Theme};

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let events = app.events_for_selected_date();

    let title = format!("Schedule for {}", app.selected_date.format("%A, %B %d, %Y"));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    if events.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Nothing scheduled", Style::default().fg(Color::DarkGray)),
        ]));
    } else {
        let selected_base = Style::default().bg(app.theme.selected_bg).add_modifier(Modifier::BOLD);

        for (idx, event) in events.iter().enumerate() {
            let time_str = event.time_label(&app.time_format);
            let is_selected = idx == app.selected_event_index;

            let (time_style, title_style) = if is_selected {
                (selected_base.fg(app.theme.selected_fg), selected_base.fg(app.theme.selected_fg))
            } else {
                (
                    Style::default().fg(app.theme.success),
                    Style::default().fg(Theme::content_type_color(event.content_type)),
                )
            };

            let cursor = if is_selected { ">" } else { " " };

            lines.push(Line::from(vec![
                Span::styled(cursor, Style::default().fg(app.theme.selected_bg)),
                Span::styled(time_str, time_style),
                Span::raw(" "),
                Span::styled(event.priority.icon(), Style::default().fg(Theme::priority_color(event.priority))),
                Span::raw(" "),
                Span::styled(event.title.clone(), title_style),
            ]));

            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(event.content_type.label(), Style::default().fg(Theme::content_type_color(event.content_type))),
                Span::raw(" · "),
                Span::styled(event.status.label(), Style::default().fg(Theme::status_color(event.status))),
                Span::styled(format!(" · {} · {}", event.author, event.category), Style::default().fg(Color::DarkGray)),
            ]));

            if is_selected && let Some(description) = &event.description {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(description.clone(), Style::default().fg(Color::Gray)),
                ]));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("j/k", Style::default().fg(app.theme.help_section)),
            Span::raw(" = Select | "),
            Span::styled("E", Style::default().fg(app.theme.success)),
            Span::raw(" = Edit | "),
            Span::styled("x", Style::default().fg(app.theme.error)),
            Span::raw(" = Delete"),
        ]));
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}
