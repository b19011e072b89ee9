use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use chrono::Local;
use newsdesk::{
    app::AppState,
    calendar::{ContentType, EventStatus, Priority},
    ui::theme::Theme,
};

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect, pending: Option<usize>) {
    let now = Local::now().naive_local();
    let counts = app.store.status_counts();
    let section = Style::default().fg(app.theme.help_section).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Overview", section))];

    for (status, count) in [
        (EventStatus::Scheduled, counts.scheduled),
        (EventStatus::InProgress, counts.in_progress),
        (EventStatus::Review, counts.review),
        (EventStatus::Published, counts.published),
        (EventStatus::Draft, counts.draft),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", status.label()), Style::default().fg(Theme::status_color(status))),
            Span::raw(count.to_string()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::raw("  Published today: "),
        Span::styled(app.store.published_on(now.date()).to_string(), Style::default().fg(app.theme.success)),
    ]));

    if app.show_pending {
        let text = pending
            .map(|n| format!("  Unsynced changes: {}", n))
            .unwrap_or_else(|| "  Unsynced changes: journal unavailable".to_string());
        lines.push(Line::from(Span::styled(text, Style::default().fg(app.theme.drag_target))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Upcoming", section)));
    let upcoming = app.store.upcoming(now, app.upcoming_count);
    if upcoming.is_empty() {
        lines.push(Line::from(Span::styled("  Nothing upcoming", Style::default().fg(Color::DarkGray))));
    }
    for event in upcoming {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", event.scheduled_for.format("%b %d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(event.title.clone(), Style::default().fg(Theme::content_type_color(event.content_type))),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Content types", section)));
    lines.push(Line::from(
        ContentType::ALL
            .iter()
            .flat_map(|t| {
                [
                    Span::styled("■ ", Style::default().fg(Theme::content_type_color(*t))),
                    Span::raw(format!("{}  ", t.label())),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    lines.push(Line::from(Span::styled("Priority", section)));
    lines.push(Line::from(
        Priority::ALL
            .iter()
            .flat_map(|p| {
                [
                    Span::styled(format!("{} ", p.icon()), Style::default().fg(Theme::priority_color(*p))),
                    Span::raw(format!("{}  ", p.label())),
                ]
            })
            .collect::<Vec<_>>(),
    ));

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Desk "));
    f.render_widget(content, area);
}
