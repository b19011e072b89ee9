use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use newsdesk::{
    app::AppState,
    calendar::{EditorField, EventEditor},
    ui::theme::Theme,
};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(editor) = &app.editor else {
        return;
    };

    let area = f.size();
    let form_width = 70.min(area.width);
    let form_height = 24.min(area.height);
    let x = (area.width.saturating_sub(form_width)) / 2;
    let y = (area.height.saturating_sub(form_height)) / 2;

    let form_area = ratatui::layout::Rect {
        x,
        y,
        width: form_width,
        height: form_height,
    };

    f.render_widget(Clear, form_area);

    let form_title = if editor.is_editing() { "Edit Scheduled Content" } else { "Schedule New Content" };

    let mut form_text = vec![
        Line::from(vec![Span::styled(form_title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
    ];

    for field in [
        EditorField::Title,
        EditorField::ContentType,
        EditorField::Category,
        EditorField::Date,
        EditorField::Time,
        EditorField::Priority,
        EditorField::Status,
        EditorField::Author,
        EditorField::Description,
    ] {
        form_text.push(field_line(app, editor, field));
        form_text.push(Line::from(""));
    }

    if let Some(message) = app.message.as_ref().filter(|m| m.is_error) {
        form_text.push(Line::from(Span::styled(message.text.clone(), Style::default().fg(app.theme.error))));
    }

    let mut keys = vec![
        Span::styled("Tab", Style::default().fg(app.theme.help_section)),
        Span::raw(" = Next | "),
        Span::styled("←/→", Style::default().fg(app.theme.help_section)),
        Span::raw(" = Choose | "),
        Span::styled("Enter", Style::default().fg(app.theme.success)),
        Span::raw(" = Save | "),
        Span::styled("F2", Style::default().fg(app.theme.success)),
        Span::raw(" = Schedule | "),
    ];
    if editor.is_editing() {
        keys.push(Span::styled("F9", Style::default().fg(app.theme.error)));
        keys.push(Span::raw(" = Delete | "));
    }
    keys.push(Span::styled("Esc", Style::default().fg(app.theme.error)));
    keys.push(Span::raw(" = Cancel"));
    form_text.push(Line::from(keys));

    let block_title = if editor.is_editing() { " Edit " } else { " Schedule " };

    let form_paragraph = Paragraph::new(form_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(block_title)
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(form_paragraph, form_area);
}

fn field_line<'a>(app: &AppState, editor: &'a EventEditor, field: EditorField) -> Line<'a> {
    let active = editor.active_field == field;
    let label_style = Style::default().fg(if active { app.theme.selected_bg } else { Color::DarkGray });

    let (label, value, value_style, hint): (&str, String, Style, &str) = match field {
        EditorField::Title => ("Title: ", editor.title.clone(), Style::default(), ""),
        EditorField::ContentType => (
            "Type: ",
            editor.content_type.label().to_string(),
            Style::default().fg(Theme::content_type_color(editor.content_type)),
            " ←/→",
        ),
        EditorField::Category => ("Category: ", editor.category.clone(), Style::default(), ""),
        EditorField::Date => (
            "Date: ",
            editor.date_input.clone(),
            Style::default(),
            if editor.date_buffer_touched { " (YYYY-MM-DD)" } else { " [type to replace]" },
        ),
        EditorField::Time => (
            "Time: ",
            editor.time_input.clone(),
            Style::default(),
            if editor.time_buffer_touched { " (HH:MM or HHMM)" } else { " [type to replace]" },
        ),
        EditorField::Priority => (
            "Priority: ",
            format!("{} {}", editor.priority.icon(), editor.priority.label()),
            Style::default().fg(Theme::priority_color(editor.priority)),
            " ←/→",
        ),
        EditorField::Status => (
            "Status: ",
            editor.status.label().to_string(),
            Style::default().fg(Theme::status_color(editor.status)),
            " ←/→",
        ),
        EditorField::Author => ("Author: ", editor.author.clone(), Style::default(), ""),
        EditorField::Description => ("Description: ", editor.description.clone(), Style::default(), ""),
    };

    Line::from(vec![
        Span::styled(label, label_style),
        Span::styled(value, value_style),
        Span::styled(if active { hint } else { "" }, Style::default().fg(Color::DarkGray)),
    ])
}
