use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use chrono::{Datelike, Local, NaiveDate};
use newsdesk::{
    app::{AppState, Mode},
    calendar::{DAYS_PER_WEEK, WEEKDAY_LABELS},
    ui::{month_view::{self, DayCell}, theme::Theme},
};

const MIN_CELL_WIDTH: usize = 6;

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let layout = month_view::calculate_layout(app, Local::now().date_naive());
    let cell_width = (area.width.saturating_sub(2) as usize / DAYS_PER_WEEK as usize).max(MIN_CELL_WIDTH);

    let month_name = NaiveDate::from_ymd_opt(layout.year, layout.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", layout.year, layout.month));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(month_name, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(
            WEEKDAY_LABELS
                .iter()
                .map(|label| Span::styled(fit(&format!(" {}", label), cell_width), Style::default().fg(app.theme.weekday_header)))
                .collect::<Vec<_>>(),
        ),
    ];

    for week in &layout.weeks {
        lines.push(Line::from(
            week.days.iter().map(|cell| day_number(app, cell, cell_width)).collect::<Vec<_>>(),
        ));

        let rows = week
            .days
            .iter()
            .map(|cell| cell.chips.len() + usize::from(cell.more_label.is_some()))
            .max()
            .unwrap_or(0);
        for row in 0..rows {
            lines.push(Line::from(
                week.days.iter().map(|cell| chip_row(app, cell, row, cell_width)).collect::<Vec<_>>(),
            ));
        }
    }

    lines.push(Line::from(""));
    lines.push(footer(app));

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}

fn day_number<'a>(app: &AppState, cell: &DayCell, width: usize) -> Span<'a> {
    let Some(date) = cell.date else {
        return Span::styled(" ".repeat(width), Style::default().fg(app.theme.blank_cell));
    };

    let mut style = Style::default();
    if cell.is_drop_target {
        style = style.bg(app.theme.drag_target).fg(app.theme.selected_fg).add_modifier(Modifier::BOLD);
    } else if cell.is_selected {
        style = style.bg(app.theme.selected_bg).fg(app.theme.selected_fg).add_modifier(Modifier::BOLD);
    } else if cell.is_today {
        style = style.fg(app.theme.today).add_modifier(Modifier::BOLD);
    }
    if !cell.chips.is_empty() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }

    Span::styled(fit(&format!(" {:>2}", date.day()), width), style)
}

fn chip_row<'a>(app: &AppState, cell: &DayCell, row: usize, width: usize) -> Span<'a> {
    if let Some(chip) = cell.chips.get(row) {
        let mut style = Style::default().fg(Theme::content_type_color(chip.content_type));
        if chip.is_dragged {
            style = style.add_modifier(Modifier::REVERSED);
        }
        return Span::styled(fit(&format!(" {}", chip.title), width), style);
    }

    match &cell.more_label {
        Some(more) if row == cell.chips.len() => Span::styled(
            fit(&format!(" {}", more), width),
            Style::default().fg(app.theme.blank_cell).add_modifier(Modifier::ITALIC),
        ),
        _ => Span::raw(" ".repeat(width)),
    }
}

fn footer<'a>(app: &AppState) -> Line<'a> {
    if app.mode == Mode::Drag {
        Line::from(vec![
            Span::styled("MOVE ", Style::default().fg(app.theme.drag_target).add_modifier(Modifier::BOLD)),
            Span::styled("hjkl/{}", Style::default().fg(app.theme.help_section)),
            Span::raw(" = Pick day | "),
            Span::styled("Enter", Style::default().fg(app.theme.success)),
            Span::raw(" = Drop | "),
            Span::styled("Esc", Style::default().fg(app.theme.error)),
            Span::raw(" = Cancel"),
        ])
    } else {
        Line::from(vec![
            Span::styled("hjkl", Style::default().fg(app.theme.help_section)),
            Span::raw(" = Navigate | "),
            Span::styled("a", Style::default().fg(app.theme.success)),
            Span::raw(" = Schedule | "),
            Span::styled("p", Style::default().fg(app.theme.drag_target)),
            Span::raw(" = Move | "),
            Span::styled("{ }", Style::default().fg(app.theme.help_section)),
            Span::raw(" = Month"),
        ])
    }
}

/// Truncates or pads to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit(" 7", 5), " 7   ");
    }

    #[test]
    fn fit_truncates_long_titles_with_ellipsis() {
        assert_eq!(fit(" Election night", 8), " Electi…");
        assert_eq!(fit(" Election night", 8).chars().count(), 8);
    }
}
