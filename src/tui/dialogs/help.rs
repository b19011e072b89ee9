use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use newsdesk::{app::AppState, ui::theme::Theme};

pub fn render(f: &mut Frame, app: &AppState) {
    let area = f.size();
    let help_width = 62.min(area.width);
    let help_height = 23.min(area.height);
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = ratatui::layout::Rect {
        x,
        y,
        width: help_width,
        height: help_height,
    };

    f.render_widget(Clear, help_area);

    let section = |title: &'static str| Line::from(vec![Span::styled(title, Style::default().fg(app.theme.help_section))]);

    let help_text = vec![
        Line::from(vec![Span::styled("newsdesk Help", Style::default().fg(app.theme.help_title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        section("Navigation:"),
        Line::from("  h/l      - Previous/next day"),
        Line::from("  j/k      - Select content (or week if the day is empty)"),
        Line::from("  J/K      - Next/previous week"),
        Line::from("  t        - Jump to today"),
        Line::from("  g/G      - First/last day of month"),
        Line::from("  { / }    - Previous/next month"),
        Line::from(""),
        section("Scheduling:"),
        Line::from("  a        - Schedule new content"),
        Line::from("  :new     - Schedule with a title (:new Budget explainer)"),
        Line::from("  E/Enter  - Edit selected item"),
        Line::from("  x        - Remove selected item"),
        Line::from("  p        - Pick up item, move with hjkl, Enter to drop"),
        Line::from(""),
        section("Editor:"),
        Line::from("  Tab/S-Tab - Next/previous field"),
        Line::from("  ←/→      - Change type, priority or status"),
        Line::from("  Enter    - Save"),
        Line::from("  F2       - Save as scheduled"),
        Line::from("  F9       - Delete (existing items)"),
        Line::from("  Esc      - Cancel"),
        Line::from(""),
        section("Commands:"),
        Line::from("  :q             - Quit"),
        Line::from("  :reload        - Reload from the content service"),
        Line::from("  :goto DATE     - Jump to date (:goto 2025-12-25)"),
        Line::from("  :category NAME - Filter by category (:category all)"),
        Line::from("  :type TYPE     - Filter by content type (:type all)"),
        Line::from("  :pending       - Toggle unsynced change count"),
        Line::from(format!("  :theme NAME    - Change theme ({})", Theme::available_themes().join(", "))),
        Line::from("  :help          - Show this help"),
        Line::from(""),
        section("Categories:"),
        Line::from(format!("  {}", app.categories.join(", "))),
        Line::from(""),
    ];

    let visible_lines = help_height.saturating_sub(3) as usize;
    let total_lines = help_text.len();
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.help_scroll.min(max_scroll);

    let scrolled_text: Vec<Line> = help_text
        .into_iter()
        .skip(scroll)
        .take(visible_lines)
        .collect();

    let help_paragraph = Paragraph::new(scrolled_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!(" Help (j/k to scroll, q to close) [{}/{}] ", scroll + 1, total_lines))
            .style(Style::default().bg(Color::Black)))
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}
