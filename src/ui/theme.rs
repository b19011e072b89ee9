use ratatui::style::Color;

use crate::calendar::{ContentType, EventStatus, Priority};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub today: Color,
    pub weekday_header: Color,
    pub blank_cell: Color,
    pub status_bar: Color,
    pub help_title: Color,
    pub help_section: Color,
    pub command_mode: Color,
    pub drag_target: Color,
    pub error: Color,
    pub success: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            today: Color::Green,
            weekday_header: Color::Yellow,
            blank_cell: Color::DarkGray,
            status_bar: Color::White,
            help_title: Color::Cyan,
            help_section: Color::Yellow,
            command_mode: Color::White,
            drag_target: Color::Magenta,
            error: Color::Red,
            success: Color::Green,
        }
    }

    pub fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            title: Color::Rgb(251, 184, 108),
            selected_bg: Color::Rgb(60, 56, 54),
            selected_fg: Color::Rgb(235, 219, 178),
            today: Color::Rgb(184, 187, 38),
            weekday_header: Color::Rgb(254, 128, 25),
            blank_cell: Color::Rgb(146, 131, 116),
            status_bar: Color::Rgb(235, 219, 178),
            help_title: Color::Rgb(251, 184, 108),
            help_section: Color::Rgb(254, 128, 25),
            command_mode: Color::Rgb(235, 219, 178),
            drag_target: Color::Rgb(211, 134, 155),
            error: Color::Rgb(251, 73, 52),
            success: Color::Rgb(184, 187, 38),
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            title: Color::Rgb(136, 192, 208),
            selected_bg: Color::Rgb(59, 66, 82),
            selected_fg: Color::Rgb(236, 239, 244),
            today: Color::Rgb(163, 190, 140),
            weekday_header: Color::Rgb(235, 203, 139),
            blank_cell: Color::Rgb(76, 86, 106),
            status_bar: Color::Rgb(216, 222, 233),
            help_title: Color::Rgb(136, 192, 208),
            help_section: Color::Rgb(235, 203, 139),
            command_mode: Color::Rgb(216, 222, 233),
            drag_target: Color::Rgb(180, 142, 173),
            error: Color::Rgb(191, 97, 106),
            success: Color::Rgb(163, 190, 140),
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default_theme(),
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "gruvbox", "nord"]
    }

    /// Badge colour per content type. Shared by every theme so the legend stays stable.
    pub fn content_type_color(content_type: ContentType) -> Color {
        match content_type {
            ContentType::Article => Color::Blue,
            ContentType::Breaking => Color::Red,
            ContentType::Feature => Color::Magenta,
            ContentType::Opinion => Color::Green,
            ContentType::Interview => Color::Yellow,
            ContentType::Newsletter => Color::Cyan,
        }
    }

    pub fn status_color(status: EventStatus) -> Color {
        match status {
            EventStatus::Scheduled => Color::Blue,
            EventStatus::InProgress => Color::Yellow,
            EventStatus::Review => Color::Magenta,
            EventStatus::Published => Color::Green,
            EventStatus::Draft => Color::Gray,
        }
    }

    pub fn priority_color(priority: Priority) -> Color {
        match priority {
            Priority::Low => Color::Gray,
            Priority::Medium => Color::Blue,
            Priority::High => Color::Yellow,
            Priority::Urgent => Color::Red,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
