use chrono::NaiveDate;

use crate::app::{AppState, Mode};
use crate::calendar::ContentType;
use crate::ui::theme::Theme;

#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Reload,
    Goto(NaiveDate),
    NewEvent(Option<String>),
    Category(Option<String>),
    ContentType(Option<ContentType>),
    Theme(String),
    Pending,
    Help,
    Error(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(command_text) = trimmed.strip_prefix(':') else {
        return Command::Error("Commands must start with ':'".to_string());
    };

    let parts: Vec<&str> = command_text.split_whitespace().collect();

    let Some(&name) = parts.first() else {
        return Command::Error("Empty command".to_string());
    };
    let rest = parts[1..].join(" ");

    match name {
        "q" | "quit" => Command::Quit,
        "r" | "reload" => Command::Reload,
        "help" => Command::Help,
        "pending" => Command::Pending,
        "goto" => match parts.get(1) {
            None => Command::Error("goto requires a date argument".to_string()),
            Some(arg) => match NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
                Ok(date) => Command::Goto(date),
                Err(_) => Command::Error(format!("Invalid date format: {}", arg)),
            },
        },
        "new" => Command::NewEvent(Some(rest).filter(|title| !title.is_empty())),
        "category" | "cat" => {
            if rest.is_empty() {
                Command::Error("category requires a name or 'all'".to_string())
            } else if rest.eq_ignore_ascii_case("all") {
                Command::Category(None)
            } else {
                Command::Category(Some(rest))
            }
        }
        "type" => {
            if rest.is_empty() {
                Command::Error("type requires a content type or 'all'".to_string())
            } else if rest.eq_ignore_ascii_case("all") {
                Command::ContentType(None)
            } else {
                match ContentType::parse(&rest) {
                    Some(content_type) => Command::ContentType(Some(content_type)),
                    None => Command::Error(format!("Unknown content type: {}", rest)),
                }
            }
        }
        "theme" => match parts.get(1) {
            None => Command::Error("theme requires a theme name".to_string()),
            Some(theme) => Command::Theme(theme.to_string()),
        },
        _ => Command::Error(format!("Unknown command: {}", name)),
    }
}

/// What the event loop must do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Quit,
    Reload,
}

/// Applies a parsed command to the state. Anything needing I/O is handed
/// back to the caller as an outcome.
pub fn execute_command(command: Command, state: &mut AppState) -> CommandOutcome {
    state.command_buffer.clear();
    state.mode = Mode::Normal;

    match command {
        Command::Quit => return CommandOutcome::Quit,
        Command::Reload => return CommandOutcome::Reload,
        Command::Goto(date) => state.select_date(date),
        Command::NewEvent(title) => state.open_create_editor(title.unwrap_or_default()),
        Command::Category(category) => {
            if let Some(name) = &category
                && !state.categories.iter().any(|c| c.eq_ignore_ascii_case(name))
            {
                tracing::warn!("Filtering on unconfigured category {}", name);
            }
            state.filter.category = category;
            state.reset_event_selection();
            state.set_info(format!("Showing {}", state.filter.describe()));
        }
        Command::ContentType(content_type) => {
            state.filter.content_type = content_type;
            state.reset_event_selection();
            state.set_info(format!("Showing {}", state.filter.describe()));
        }
        Command::Theme(name) => {
            state.theme = Theme::get_by_name(&name);
            if state.theme.name != name.to_lowercase() {
                state.set_error(format!("Unknown theme '{}', using {}", name, state.theme.name));
            }
        }
        Command::Pending => state.show_pending = !state.show_pending,
        Command::Help => {
            state.show_help = true;
            state.help_scroll = 0;
        }
        Command::Error(message) => state.set_error(message),
    }
    CommandOutcome::Continue
}
